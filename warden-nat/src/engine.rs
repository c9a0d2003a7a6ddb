use warden_common::Direction;
use warden_net::{PacketBufferMut, PacketView};

use crate::rule::{NatDirection, NatRule};

/// Applies the first matching NAT rule to an outbound packet, rewriting the
/// address/port pair in place and fixing up checksums (§4.5). No-op on
/// ingress packets and when nothing matches; always leaves the packet
/// accepted either way.
pub fn apply<Buf: PacketBufferMut>(rules: &[NatRule], view: &mut PacketView<'_, Buf>) {
    if view.direction != Direction::Outbound {
        return;
    }

    let tuple = view.tuple;
    for rule in rules {
        match rule.direction {
            NatDirection::Snat
                if rule.matches_snat(tuple.src_ip, tuple.src_port, tuple.protocol) =>
            {
                view.rewrite_source(rule.new_ip, rule.new_port);
                return;
            }
            NatDirection::Dnat
                if rule.matches_dnat(tuple.dst_ip, tuple.dst_port, tuple.protocol) =>
            {
                view.rewrite_destination(rule.new_ip, rule.new_port);
                return;
            }
            _ => continue,
        }
    }
}
