//! End-to-end coverage of the datapath: dissector -> filter -> conntrack ->
//! NAT, chained the way `wardend`'s binary wires the three stages together.

use std::net::Ipv4Addr;
use std::sync::Arc;

use warden_common::{Direction, Protocol, Verdict};
use warden_conntrack::{Clock, ConnTable, ConntrackStage};
use warden_nat::{NatDirection, NatRule, NatRuleStore, NatStage};
use warden_net::checksum;
use warden_pipeline::{NetworkFunction, Packet};
use warden_rules::{FilterRule, FilterStage, RuleStore};

fn build_tcp_packet(src: Ipv4Addr, dst: Ipv4Addr, src_port: u16, dst_port: u16) -> Vec<u8> {
    let mut pkt = vec![0u8; 40];
    pkt[0] = 0x45;
    pkt[2..4].copy_from_slice(&40u16.to_be_bytes());
    pkt[8] = 64;
    pkt[9] = Protocol::TCP.0;
    pkt[12..16].copy_from_slice(&src.octets());
    pkt[16..20].copy_from_slice(&dst.octets());
    pkt[20..22].copy_from_slice(&src_port.to_be_bytes());
    pkt[22..24].copy_from_slice(&dst_port.to_be_bytes());
    let ip_checksum = checksum::ipv4_header_checksum(&pkt[0..20]);
    pkt[10..12].copy_from_slice(&ip_checksum.to_be_bytes());
    pkt
}

fn run_one(
    filter: &mut FilterStage,
    conntrack: &mut ConntrackStage,
    nat: &mut NatStage,
    buf: Vec<u8>,
    direction: Direction,
) -> Packet<Vec<u8>> {
    let input = std::iter::once(Packet::new(buf, direction));
    let input = filter.process(input);
    let input = conntrack.process(input);
    let mut output = nat.process(input);
    output.next().expect("exactly one packet in, one out")
}

#[test]
fn accepted_outbound_packet_is_tracked_and_nat_rewritten() {
    let rule_store = Arc::new(RuleStore::new(Verdict::Accept, "unused.csv"));
    let conn_table = Arc::new(ConnTable::new());
    let clock = Arc::new(Clock::new());
    let nat_store = Arc::new(NatRuleStore::new("unused_nat.csv"));
    nat_store.replace(vec![NatRule {
        orig_ip: Ipv4Addr::new(10, 0, 0, 5),
        orig_port: 1234,
        new_ip: Ipv4Addr::new(192, 168, 1, 1),
        new_port: 4321,
        protocol: Protocol::TCP,
        direction: NatDirection::Snat,
    }]);

    let mut filter = FilterStage::new(Arc::clone(&rule_store));
    let mut conntrack = ConntrackStage::new(Arc::clone(&conn_table), Arc::clone(&clock));
    let mut nat = NatStage::new(Arc::clone(&nat_store));

    let buf = build_tcp_packet(
        Ipv4Addr::new(10, 0, 0, 5),
        Ipv4Addr::new(8, 8, 8, 8),
        1234,
        80,
    );
    let mut packet = run_one(&mut filter, &mut conntrack, &mut nat, buf, Direction::Outbound);

    assert!(!packet.is_done());
    let view = packet.view().expect("rewritten packet still dissects");
    assert_eq!(view.tuple.src_ip, Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(view.tuple.src_port, 4321);
    assert_eq!(conn_table.len(), 1);
}

#[test]
fn dropped_packet_never_reaches_conntrack_or_nat() {
    let drop_rule = FilterRule {
        src_ip: Ipv4Addr::UNSPECIFIED,
        dst_ip: Ipv4Addr::UNSPECIFIED,
        src_port: 0,
        dst_port: 0,
        protocol: Protocol::TCP,
        direction: Direction::Outbound,
        action: Verdict::Drop,
        log: false,
    };
    let rule_store = Arc::new(RuleStore::new(Verdict::Accept, "unused.csv"));
    rule_store.replace(vec![drop_rule]);
    let conn_table = Arc::new(ConnTable::new());
    let clock = Arc::new(Clock::new());
    let nat_store = Arc::new(NatRuleStore::new("unused_nat.csv"));
    nat_store.replace(vec![NatRule {
        orig_ip: Ipv4Addr::new(10, 0, 0, 5),
        orig_port: 1234,
        new_ip: Ipv4Addr::new(192, 168, 1, 1),
        new_port: 4321,
        protocol: Protocol::TCP,
        direction: NatDirection::Snat,
    }]);

    let mut filter = FilterStage::new(Arc::clone(&rule_store));
    let mut conntrack = ConntrackStage::new(Arc::clone(&conn_table), Arc::clone(&clock));
    let mut nat = NatStage::new(Arc::clone(&nat_store));

    let buf = build_tcp_packet(
        Ipv4Addr::new(10, 0, 0, 5),
        Ipv4Addr::new(8, 8, 8, 8),
        1234,
        80,
    );
    let mut packet = run_one(&mut filter, &mut conntrack, &mut nat, buf, Direction::Outbound);

    assert!(packet.is_done());
    // Neither conntrack nor NAT ran: no flow recorded, source untouched.
    assert_eq!(conn_table.len(), 0);
    let view = packet.view().expect("dropped packet is still well-formed");
    assert_eq!(view.tuple.src_ip, Ipv4Addr::new(10, 0, 0, 5));
    assert_eq!(view.tuple.src_port, 1234);
}

#[test]
fn inbound_packet_is_tracked_but_never_nat_rewritten() {
    let rule_store = Arc::new(RuleStore::new(Verdict::Accept, "unused.csv"));
    let conn_table = Arc::new(ConnTable::new());
    let clock = Arc::new(Clock::new());
    let nat_store = Arc::new(NatRuleStore::new("unused_nat.csv"));
    nat_store.replace(vec![NatRule {
        orig_ip: Ipv4Addr::new(10, 0, 0, 5),
        orig_port: 1234,
        new_ip: Ipv4Addr::new(192, 168, 1, 1),
        new_port: 4321,
        protocol: Protocol::TCP,
        direction: NatDirection::Snat,
    }]);

    let mut filter = FilterStage::new(Arc::clone(&rule_store));
    let mut conntrack = ConntrackStage::new(Arc::clone(&conn_table), Arc::clone(&clock));
    let mut nat = NatStage::new(Arc::clone(&nat_store));

    let buf = build_tcp_packet(
        Ipv4Addr::new(8, 8, 8, 8),
        Ipv4Addr::new(10, 0, 0, 5),
        80,
        1234,
    );
    let mut packet = run_one(&mut filter, &mut conntrack, &mut nat, buf, Direction::Inbound);

    assert!(!packet.is_done());
    assert_eq!(conn_table.len(), 1);
    let view = packet.view().expect("dissects");
    assert_eq!(view.tuple.dst_ip, Ipv4Addr::new(10, 0, 0, 5));
    assert_eq!(view.tuple.dst_port, 1234);
}
