use std::net::Ipv4Addr;

use warden_common::{Direction, Protocol};

/// A rule's configured action is the same two-valued accept/drop decision
/// [`warden_common::Verdict`] carries; there is no distinct `ACTION_LOG`
/// action — logging is the orthogonal `log` flag below (see the design
/// notes on action semantics).
pub type Action = warden_common::Verdict;

/// An ordered filter rule (§3 "Filter rule").
///
/// `0.0.0.0` for an IP field, `0` for a port field, or [`Protocol::ANY`] for
/// the protocol field all mean "any" — the rule does not constrain that
/// part of the packet. `direction` is never wildcarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRule {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: Protocol,
    pub direction: Direction,
    pub action: Action,
    pub log: bool,
}

impl FilterRule {
    /// True iff every non-wildcard field of this rule equals the
    /// corresponding packet field, and the direction matches exactly
    /// (§4.4's match predicate).
    pub fn matches(
        &self,
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
        src_port: u16,
        dst_port: u16,
        protocol: Protocol,
        direction: Direction,
    ) -> bool {
        (self.src_ip.is_unspecified() || self.src_ip == src_ip)
            && (self.dst_ip.is_unspecified() || self.dst_ip == dst_ip)
            && (self.src_port == 0 || self.src_port == src_port)
            && (self.dst_port == 0 || self.dst_port == dst_port)
            && (self.protocol.is_any() || self.protocol == protocol)
            && self.direction == direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> FilterRule {
        FilterRule {
            src_ip: Ipv4Addr::UNSPECIFIED,
            dst_ip: Ipv4Addr::UNSPECIFIED,
            src_port: 0,
            dst_port: 0,
            protocol: Protocol::ANY,
            direction: Direction::Inbound,
            action: Action::Drop,
            log: false,
        }
    }

    #[test]
    fn wildcard_rule_matches_anything_in_its_direction() {
        let r = rule();
        assert!(r.matches(
            Ipv4Addr::new(1, 2, 3, 4),
            Ipv4Addr::new(5, 6, 7, 8),
            111,
            222,
            Protocol::TCP,
            Direction::Inbound,
        ));
        assert!(!r.matches(
            Ipv4Addr::new(1, 2, 3, 4),
            Ipv4Addr::new(5, 6, 7, 8),
            111,
            222,
            Protocol::TCP,
            Direction::Outbound,
        ));
    }

    #[test]
    fn non_wildcard_field_must_match_exactly() {
        let mut r = rule();
        r.src_ip = Ipv4Addr::new(10, 0, 0, 1);
        assert!(!r.matches(
            Ipv4Addr::new(10, 0, 0, 2),
            Ipv4Addr::UNSPECIFIED,
            0,
            0,
            Protocol::TCP,
            Direction::Inbound,
        ));
        assert!(r.matches(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::UNSPECIFIED,
            0,
            0,
            Protocol::TCP,
            Direction::Inbound,
        ));
    }
}
