use std::net::Ipv4Addr;

use warden_common::{Direction, Protocol};

use crate::rule::Action;
use crate::store::RuleSnapshot;

/// Result of matching one packet against a rule snapshot (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub action: Action,
    pub log: bool,
}

/// Walks `snapshot.rules` in order and returns the first match's action and
/// log flag; falls back to `snapshot.default_action` (never logged) if none
/// match, per §4.4.
pub fn evaluate(
    snapshot: &RuleSnapshot,
    src_ip: Ipv4Addr,
    dst_ip: Ipv4Addr,
    src_port: u16,
    dst_port: u16,
    protocol: Protocol,
    direction: Direction,
) -> Verdict {
    for rule in snapshot.rules.iter() {
        if rule.matches(src_ip, dst_ip, src_port, dst_port, protocol, direction) {
            return Verdict {
                action: rule.action,
                log: rule.log,
            };
        }
    }
    Verdict {
        action: snapshot.default_action,
        log: false,
    }
}
