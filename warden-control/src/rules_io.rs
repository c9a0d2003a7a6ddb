//! CSV parsing for the filter and NAT rule files (§6). Field-by-field
//! lenient defaulting mirrors `parse_rule`/`parse_nat_rule` in the original
//! module: a missing or non-numeric field defaults to zero rather than
//! rejecting the whole line, except where noted below.

use std::net::Ipv4Addr;
use std::path::Path;

use tracing::warn;
use warden_common::{Direction, Protocol};
use warden_nat::{NatDirection, NatRule};
use warden_rules::{Action, FilterRule};

use crate::error::ControlError;

fn field<'a>(fields: &mut std::str::Split<'a, char>) -> &'a str {
    fields.next().unwrap_or("")
}

fn ipv4_lenient(text: &str) -> Ipv4Addr {
    if text.is_empty() {
        Ipv4Addr::UNSPECIFIED
    } else {
        text.parse().unwrap_or(Ipv4Addr::UNSPECIFIED)
    }
}

fn u16_lenient(text: &str) -> u16 {
    if text.is_empty() {
        0
    } else {
        text.parse().unwrap_or(0)
    }
}

fn u8_lenient(text: &str) -> u8 {
    if text.is_empty() {
        0
    } else {
        text.parse().unwrap_or(0)
    }
}

fn direction_lenient(text: &str) -> Direction {
    Direction::from_wire(u8_lenient(text)).unwrap_or(Direction::Inbound)
}

/// Parses one filter-rule CSV line: src_ip, dst_ip, src_port, dst_port,
/// proto, direction, action, log. Returns `None` if the line is malformed
/// in a way that cannot be defaulted away (an unparsable action), mirroring
/// `parse_rule`'s only hard failure.
pub fn parse_filter_rule(line: &str) -> Option<FilterRule> {
    let mut fields = line.split(',');
    let src_ip = ipv4_lenient(field(&mut fields));
    let dst_ip = ipv4_lenient(field(&mut fields));
    let src_port = u16_lenient(field(&mut fields));
    let dst_port = u16_lenient(field(&mut fields));
    let protocol = Protocol(u8_lenient(field(&mut fields)));
    let direction = direction_lenient(field(&mut fields));

    let action_field = field(&mut fields);
    let action = if action_field.is_empty() {
        Action::Accept
    } else {
        match action_field.parse::<u8>() {
            Ok(0) => Action::Accept,
            Ok(1) => Action::Drop,
            _ => return None,
        }
    };

    let log = field(&mut fields) == "1";

    Some(FilterRule {
        src_ip,
        dst_ip,
        src_port,
        dst_port,
        protocol,
        direction,
        action,
        log,
    })
}

/// Parses one NAT-rule CSV line: orig_ip, orig_port, new_ip, new_port,
/// proto, direction. A non-empty, unparsable IP field fails the whole line
/// (`parse_nat_rule` returns `-EINVAL` in that case); every other field
/// defaults to zero.
pub fn parse_nat_rule(line: &str) -> Option<NatRule> {
    let mut fields = line.split(',');

    let orig_field = field(&mut fields);
    let orig_ip = if orig_field.is_empty() {
        Ipv4Addr::UNSPECIFIED
    } else {
        orig_field.parse().ok()?
    };
    let orig_port = u16_lenient(field(&mut fields));

    let new_field = field(&mut fields);
    let new_ip = if new_field.is_empty() {
        Ipv4Addr::UNSPECIFIED
    } else {
        new_field.parse().ok()?
    };
    let new_port = u16_lenient(field(&mut fields));

    let protocol = Protocol(u8_lenient(field(&mut fields)));
    let direction = match u8_lenient(field(&mut fields)) {
        1 => NatDirection::Dnat,
        _ => NatDirection::Snat,
    };

    Some(NatRule {
        orig_ip,
        orig_port,
        new_ip,
        new_port,
        protocol,
        direction,
    })
}

/// Loads a filter rule file: first line is a header and is skipped;
/// malformed lines are logged and dropped, the rest still loads (§6, §7).
pub fn load_filter_rules(path: &Path) -> Result<Vec<FilterRule>, ControlError> {
    let text = std::fs::read_to_string(path).map_err(|source| ControlError::RuleFileIo {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rules = Vec::new();
    for (lineno, line) in text.lines().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        match parse_filter_rule(line) {
            Some(rule) => rules.push(rule),
            None => warn!(target: "warden-control", lineno, "skipping malformed filter rule line"),
        }
    }
    Ok(rules)
}

/// Loads a NAT rule file. Unlike the filter rule file, the original module
/// does not skip a header line for NAT rules.
pub fn load_nat_rules(path: &Path) -> Result<Vec<NatRule>, ControlError> {
    let text = std::fs::read_to_string(path).map_err(|source| ControlError::RuleFileIo {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rules = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        match parse_nat_rule(line) {
            Some(rule) => rules.push(rule),
            None => warn!(target: "warden-control", lineno, "skipping malformed NAT rule line"),
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_b_parses_drop_all_inbound_tcp() {
        let rule = parse_filter_rule(",,,,6,0,1,0").expect("parses");
        assert_eq!(rule.src_ip, Ipv4Addr::UNSPECIFIED);
        assert_eq!(rule.protocol, Protocol::TCP);
        assert_eq!(rule.direction, Direction::Inbound);
        assert_eq!(rule.action, Action::Drop);
        assert!(!rule.log);
    }

    #[test]
    fn scenario_c_first_rule_parses_with_source_and_log() {
        let rule = parse_filter_rule("10.0.0.1,,,,6,0,0,1").expect("parses");
        assert_eq!(rule.src_ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(rule.action, Action::Accept);
        assert!(rule.log);
    }

    #[test]
    fn unparsable_action_is_rejected() {
        assert!(parse_filter_rule(",,,,6,0,not-a-number,0").is_none());
    }

    #[test]
    fn malformed_numeric_field_defaults_to_zero() {
        let rule = parse_filter_rule(",,abc,,6,0,0,0").expect("parses");
        assert_eq!(rule.src_port, 0);
    }

    #[test]
    fn scenario_d_parses_snat_rule() {
        let rule = parse_nat_rule("10.0.0.1,1234,192.168.1.1,4321,6,0").expect("parses");
        assert_eq!(rule.orig_ip, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(rule.orig_port, 1234);
        assert_eq!(rule.new_ip, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(rule.new_port, 4321);
        assert_eq!(rule.direction, NatDirection::Snat);
    }

    #[test]
    fn nat_rule_with_bad_ip_is_rejected() {
        assert!(parse_nat_rule("not-an-ip,1234,192.168.1.1,4321,6,0").is_none());
    }
}
