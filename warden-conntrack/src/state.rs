use std::sync::Arc;

use warden_common::Protocol;
use warden_net::{PacketBufferMut, PacketView, TcpFlags};

use crate::record::{FlowRecord, FlowState};
use crate::table::ConnTable;

/// ICMP type 8 (echo request) and 0 (echo reply), the only two the state
/// engine distinguishes; everything else is `IcmpOther` (§4.7).
const ICMP_ECHO_REQUEST: u8 = 8;
const ICMP_ECHO_REPLY: u8 = 0;

/// Derives the state code a packet contributes to its flow, from the
/// protocol-specific fields [`PacketView`] already extracted (§4.7).
pub fn derive_state<Buf: PacketBufferMut>(view: &PacketView<'_, Buf>) -> FlowState {
    match view.tuple.protocol {
        Protocol::TCP => {
            let flags = view.tcp_flags.unwrap_or(TcpFlags::empty());
            if flags.contains(TcpFlags::SYN) && flags.contains(TcpFlags::ACK) {
                FlowState::TcpSynRecv
            } else if flags.contains(TcpFlags::SYN) {
                FlowState::TcpSynSent
            } else if flags.contains(TcpFlags::FIN) {
                FlowState::TcpFinWait
            } else {
                FlowState::TcpEstablished
            }
        }
        Protocol::UDP => FlowState::UdpActive,
        Protocol::ICMP => match view.icmp_type {
            Some(ICMP_ECHO_REQUEST) => FlowState::IcmpEchoRequest,
            Some(ICMP_ECHO_REPLY) => FlowState::IcmpEchoReply,
            _ => FlowState::IcmpOther,
        },
        _ => FlowState::New,
    }
}

/// Looks up (or creates) the flow record for `view`'s tuple and records the
/// observation, returning the record that won any creation race (§4.7).
pub fn observe<Buf: PacketBufferMut>(
    table: &ConnTable,
    view: &PacketView<'_, Buf>,
    now: u64,
) -> Arc<FlowRecord> {
    let key = view.tuple;
    let state = derive_state(view);

    let record = match table.lookup(&key) {
        Some(existing) => existing,
        None => {
            let fresh = Arc::new(FlowRecord::new(FlowState::New, now));
            table.insert(key, fresh)
        }
    };
    record.observe(state, now);
    record
}
