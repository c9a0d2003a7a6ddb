use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Per-protocol connection state, derived from packets observed on a flow
/// (§4.7). The numeric code stored in [`FlowRecord`] is only meaningful in
/// the context of the flow's own protocol, exactly as in the original
/// module's flat `conn->state` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    New,
    TcpSynSent,
    TcpSynRecv,
    TcpFinWait,
    TcpEstablished,
    UdpActive,
    IcmpEchoRequest,
    IcmpEchoReply,
    IcmpOther,
}

impl FlowState {
    /// Wire/export state code (§6 connection-table export, §8 scenarios).
    pub fn code(self) -> u8 {
        match self {
            FlowState::New => 0,
            FlowState::TcpSynSent | FlowState::UdpActive | FlowState::IcmpEchoRequest => 1,
            FlowState::TcpSynRecv | FlowState::IcmpEchoReply => 2,
            FlowState::TcpFinWait | FlowState::IcmpOther => 3,
            FlowState::TcpEstablished => 4,
        }
    }
}

/// The mutable half of a tracked flow: state code and last-seen tick,
/// mutated without taking the owning bucket's lock (§5 concurrency model —
/// "state code is last-writer-wins; last-seen is the maximum of candidate
/// timestamps").
#[derive(Debug)]
pub struct FlowRecord {
    state: AtomicU8,
    last_seen: AtomicU64,
}

impl FlowRecord {
    pub fn new(state: FlowState, now: u64) -> Self {
        FlowRecord {
            state: AtomicU8::new(state.code()),
            last_seen: AtomicU64::new(now),
        }
    }

    pub fn state_code(&self) -> u8 {
        self.state.load(Ordering::Relaxed)
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen.load(Ordering::Relaxed)
    }

    /// Records a fresh observation. The state code is overwritten
    /// unconditionally (either concurrent writer may win); last-seen only
    /// ever advances.
    pub fn observe(&self, state: FlowState, now: u64) {
        self.state.store(state.code(), Ordering::Relaxed);
        self.last_seen.fetch_max(now, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_seen_never_goes_backward() {
        let record = FlowRecord::new(FlowState::New, 10);
        record.observe(FlowState::TcpSynSent, 5);
        assert_eq!(record.last_seen(), 10);
        record.observe(FlowState::TcpEstablished, 20);
        assert_eq!(record.last_seen(), 20);
    }

    #[test]
    fn state_code_matches_scenario_table() {
        assert_eq!(FlowState::New.code(), 0);
        assert_eq!(FlowState::TcpSynSent.code(), 1);
        assert_eq!(FlowState::TcpSynRecv.code(), 2);
        assert_eq!(FlowState::TcpFinWait.code(), 3);
        assert_eq!(FlowState::TcpEstablished.code(), 4);
        assert_eq!(FlowState::UdpActive.code(), 1);
        assert_eq!(FlowState::IcmpEchoRequest.code(), 1);
        assert_eq!(FlowState::IcmpEchoReply.code(), 2);
        assert_eq!(FlowState::IcmpOther.code(), 3);
    }
}
