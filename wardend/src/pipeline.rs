use std::sync::Arc;

use warden_common::Direction;
use warden_conntrack::ConntrackStage;
use warden_control::Context;
use warden_nat::NatStage;
use warden_net::PacketBufferMut;
use warden_pipeline::{NetworkFunction, Packet};
use warden_rules::FilterStage;

/// The three-stage datapath (§2 system overview): filter, then connection
/// tracking, then NAT. Packet ingestion/egress itself — the netfilter hooks
/// in the original kernel module — is external plumbing, left unspecified
/// beyond "consumes IPv4 packets at ingress and egress of a host"; this
/// type is the reusable core a concrete transport drives.
pub struct Pipeline {
    filter: FilterStage,
    conntrack: ConntrackStage,
    nat: NatStage,
}

impl Pipeline {
    pub fn new(context: &Context) -> Self {
        Pipeline {
            filter: FilterStage::new(Arc::clone(&context.rule_store)),
            conntrack: ConntrackStage::new(Arc::clone(&context.conn_table), Arc::clone(&context.clock)),
            nat: NatStage::new(Arc::clone(&context.nat_store)),
        }
    }

    /// Runs one buffer through filter, conntrack, and NAT in order.
    pub fn process_one<Buf: PacketBufferMut>(&mut self, buf: Buf, direction: Direction) -> Packet<Buf> {
        let input = std::iter::once(Packet::new(buf, direction));
        let input = self.filter.process(input);
        let input = self.conntrack.process(input);
        let mut output = self.nat.process(input);
        output.next().expect("process_one always yields exactly one packet")
    }
}
