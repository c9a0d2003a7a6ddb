use std::sync::Arc;

use tracing::debug;
use warden_net::PacketBufferMut;
use warden_pipeline::{DoneReason, NetworkFunction, Packet};

use crate::engine;
use crate::store::NatRuleStore;

/// The NAT-engine pipeline stage (§4.5): consults the shared
/// [`NatRuleStore`] and rewrites outbound packets that survived the filter
/// and state stages. Never itself drops a packet.
pub struct NatStage {
    store: Arc<NatRuleStore>,
}

impl NatStage {
    pub fn new(store: Arc<NatRuleStore>) -> Self {
        NatStage { store }
    }
}

impl<Buf: PacketBufferMut> NetworkFunction<Buf> for NatStage {
    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a {
        input.map(move |mut packet| {
            if packet.is_done() {
                return packet;
            }
            let rules = self.store.snapshot();
            match packet.view() {
                Ok(mut view) => engine::apply(&rules, &mut view),
                Err(error) => {
                    debug!(target: "warden-nat", %error, "dropping packet that failed to dissect");
                    packet.mark_done(DoneReason::ParseError);
                }
            }
            packet
        })
    }
}
