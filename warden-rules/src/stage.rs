use std::sync::Arc;

use tracing::{debug, info, warn};
use warden_net::PacketBufferMut;
use warden_pipeline::{DoneReason, NetworkFunction, Packet};

use crate::engine;
use crate::rule::Action;
use crate::store::RuleStore;

/// The filter-engine pipeline stage (§4.4): consults the shared
/// [`RuleStore`], marks dropped packets [`DoneReason::Filtered`], and leaves
/// accepted packets for the next stage.
pub struct FilterStage {
    store: Arc<RuleStore>,
}

impl FilterStage {
    pub fn new(store: Arc<RuleStore>) -> Self {
        FilterStage { store }
    }
}

impl<Buf: PacketBufferMut> NetworkFunction<Buf> for FilterStage {
    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a {
        input.map(move |mut packet| {
            if packet.is_done() {
                return packet;
            }

            let tuple = match packet.view() {
                Ok(view) => view.tuple,
                Err(error) => {
                    debug!(target: "warden-rules", %error, "dropping packet that failed to dissect");
                    packet.mark_done(DoneReason::ParseError);
                    return packet;
                }
            };
            let direction = packet.direction;

            let snapshot = self.store.snapshot();
            let verdict = engine::evaluate(
                &snapshot,
                tuple.src_ip,
                tuple.dst_ip,
                tuple.src_port,
                tuple.dst_port,
                tuple.protocol,
                direction,
            );

            if verdict.log {
                info!(
                    target: "warden-rules",
                    src = %tuple.src_ip,
                    dst = %tuple.dst_ip,
                    proto = %tuple.protocol,
                    "rule match"
                );
            }

            if verdict.action == Action::Drop {
                warn!(target: "warden-rules", src = %tuple.src_ip, dst = %tuple.dst_ip, "dropping packet");
                packet.mark_done(DoneReason::Filtered);
            }

            packet
        })
    }
}
