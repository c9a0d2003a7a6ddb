use std::sync::Arc;

use tracing::{debug, info};
use warden_net::PacketBufferMut;
use warden_pipeline::{DoneReason, NetworkFunction, Packet};

use crate::clock::Clock;
use crate::state;
use crate::table::ConnTable;

/// The connection-tracking pipeline stage: looks up or creates the flow
/// record for each surviving packet and updates its state (§4.6, §4.7).
/// Never itself drops a packet; logs a line for every newly-created flow,
/// the supplemented "new connection" log event (see design notes).
pub struct ConntrackStage {
    table: Arc<ConnTable>,
    clock: Arc<Clock>,
}

impl ConntrackStage {
    pub fn new(table: Arc<ConnTable>, clock: Arc<Clock>) -> Self {
        ConntrackStage { table, clock }
    }
}

impl<Buf: PacketBufferMut> NetworkFunction<Buf> for ConntrackStage {
    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a {
        input.map(move |mut packet| {
            if packet.is_done() {
                return packet;
            }
            match packet.view() {
                Ok(view) => {
                    let now = self.clock.now();
                    let is_new = self.table.lookup(&view.tuple).is_none();
                    state::observe(&self.table, &view, now);
                    if is_new {
                        info!(
                            target: "warden-conntrack",
                            src = %view.tuple.src_ip,
                            dst = %view.tuple.dst_ip,
                            proto = %view.tuple.protocol,
                            "new connection"
                        );
                    }
                }
                Err(error) => {
                    debug!(target: "warden-conntrack", %error, "not tracking undissectable packet");
                    packet.mark_done(DoneReason::ParseError);
                }
            }
            packet
        })
    }
}
