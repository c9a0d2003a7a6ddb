use warden_net::PacketBufferMut;

use crate::packet::Packet;

/// A single stage of the datapath: dissector, filter engine, state engine,
/// or NAT engine each implement this over an iterator of packets, mirroring
/// §2's "ingress packet -> dissector -> filter engine -> state engine (->
/// NAT engine) -> verdict" data flow as a composable iterator chain.
///
/// Implementations should not buffer more than one packet of state between
/// calls: the datapath is wait-free per §5, and an iterator adapter that
/// only inspects (`filter_map`/`map`) the packet in front of it preserves
/// that property.
pub trait NetworkFunction<Buf: PacketBufferMut> {
    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a;
}
