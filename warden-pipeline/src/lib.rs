//! The `NetworkFunction` pipeline-stage abstraction and the `Packet` type
//! that flows through it (§2 data flow).

warden_tracectl::trace_target!("warden-pipeline", tracing::level_filters::LevelFilter::WARN, &[]);

mod network_function;
mod packet;

pub use network_function::NetworkFunction;
pub use packet::{DoneReason, Packet};

#[cfg(test)]
mod tests {
    use super::*;
    use warden_common::Direction;

    struct DropEverything;

    impl NetworkFunction<Vec<u8>> for DropEverything {
        fn process<'a, Input: Iterator<Item = Packet<Vec<u8>>> + 'a>(
            &'a mut self,
            input: Input,
        ) -> impl Iterator<Item = Packet<Vec<u8>>> + 'a {
            input.map(|mut packet| {
                packet.mark_done(DoneReason::Filtered);
                packet
            })
        }
    }

    #[test]
    fn stage_can_mark_every_packet_done() {
        let packets = vec![
            Packet::new(vec![0u8; 20], Direction::Inbound),
            Packet::new(vec![0u8; 20], Direction::Outbound),
        ];
        let mut stage = DropEverything;
        let processed: Vec<_> = stage.process(packets.into_iter()).collect();
        assert!(processed.iter().all(|p| p.done() == Some(DoneReason::Filtered)));
    }
}
