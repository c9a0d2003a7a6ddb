use warden_common::Direction;
use warden_net::{DissectError, PacketBufferMut, PacketView};

/// Why a packet left the pipeline early, without reaching every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DoneReason {
    #[strum(serialize = "parse-error")]
    ParseError,
    #[strum(serialize = "filtered")]
    Filtered,
}

/// The unit of work flowing through a [`crate::NetworkFunction`] chain: an
/// owned buffer plus the direction it was observed in, and an optional
/// terminal reason once some stage has decided its fate.
///
/// Each stage dissects the buffer transiently (via [`Packet::view`]) rather
/// than holding on to a [`PacketView`] across stage boundaries, since a
/// `PacketView` borrows the buffer mutably and a pipeline stage needs to be
/// able to hand the whole `Packet` off to the next stage afterward.
#[derive(Debug)]
pub struct Packet<Buf> {
    pub buf: Buf,
    pub direction: Direction,
    done: Option<DoneReason>,
}

impl<Buf: PacketBufferMut> Packet<Buf> {
    pub fn new(buf: Buf, direction: Direction) -> Self {
        Packet {
            buf,
            direction,
            done: None,
        }
    }

    /// Dissects the current buffer contents. Safe to call repeatedly; NAT
    /// rewriting mutates the buffer in place so a later call reflects it.
    pub fn view(&mut self) -> Result<PacketView<'_, Buf>, DissectError> {
        PacketView::dissect(&mut self.buf, self.direction)
    }

    pub fn mark_done(&mut self, reason: DoneReason) {
        self.done = Some(reason);
    }

    pub fn done(&self) -> Option<DoneReason> {
        self.done
    }

    pub fn is_done(&self) -> bool {
        self.done.is_some()
    }
}
