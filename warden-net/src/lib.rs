//! IPv4 + L4 packet dissection and in-place NAT rewriting (§4.1, §4.5).

warden_tracectl::trace_target!("warden-net", tracing::level_filters::LevelFilter::WARN, &[]);

pub mod buffer;
pub mod checksum;
pub mod error;
pub mod packet;
pub mod tcp;

pub use buffer::{PacketBuffer, PacketBufferMut};
pub use error::DissectError;
pub use packet::{FiveTuple, PacketView};
pub use tcp::TcpFlags;
