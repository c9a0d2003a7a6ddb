//! Minimal packet buffer abstraction.
//!
//! Unlike a dataplane built for hardware descriptor rings, this firewall
//! never needs to grow, shrink, or shift a packet's bytes: dissection only
//! reads, and NAT rewriting only overwrites fixed-width fields in place. So,
//! where a fuller packet-processing stack needs headroom/tailroom/prepend/
//! append machinery, this crate needs only read and (optionally) mutable
//! access to a contiguous byte slice.

use std::fmt::Debug;

/// A frame an engine can read from.
pub trait PacketBuffer: AsRef<[u8]> + Debug {}

/// A frame an engine can also rewrite in place (used by the NAT engine).
pub trait PacketBufferMut: PacketBuffer + AsMut<[u8]> {}

impl<T: AsRef<[u8]> + Debug> PacketBuffer for T {}
impl<T: PacketBuffer + AsMut<[u8]>> PacketBufferMut for T {}
