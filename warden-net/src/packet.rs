use std::net::Ipv4Addr;

use warden_common::{Direction, Protocol};

use crate::buffer::PacketBufferMut;
use crate::checksum;
use crate::error::DissectError;
use crate::tcp::TcpFlags;

/// The identifying tuple of a flow (spec §3 "Flow key"). Directional: the
/// reverse-direction packets of a bidirectional conversation produce a
/// distinct tuple, by design (see the design notes on flow unification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiveTuple {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: Protocol,
}

/// A parsed, non-owning view of one IPv4 frame.
///
/// Carries the typed 5-tuple and flag set every engine matches against, plus
/// (since `Buf: PacketBufferMut`) the byte offsets the NAT engine needs to
/// rewrite an address/port pair and the checksums that cover it, in place.
#[derive(Debug)]
pub struct PacketView<'a, Buf> {
    buf: &'a mut Buf,
    pub direction: Direction,
    pub tuple: FiveTuple,
    pub tcp_flags: Option<TcpFlags>,
    pub icmp_type: Option<u8>,
    ip_header_len: usize,
}

impl<'a, Buf: PacketBufferMut> PacketView<'a, Buf> {
    /// Parses `buf` as an IPv4 frame observed in `direction`.
    ///
    /// Validates the IPv4 version and header length, and extracts L4 ports
    /// only for TCP/UDP and an ICMP type only for ICMP, per §4.1. Any
    /// structural problem is a typed [`DissectError`]; callers drop the
    /// packet without consulting the filter engine.
    pub fn dissect(buf: &'a mut Buf, direction: Direction) -> Result<Self, DissectError> {
        let raw = buf.as_ref();
        if raw.len() < 20 {
            return Err(DissectError::Truncated);
        }
        if raw[0] >> 4 != 4 {
            return Err(DissectError::NotIpv4);
        }
        // Structural validation via etherparse; we still read fields by
        // fixed offset below so that NAT rewriting operates on exactly the
        // bytes it mutates.
        etherparse::Ipv4HeaderSlice::from_slice(raw)
            .map_err(|err| DissectError::BadIpv4Header(err.to_string()))?;

        let ihl = usize::from(raw[0] & 0x0F);
        let ip_header_len = ihl * 4;
        if ip_header_len < 20 || raw.len() < ip_header_len {
            return Err(DissectError::Truncated);
        }
        let total_len = usize::from(u16::from_be_bytes([raw[2], raw[3]]));
        if raw.len() < total_len || total_len < ip_header_len {
            return Err(DissectError::TruncatedPayload);
        }

        let protocol = Protocol(raw[9]);
        let src_ip = Ipv4Addr::new(raw[12], raw[13], raw[14], raw[15]);
        let dst_ip = Ipv4Addr::new(raw[16], raw[17], raw[18], raw[19]);

        let l4 = &raw[ip_header_len..total_len];
        let (src_port, dst_port, tcp_flags, icmp_type) = match protocol {
            Protocol::TCP => {
                if l4.len() < 20 {
                    return Err(DissectError::BadTcpHeader("truncated TCP header".into()));
                }
                let src_port = u16::from_be_bytes([l4[0], l4[1]]);
                let dst_port = u16::from_be_bytes([l4[2], l4[3]]);
                let flags = TcpFlags::from_header_byte(l4[13]);
                (src_port, dst_port, Some(flags), None)
            }
            Protocol::UDP => {
                if l4.len() < 8 {
                    return Err(DissectError::BadUdpHeader("truncated UDP header".into()));
                }
                let src_port = u16::from_be_bytes([l4[0], l4[1]]);
                let dst_port = u16::from_be_bytes([l4[2], l4[3]]);
                (src_port, dst_port, None, None)
            }
            Protocol::ICMP => {
                if l4.is_empty() {
                    return Err(DissectError::TruncatedIcmp);
                }
                (0, 0, None, Some(l4[0]))
            }
            _ => (0, 0, None, None),
        };

        Ok(PacketView {
            buf,
            direction,
            tuple: FiveTuple {
                src_ip,
                dst_ip,
                src_port,
                dst_port,
                protocol,
            },
            tcp_flags,
            icmp_type,
            ip_header_len,
        })
    }

    /// Read-only access to the backing frame, e.g. for the control-channel
    /// connection-table export path that never mutates packets.
    pub fn raw(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Rewrites the source address/port and fixes up the IPv4 and
    /// TCP/UDP checksums so the emitted packet remains well-formed (§4.5,
    /// and the design note calling out the original's missing checksum
    /// fixup as a correctness bug).
    pub fn rewrite_source(&mut self, new_ip: Ipv4Addr, new_port: u16) {
        self.rewrite(true, new_ip, new_port);
    }

    /// Rewrites the destination address/port; see [`Self::rewrite_source`].
    pub fn rewrite_destination(&mut self, new_ip: Ipv4Addr, new_port: u16) {
        self.rewrite(false, new_ip, new_port);
    }

    fn rewrite(&mut self, is_source: bool, new_ip: Ipv4Addr, new_port: u16) {
        let ip_header_len = self.ip_header_len;
        let protocol = self.tuple.protocol;

        let final_src = if is_source { new_ip } else { self.tuple.src_ip };
        let final_dst = if is_source { self.tuple.dst_ip } else { new_ip };

        let raw = self.buf.as_mut();

        let ip_offset = if is_source { 12 } else { 16 };
        raw[ip_offset..ip_offset + 4].copy_from_slice(&new_ip.octets());
        raw[10] = 0;
        raw[11] = 0;
        let ip_checksum = checksum::ipv4_header_checksum(&raw[..ip_header_len]);
        raw[10..12].copy_from_slice(&ip_checksum.to_be_bytes());

        if protocol == Protocol::TCP || protocol == Protocol::UDP {
            let port_offset = if is_source { 0 } else { 2 };
            let l4_start = ip_header_len;
            raw[l4_start + port_offset..l4_start + port_offset + 2]
                .copy_from_slice(&new_port.to_be_bytes());

            let checksum_offset = if protocol == Protocol::TCP { 16 } else { 6 };
            let udp_checksum_disabled = protocol == Protocol::UDP
                && raw[l4_start + checksum_offset] == 0
                && raw[l4_start + checksum_offset + 1] == 0;

            if !udp_checksum_disabled {
                raw[l4_start + checksum_offset] = 0;
                raw[l4_start + checksum_offset + 1] = 0;
                let new_l4_checksum = checksum::transport_checksum(
                    final_src.octets(),
                    final_dst.octets(),
                    protocol.0,
                    &raw[l4_start..],
                );
                raw[l4_start + checksum_offset..l4_start + checksum_offset + 2]
                    .copy_from_slice(&new_l4_checksum.to_be_bytes());
            }
        }

        if is_source {
            self.tuple.src_ip = new_ip;
            self.tuple.src_port = new_port;
        } else {
            self.tuple.dst_ip = new_ip;
            self.tuple.dst_port = new_port;
        }
    }
}
