use thiserror::Error;

/// Failure to make sense of a raw frame as an IPv4 packet.
///
/// A dissection failure always resolves to "drop before entering the filter
/// engine" at the call site; it is never fatal to the process.
#[derive(Debug, Error)]
pub enum DissectError {
    #[error("frame too short to contain an IPv4 header")]
    Truncated,
    #[error("not an IPv4 packet (version field was not 4)")]
    NotIpv4,
    #[error("malformed IPv4 header: {0}")]
    BadIpv4Header(String),
    #[error("IPv4 header claims a length beyond the end of the frame")]
    TruncatedPayload,
    #[error("malformed TCP header: {0}")]
    BadTcpHeader(String),
    #[error("malformed UDP header: {0}")]
    BadUdpHeader(String),
    #[error("truncated ICMPv4 header")]
    TruncatedIcmp,
}
