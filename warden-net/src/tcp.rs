use bitflags::bitflags;

bitflags! {
    /// TCP control bits, as laid out in byte 13 of the TCP header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TcpFlags: u8 {
        const FIN = 0b0000_0001;
        const SYN = 0b0000_0010;
        const RST = 0b0000_0100;
        const PSH = 0b0000_1000;
        const ACK = 0b0001_0000;
        const URG = 0b0010_0000;
        const ECE = 0b0100_0000;
        const CWR = 0b1000_0000;
    }
}

impl TcpFlags {
    pub fn from_header_byte(byte: u8) -> TcpFlags {
        TcpFlags::from_bits_truncate(byte)
    }
}
