//! 所有段类型共享的固定头部
//!
//! ```text
//!  0 1 2 3 4 5 6 7 8            15
//! +-+-+-+-+-+-+-+-+---------------+
//! |S|A|E|R|N|C|F|C| Header        |
//! |Y|C|A|S|U|H|I|L| Length        |
//! |N|K|K|T|L|K|N|Z|               |
//! +-+-+-+-+-+-+-+-+---------------+
//! | Sequence #    | Ack Number    |
//! +---------------+---------------+
//! | (variant fields ...)          |
//! +---------------+---------------+
//! | Checksum                      |
//! +---------------+---------------+
//! ```
//!
//! 校验和总是位于 `[header_len - 2, header_len)`。

use super::flags::Flags;

/// 最小头部长度（字节）
pub const HEADER_LEN: usize = 6;
/// 校验和字段长度（字节）
pub const CHECKSUM_LEN: usize = 2;
/// 协议版本号（SYN 段中携带）
pub const RUDP_VERSION: u8 = 1;

/// The fields every segment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    pub flags: Flags,
    /// Length of the header including the checksum trailer.
    pub header_len: u8,
    pub seq: u8,
    /// Only present while the ACK bit is set.
    pub ack: Option<u8>,
}

impl Header {
    pub fn new(flags: Flags, seq: u8, header_len: u8) -> Self {
        Self {
            flags,
            header_len,
            seq,
            ack: None,
        }
    }

    /// Reads the first four bytes. The caller guarantees `bytes.len() >= HEADER_LEN`.
    pub(crate) fn read(bytes: &[u8]) -> Self {
        let flags = Flags::from(bytes[0]);
        Self {
            flags,
            header_len: bytes[1],
            seq: bytes[2],
            ack: flags.ack().then_some(bytes[3]),
        }
    }

    /// Writes the first four bytes; the checksum slot is left untouched.
    pub(crate) fn write(&self, out: &mut [u8]) {
        out[0] = self.flags.bits();
        out[1] = self.header_len;
        out[2] = self.seq;
        out[3] = self.ack.unwrap_or(0);
    }

    pub fn set_ack(&mut self, ack: u8) {
        self.flags.insert(Flags::ACK);
        self.ack = Some(ack);
    }

    /// Byte range of the checksum field.
    pub fn checksum_range(&self) -> std::ops::Range<usize> {
        let end = self.header_len as usize;
        end - CHECKSUM_LEN..end
    }
}
