//! SYN 段携带的连接参数
//!
//! ```text
//! byte  4     : version(高 4 位) | spare
//! byte  5     : max outstanding segments
//! byte  6     : option flags
//! byte  7     : spare
//! bytes 8..10 : max segment size
//! bytes 10..12: retransmission timeout (ms)
//! bytes 12..14: cumulative ack timeout (ms)
//! bytes 14..16: null segment timeout (ms)
//! byte  16    : max retransmissions
//! byte  17    : max cumulative acks
//! byte  18    : max out of sequence
//! byte  19    : max auto reset
//! bytes 20..22: checksum
//! ```

use serde::{Deserialize, Serialize};

use super::header::{CHECKSUM_LEN, HEADER_LEN, RUDP_VERSION};

/// SYN 参数区长度
const SYN_PARAMS_LEN: usize = 16;
/// SYN 段头部长度
pub const SYN_HEADER_LEN: usize = HEADER_LEN + SYN_PARAMS_LEN;

/// 参数区起始偏移（紧跟 seq/ack 之后）
const OFF: usize = HEADER_LEN - CHECKSUM_LEN;

/// 版本号只占参数区首字节的高 4 位
pub const MAX_VERSION: u8 = 0x0F;

/// 默认选项标志
pub const DEFAULT_OPTION_FLAGS: u8 = 0x01;

/// Connection parameters negotiated by a SYN.
///
/// `version` must not exceed [`MAX_VERSION`]; `Segment::syn` refuses anything larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynParameters {
    pub version: u8,
    pub max_outstanding_segs: u8,
    pub option_flags: u8,
    pub max_segment_size: u16,
    pub retransmission_timeout_ms: u16,
    pub cumulative_ack_timeout_ms: u16,
    pub null_segment_timeout_ms: u16,
    pub max_retrans: u8,
    pub max_cumulative_acks: u8,
    pub max_out_of_sequence: u8,
    pub max_auto_reset: u8,
}

impl Default for SynParameters {
    fn default() -> Self {
        Self {
            version: RUDP_VERSION,
            max_outstanding_segs: 3,
            option_flags: DEFAULT_OPTION_FLAGS,
            max_segment_size: 128,
            retransmission_timeout_ms: 600,
            cumulative_ack_timeout_ms: 300,
            null_segment_timeout_ms: 2000,
            max_retrans: 3,
            max_cumulative_acks: 3,
            max_out_of_sequence: 3,
            max_auto_reset: 3,
        }
    }
}

impl SynParameters {
    /// 从完整的段字节中读取参数区。调用方保证长度为 `SYN_HEADER_LEN`。
    pub(crate) fn read(bytes: &[u8]) -> Self {
        let u16_at = |i: usize| u16::from_be_bytes([bytes[OFF + i], bytes[OFF + i + 1]]);
        Self {
            version: bytes[OFF] >> 4,
            max_outstanding_segs: bytes[OFF + 1],
            option_flags: bytes[OFF + 2],
            max_segment_size: u16_at(4),
            retransmission_timeout_ms: u16_at(6),
            cumulative_ack_timeout_ms: u16_at(8),
            null_segment_timeout_ms: u16_at(10),
            max_retrans: bytes[OFF + 12],
            max_cumulative_acks: bytes[OFF + 13],
            max_out_of_sequence: bytes[OFF + 14],
            max_auto_reset: bytes[OFF + 15],
        }
    }

    pub(crate) fn write(&self, out: &mut [u8]) {
        let p = &mut out[OFF..OFF + SYN_PARAMS_LEN];
        p[0] = self.version << 4;
        p[1] = self.max_outstanding_segs;
        p[2] = self.option_flags;
        p[3] = 0;
        p[4..6].copy_from_slice(&self.max_segment_size.to_be_bytes());
        p[6..8].copy_from_slice(&self.retransmission_timeout_ms.to_be_bytes());
        p[8..10].copy_from_slice(&self.cumulative_ack_timeout_ms.to_be_bytes());
        p[10..12].copy_from_slice(&self.null_segment_timeout_ms.to_be_bytes());
        p[12] = self.max_retrans;
        p[13] = self.max_cumulative_acks;
        p[14] = self.max_out_of_sequence;
        p[15] = self.max_auto_reset;
    }
}
