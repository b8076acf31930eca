use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::debug;

use crate::segment::{DEFAULT_OPTION_FLAGS, RUDP_VERSION, SYN_HEADER_LEN, SynParameters};

/// Per-connection parameters, exchanged in SYN segments.
///
/// Values are kept wider than their wire fields so that out-of-range input can be
/// reported instead of silently truncated; `validate` enforces the wire ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionProfile {
    /// 发送队列容量（段数）
    pub max_send_queue_size: u32,
    /// 接收队列容量（段数）
    pub max_recv_queue_size: u32,
    /// 最大段长（字节，至少要放得下 SYN）
    pub max_segment_size: u32,
    /// 未确认段的最大数量
    pub max_outstanding_segs: u32,
    /// 最大连续重传次数（0 表示不限）
    pub max_retrans: u32,
    /// 延迟确认前最多累积的未确认段数
    pub max_cumulative_acks: u32,
    /// 发送 EAK 前最多累积的乱序段数
    pub max_out_of_sequence: u32,
    /// 最大自动重置次数
    pub max_auto_reset: u32,
    pub null_segment_timeout_ms: u32,
    pub retransmission_timeout_ms: u32,
    pub cumulative_ack_timeout_ms: u32,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            max_send_queue_size: 32,
            max_recv_queue_size: 32,
            max_segment_size: 128,
            max_outstanding_segs: 3,
            max_retrans: 3,
            max_cumulative_acks: 3,
            max_out_of_sequence: 3,
            max_auto_reset: 3,
            null_segment_timeout_ms: 2000,
            retransmission_timeout_ms: 600,
            cumulative_ack_timeout_ms: 300,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum ProfileError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("failed to read profile {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed profile: {0}")]
    Json(#[from] serde_json::Error),
}

const U8: u32 = u8::MAX as u32;
const U16: u32 = u16::MAX as u32;

impl ConnectionProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        let checks: [(&'static str, u32, u32, u32); 11] = [
            ("max_send_queue_size", self.max_send_queue_size, 1, U8),
            ("max_recv_queue_size", self.max_recv_queue_size, 1, U8),
            ("max_segment_size", self.max_segment_size, SYN_HEADER_LEN as u32, U16),
            ("max_outstanding_segs", self.max_outstanding_segs, 1, U8),
            ("max_retrans", self.max_retrans, 0, U8),
            ("max_cumulative_acks", self.max_cumulative_acks, 0, U8),
            ("max_out_of_sequence", self.max_out_of_sequence, 0, U8),
            ("max_auto_reset", self.max_auto_reset, 0, U8),
            ("null_segment_timeout_ms", self.null_segment_timeout_ms, 0, U16),
            ("retransmission_timeout_ms", self.retransmission_timeout_ms, 100, U16),
            ("cumulative_ack_timeout_ms", self.cumulative_ack_timeout_ms, 100, U16),
        ];
        for (field, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(ProfileError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON profile. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let profile: ConnectionProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), ?profile, "加载连接参数");
        Ok(profile)
    }

    /// The parameters a SYN built from this profile carries.
    pub fn syn_parameters(&self) -> Result<SynParameters, ProfileError> {
        self.validate()?;
        // validate() 已保证各字段在线上字段范围内
        Ok(SynParameters {
            version: RUDP_VERSION,
            max_outstanding_segs: self.max_outstanding_segs as u8,
            option_flags: DEFAULT_OPTION_FLAGS,
            max_segment_size: self.max_segment_size as u16,
            retransmission_timeout_ms: self.retransmission_timeout_ms as u16,
            cumulative_ack_timeout_ms: self.cumulative_ack_timeout_ms as u16,
            null_segment_timeout_ms: self.null_segment_timeout_ms as u16,
            max_retrans: self.max_retrans as u8,
            max_cumulative_acks: self.max_cumulative_acks as u8,
            max_out_of_sequence: self.max_out_of_sequence as u8,
            max_auto_reset: self.max_auto_reset as u8,
        })
    }
}

/// Profile as announced by a peer's SYN; queue sizes are local and keep defaults.
impl From<SynParameters> for ConnectionProfile {
    fn from(params: SynParameters) -> Self {
        Self {
            max_segment_size: params.max_segment_size.into(),
            max_outstanding_segs: params.max_outstanding_segs.into(),
            max_retrans: params.max_retrans.into(),
            max_cumulative_acks: params.max_cumulative_acks.into(),
            max_out_of_sequence: params.max_out_of_sequence.into(),
            max_auto_reset: params.max_auto_reset.into(),
            null_segment_timeout_ms: params.null_segment_timeout_ms.into(),
            retransmission_timeout_ms: params.retransmission_timeout_ms.into(),
            cumulative_ack_timeout_ms: params.cumulative_ack_timeout_ms.into(),
            ..Self::default()
        }
    }
}
