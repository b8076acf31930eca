//! 段编解码模块
//!
//! 可靠 UDP 段的线上格式：固定头部、校验和、按控制位优先级分派的八种段类型。
//! 所有操作都是纯函数，可在多个线程上对独立输入并发调用。

// 子模块声明
mod checksum;
mod error;
mod flags;
mod header;
mod kind;
#[allow(clippy::module_inception)]
mod segment;
mod summary;
mod syn;

// 重新导出公共接口
pub use checksum::{checksum, verify};
pub use error::{BuildError, InvalidReason, InvalidSegment};
pub use flags::Flags;
pub use header::{CHECKSUM_LEN, HEADER_LEN, Header, RUDP_VERSION};
pub use kind::SegmentKind;
pub use segment::{Body, MAX_DATA_PAYLOAD, MAX_EAK_ENTRIES, Segment};
pub use summary::SegmentSummary;
pub use syn::{DEFAULT_OPTION_FLAGS, MAX_VERSION, SYN_HEADER_LEN, SynParameters};

/// 解析一个完整的数据报
pub fn parse(bytes: &[u8]) -> Result<Segment, InvalidSegment> {
    Segment::parse(bytes)
}
