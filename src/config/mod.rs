//! 连接参数配置
//!
//! 会话层使用的连接参数（超时、窗口、重传上限），可以从 JSON 文件加载，
//! 并转换为 SYN 段携带的参数。

mod profile;

pub use profile::{ConnectionProfile, ProfileError};
