//! 段类型与标志位优先级

use serde::Serialize;

use super::flags::Flags;
use super::header::HEADER_LEN;

/// The eight segment types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentKind {
    Syn,
    Nul,
    Eak,
    Rst,
    Clz,
    Fin,
    Ack,
    Dat,
}

impl SegmentKind {
    /// 按固定优先级解析段类型：SYN > NUL > EAK > RST > CLZ > FIN > ACK。
    ///
    /// ACK 放在最后：恰好 `HEADER_LEN` 字节是纯 ACK，更长则是携带数据的 DAT。
    pub fn resolve(flags: Flags, len: usize) -> Option<SegmentKind> {
        const PRECEDENCE: [(Flags, SegmentKind); 6] = [
            (Flags::SYN, SegmentKind::Syn),
            (Flags::NUL, SegmentKind::Nul),
            (Flags::EAK, SegmentKind::Eak),
            (Flags::RST, SegmentKind::Rst),
            (Flags::CLZ, SegmentKind::Clz),
            (Flags::FIN, SegmentKind::Fin),
        ];

        if let Some((_, kind)) = PRECEDENCE.iter().find(|(flag, _)| flags.contains(*flag)) {
            return Some(*kind);
        }
        if flags.ack() {
            return Some(if len == HEADER_LEN {
                SegmentKind::Ack
            } else {
                SegmentKind::Dat
            });
        }
        None
    }

    /// 该类型的主标志位（DAT 与 ACK 共用 ACK 位）
    pub const fn primary_flag(self) -> Flags {
        match self {
            SegmentKind::Syn => Flags::SYN,
            SegmentKind::Nul => Flags::NUL,
            SegmentKind::Eak => Flags::EAK,
            SegmentKind::Rst => Flags::RST,
            SegmentKind::Clz => Flags::CLZ,
            SegmentKind::Fin => Flags::FIN,
            SegmentKind::Ack | SegmentKind::Dat => Flags::ACK,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SegmentKind::Syn => "SYN",
            SegmentKind::Nul => "NUL",
            SegmentKind::Eak => "EAK",
            SegmentKind::Rst => "RST",
            SegmentKind::Clz => "CLZ",
            SegmentKind::Fin => "FIN",
            SegmentKind::Ack => "ACK",
            SegmentKind::Dat => "DAT",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SegmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "syn" => Ok(SegmentKind::Syn),
            "nul" => Ok(SegmentKind::Nul),
            "eak" => Ok(SegmentKind::Eak),
            "rst" => Ok(SegmentKind::Rst),
            "clz" => Ok(SegmentKind::Clz),
            "fin" => Ok(SegmentKind::Fin),
            "ack" => Ok(SegmentKind::Ack),
            "dat" => Ok(SegmentKind::Dat),
            other => Err(format!("unknown segment type: {other}")),
        }
    }
}
