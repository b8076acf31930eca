//! 控制标志位（header 第 0 字节）

/// 段头的控制标志集合。
///
/// 各位相互独立，可以同时置位（例如 FIN|ACK、SYN|ACK）。
#[derive(Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Flags(u8);

impl Flags {
    pub const SYN: Flags = Flags(0x80);
    pub const ACK: Flags = Flags(0x40);
    pub const EAK: Flags = Flags(0x20);
    pub const RST: Flags = Flags(0x10);
    pub const NUL: Flags = Flags(0x08);
    pub const CHK: Flags = Flags(0x04);
    pub const FIN: Flags = Flags(0x02);
    pub const CLZ: Flags = Flags(0x01);

    /// 按 bit7..bit0 的顺序排列，用于格式化输出
    const NAMED: [(Flags, &'static str); 8] = [
        (Flags::SYN, "SYN"),
        (Flags::ACK, "ACK"),
        (Flags::EAK, "EAK"),
        (Flags::RST, "RST"),
        (Flags::NUL, "NUL"),
        (Flags::CHK, "CHK"),
        (Flags::FIN, "FIN"),
        (Flags::CLZ, "CLZ"),
    ];

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    pub const fn syn(self) -> bool {
        self.contains(Flags::SYN)
    }

    pub const fn ack(self) -> bool {
        self.contains(Flags::ACK)
    }

    /// 校验和是否覆盖整个段（而不仅是 header）
    pub const fn chk(self) -> bool {
        self.contains(Flags::CHK)
    }

    /// 已置位标志的名字（高位在前）
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Flags(bits)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> Self {
        flags.0
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl std::fmt::Debug for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Flags({})", self.names().join("|"))
    }
}
