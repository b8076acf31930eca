//! 16 位反码校验和（Internet checksum 风格）

/// Computes the one's-complement checksum of `bytes`.
///
/// Words are big-endian; a trailing odd byte is taken as the high half of a word.
/// Running it over a region that already carries a correct checksum yields zero.
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut sum: u64 = 0;
    let mut words = bytes.chunks_exact(2);
    for word in &mut words {
        sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u64::from(*last) << 8;
    }

    // end-around carry
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// 校验和是否通过（对包含校验和字段的区域重新计算，结果应为 0）
pub fn verify(bytes: &[u8]) -> bool {
    checksum(bytes) == 0
}
