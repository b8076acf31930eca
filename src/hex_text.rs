//! CLI 里的十六进制参数：容忍空白和 `0x` 前缀，其余交给 `hex` crate

/// Decodes hex text such as `0x4006 0503 baf6`.
pub fn decode(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(digits)
}
