//! 段的统一表示：构造、访问、编码与解码

use tracing::{debug, trace};

use super::checksum::checksum;
use super::error::{BuildError, InvalidReason, InvalidSegment};
use super::flags::Flags;
use super::header::{HEADER_LEN, Header};
use super::kind::SegmentKind;
use super::syn::{MAX_VERSION, SYN_HEADER_LEN, SynParameters};

/// EAK 头部最多能容纳的乱序序号个数（header_len 是 u8）
pub const MAX_EAK_ENTRIES: usize = u8::MAX as usize - HEADER_LEN;
/// DAT 段的最大载荷（总长度用 u16 表示）
pub const MAX_DATA_PAYLOAD: usize = u16::MAX as usize - HEADER_LEN;

/// Variant-specific part of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Body {
    Syn(SynParameters),
    Nul,
    /// Sequence numbers received out of order, in the order they are reported.
    Eak(Vec<u8>),
    Rst,
    Clz,
    Fin,
    Ack,
    /// Application bytes, placed after the 6-byte header.
    Dat(Vec<u8>),
}

impl Body {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Body::Syn(_) => SegmentKind::Syn,
            Body::Nul => SegmentKind::Nul,
            Body::Eak(_) => SegmentKind::Eak,
            Body::Rst => SegmentKind::Rst,
            Body::Clz => SegmentKind::Clz,
            Body::Fin => SegmentKind::Fin,
            Body::Ack => SegmentKind::Ack,
            Body::Dat(_) => SegmentKind::Dat,
        }
    }
}

/// One protocol message unit: header plus optional payload.
///
/// `header_length` always covers the header only (flags through the checksum
/// trailer). `length()` is the full encoded size, which differs from it only for
/// DAT segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    header: Header,
    body: Body,
    /// 重传次数，由重传逻辑维护，不上线
    retx: u32,
}

impl Segment {
    fn control(kind: SegmentKind, seq: u8, header_len: usize, body: Body) -> Self {
        Self {
            header: Header::new(kind.primary_flag(), seq, header_len as u8),
            body,
            retx: 0,
        }
    }

    /// Connection request; fails when `params.version` does not fit its nibble.
    pub fn syn(seq: u8, params: SynParameters) -> Result<Self, BuildError> {
        if params.version > MAX_VERSION {
            return Err(BuildError::VersionOutOfRange {
                version: params.version,
            });
        }
        Ok(Self::control(
            SegmentKind::Syn,
            seq,
            SYN_HEADER_LEN,
            Body::Syn(params),
        ))
    }

    pub fn nul(seq: u8) -> Self {
        Self::control(SegmentKind::Nul, seq, HEADER_LEN, Body::Nul)
    }

    pub fn rst(seq: u8) -> Self {
        Self::control(SegmentKind::Rst, seq, HEADER_LEN, Body::Rst)
    }

    pub fn clz(seq: u8) -> Self {
        Self::control(SegmentKind::Clz, seq, HEADER_LEN, Body::Clz)
    }

    pub fn fin(seq: u8) -> Self {
        Self::control(SegmentKind::Fin, seq, HEADER_LEN, Body::Fin)
    }

    pub fn ack(seq: u8, ack: u8) -> Self {
        let mut segment = Self::control(SegmentKind::Ack, seq, HEADER_LEN, Body::Ack);
        segment.set_ack(ack);
        segment
    }

    /// Extended ack: `ack` is the last in-sequence number, `out_of_sequence` lists
    /// the numbers received beyond it.
    pub fn eak(seq: u8, ack: u8, out_of_sequence: Vec<u8>) -> Result<Self, BuildError> {
        if out_of_sequence.is_empty() {
            return Err(BuildError::NoOutOfSequenceAcks);
        }
        if out_of_sequence.len() > MAX_EAK_ENTRIES {
            return Err(BuildError::TooManyOutOfSequenceAcks {
                count: out_of_sequence.len(),
            });
        }
        let header_len = HEADER_LEN + out_of_sequence.len();
        let mut segment =
            Self::control(SegmentKind::Eak, seq, header_len, Body::Eak(out_of_sequence));
        segment.set_ack(ack);
        Ok(segment)
    }

    /// Data segment; always piggybacks `ack`.
    pub fn data(seq: u8, ack: u8, payload: Vec<u8>) -> Result<Self, BuildError> {
        if payload.is_empty() {
            return Err(BuildError::EmptyPayload);
        }
        if payload.len() > MAX_DATA_PAYLOAD {
            return Err(BuildError::OverlyLongPayload { len: payload.len() });
        }
        let mut segment = Self::control(SegmentKind::Dat, seq, HEADER_LEN, Body::Dat(payload));
        segment.set_ack(ack);
        Ok(segment)
    }

    /// Extend checksum coverage from the header to the whole segment.
    pub fn with_full_checksum(mut self) -> Self {
        self.set_full_checksum(true);
        self
    }

    pub fn set_full_checksum(&mut self, full: bool) {
        if full {
            self.header.flags.insert(Flags::CHK);
        } else {
            self.header.flags.remove(Flags::CHK);
        }
    }

    /// Piggyback an acknowledgment without changing the segment type.
    pub fn set_ack(&mut self, ack: u8) {
        self.header.set_ack(ack);
    }

    pub fn kind(&self) -> SegmentKind {
        self.body.kind()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn flags(&self) -> Flags {
        self.header.flags
    }

    pub fn header_length(&self) -> u8 {
        self.header.header_len
    }

    pub fn sequence_number(&self) -> u8 {
        self.header.seq
    }

    pub fn acknowledgment_number(&self) -> Option<u8> {
        self.header.ack
    }

    /// Total encoded length in bytes.
    pub fn length(&self) -> u16 {
        let payload = match &self.body {
            Body::Dat(data) => data.len(),
            _ => 0,
        };
        (self.header.header_len as usize + payload) as u16
    }

    /// DAT payload; empty for every other type.
    pub fn payload(&self) -> &[u8] {
        match &self.body {
            Body::Dat(data) => data,
            _ => &[],
        }
    }

    /// EAK out-of-sequence list; empty for every other type.
    pub fn out_of_sequence(&self) -> &[u8] {
        match &self.body {
            Body::Eak(acks) => acks,
            _ => &[],
        }
    }

    pub fn syn_parameters(&self) -> Option<&SynParameters> {
        match &self.body {
            Body::Syn(params) => Some(params),
            _ => None,
        }
    }

    pub fn retransmission_counter(&self) -> u32 {
        self.retx
    }

    pub fn set_retransmission_counter(&mut self, n: u32) {
        self.retx = n;
    }

    /// 记录一次重传，返回新的计数
    pub fn record_retransmission(&mut self) -> u32 {
        self.retx = self.retx.saturating_add(1);
        self.retx
    }

    /// Serializes the segment with a zeroed checksum field.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.length() as usize];
        self.header.write(&mut out);
        match &self.body {
            Body::Syn(params) => params.write(&mut out),
            Body::Eak(acks) => out[4..4 + acks.len()].copy_from_slice(acks),
            Body::Dat(data) => out[HEADER_LEN..].copy_from_slice(data),
            Body::Nul | Body::Rst | Body::Clz | Body::Fin | Body::Ack => {}
        }
        out
    }

    /// Serializes the segment and fills in its checksum. This is the form to send.
    pub fn to_bytes_with_checksum(&self) -> Vec<u8> {
        let mut out = self.to_bytes();
        let range = self.header.checksum_range();
        let mut sum = checksum(&out[..self.checksum_coverage()]);
        // 字段起始于奇数偏移时（奇数个 EAK 条目），两个字节分属相邻的两个 16 位字，
        // 交换字节序后整体求和才为零
        if range.start % 2 == 1 {
            sum = sum.swap_bytes();
        }
        out[range].copy_from_slice(&sum.to_be_bytes());
        out
    }

    /// Number of leading bytes the checksum covers.
    pub fn checksum_coverage(&self) -> usize {
        if self.header.flags.chk() {
            self.length() as usize
        } else {
            self.header.header_len as usize
        }
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Decodes a whole datagram.
    pub fn parse(bytes: &[u8]) -> Result<Segment, InvalidSegment> {
        Self::decode(bytes).inspect_err(|err| {
            debug!(reason = %err.reason(), len = bytes.len(), "丢弃无效段");
        })
    }

    /// Decodes `len` bytes of `bytes` starting at `offset`.
    pub fn parse_at(bytes: &[u8], offset: usize, len: usize) -> Result<Segment, InvalidSegment> {
        let region = offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or(InvalidReason::OutOfBounds {
                offset,
                len,
                available: bytes.len(),
            })
            .inspect_err(|reason| debug!(%reason, "丢弃无效段"))?;
        Self::parse(region)
    }

    #[tracing::instrument(level = "trace", skip(bytes), fields(len = bytes.len()))]
    fn decode(bytes: &[u8]) -> Result<Segment, InvalidSegment> {
        let len = bytes.len();
        if len < HEADER_LEN {
            return Err(InvalidReason::TooShort { len }.into());
        }

        let flags = Flags::from(bytes[0]);
        let kind = SegmentKind::resolve(flags, len).ok_or(InvalidReason::UnknownType {
            flags: flags.bits(),
        })?;
        trace!(%kind, ?flags, "解析段类型");

        let header = Header::read(bytes);
        let header_len = header.header_len as usize;
        let consistent = match kind {
            SegmentKind::Syn => header_len == SYN_HEADER_LEN && len == header_len,
            SegmentKind::Eak => header_len > HEADER_LEN && len == header_len,
            SegmentKind::Dat => header_len == HEADER_LEN && len <= u16::MAX as usize,
            SegmentKind::Nul
            | SegmentKind::Rst
            | SegmentKind::Clz
            | SegmentKind::Fin
            | SegmentKind::Ack => header_len == HEADER_LEN && len == header_len,
        };
        if !consistent {
            return Err(InvalidReason::LengthMismatch {
                header_len: header.header_len,
                len,
            }
            .into());
        }

        let coverage = if flags.chk() { len } else { header_len };
        let residue = checksum(&bytes[..coverage]);
        if residue != 0 {
            return Err(InvalidReason::Checksum { residue }.into());
        }

        let body = match kind {
            SegmentKind::Syn => Body::Syn(SynParameters::read(bytes)),
            SegmentKind::Nul => Body::Nul,
            SegmentKind::Eak => Body::Eak(bytes[4..header_len - 2].to_vec()),
            SegmentKind::Rst => Body::Rst,
            SegmentKind::Clz => Body::Clz,
            SegmentKind::Fin => Body::Fin,
            SegmentKind::Ack => Body::Ack,
            SegmentKind::Dat => Body::Dat(bytes[HEADER_LEN..].to_vec()),
        };

        Ok(Segment {
            header,
            body,
            retx: 0,
        })
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [ SEQ = {}, ACK = ", self.kind(), self.sequence_number())?;
        match self.acknowledgment_number() {
            Some(ack) => write!(f, "{ack}")?,
            None => write!(f, "N/A")?,
        }
        write!(f, ", LEN = {} ]", self.length())
    }
}
