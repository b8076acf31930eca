use serde::Serialize;

use super::kind::SegmentKind;
use super::segment::{Body, Segment};
use super::syn::SynParameters;

/// JSON-friendly view of a decoded segment, used for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentSummary {
    pub kind: SegmentKind,
    pub flags: Vec<&'static str>,
    pub header_length: u8,
    pub seq: u8,
    pub ack: Option<u8>,
    pub length: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syn: Option<SynParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_sequence: Option<Vec<u8>>,
    /// DAT 载荷（十六进制）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_hex: Option<String>,
}

impl From<&Segment> for SegmentSummary {
    fn from(segment: &Segment) -> Self {
        let (syn, out_of_sequence, payload_hex) = match segment.body() {
            Body::Syn(params) => (Some(*params), None, None),
            Body::Eak(acks) => (None, Some(acks.clone()), None),
            Body::Dat(data) => (None, None, Some(hex::encode(data))),
            Body::Nul | Body::Rst | Body::Clz | Body::Fin | Body::Ack => (None, None, None),
        };
        Self {
            kind: segment.kind(),
            flags: segment.flags().names(),
            header_length: segment.header_length(),
            seq: segment.sequence_number(),
            ack: segment.acknowledgment_number(),
            length: segment.length(),
            syn,
            out_of_sequence,
            payload_hex,
        }
    }
}
