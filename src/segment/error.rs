use thiserror::Error as ThisError;

/// A datagram that must be dropped.
///
/// Every decode failure collapses into this one error so the receive path has a
/// single response; `reason` only exists for logging.
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
#[error("invalid segment ({reason})")]
pub struct InvalidSegment {
    reason: InvalidReason,
}

impl InvalidSegment {
    pub(crate) fn new(reason: InvalidReason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> InvalidReason {
        self.reason
    }
}

impl From<InvalidReason> for InvalidSegment {
    fn from(reason: InvalidReason) -> Self {
        Self::new(reason)
    }
}

/// Why a datagram was rejected.
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("{len} bytes is too short for a segment header")]
    TooShort { len: usize },
    #[error("requested range {offset}+{len} lies outside a {available} byte buffer")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
    #[error("no segment type bit is set in flags {flags:#04x}")]
    UnknownType { flags: u8 },
    #[error("header length {header_len} does not fit a {len} byte segment")]
    LengthMismatch { header_len: u8, len: usize },
    #[error("checksum over the covered region folded to {residue:#06x} instead of zero")]
    Checksum { residue: u16 },
}

/// An error that occurred while constructing an outgoing segment
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("a data segment needs at least one payload byte")]
    EmptyPayload,
    #[error("the data payload of {len} bytes does not fit into a single segment")]
    OverlyLongPayload { len: usize },
    #[error("an extended ack needs at least one out-of-sequence number")]
    NoOutOfSequenceAcks,
    #[error("{count} out-of-sequence numbers do not fit into an extended ack header")]
    TooManyOutOfSequenceAcks { count: usize },
    #[error("protocol version {version} does not fit the 4-bit version field")]
    VersionOutOfRange { version: u8 },
}
