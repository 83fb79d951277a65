use thiserror::Error;

/// Coarse classification of protocol errors for callers that only branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ProtocolErrorKind {
    /// Response buffer is below the minimum frame size.
    TooShort,
    /// Distance word points outside the response buffer.
    InvalidOffset,
    /// Frame header sentinel mismatch.
    BadMagic,
    /// FFDC record sentinel mismatch.
    BadFfdcMagic,
    /// FFDC record declares more bytes than remain in the range.
    TruncatedRecord,
    /// FFDC record declares fewer bytes than its own header.
    UndersizedRecord,
    /// Standalone FFDC record bytes run past its declared length.
    RecordLengthMismatch,
    /// Caller-supplied decode range lies outside the buffer.
    InvalidRange,
}

/// Failures reported while decoding an engine response.
///
/// Every variant carries the offsets and observed values needed to log the
/// malformed response without re-reading the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ProtocolError {
    /// Buffer cannot hold even an empty status frame.
    #[error("response too short: {len} bytes, need at least {minimum}")]
    TooShort {
        /// Observed buffer length.
        len: usize,
        /// Minimum accepted length.
        minimum: usize,
    },
    /// Distance word does not leave room for a frame header and status word.
    #[error("distance word {distance_words:#x} is outside a {len}-byte response")]
    InvalidOffset {
        /// Raw distance-to-magic word from the buffer tail.
        distance_words: u32,
        /// Observed buffer length.
        len: usize,
    },
    /// Frame header word does not carry the frame sentinel.
    #[error("invalid frame header {found:#010x} at offset {offset:#x}")]
    BadMagic {
        /// Byte offset of the frame header word.
        offset: usize,
        /// Raw header word found there.
        found: u32,
    },
    /// FFDC record does not open with the FFDC sentinel.
    #[error("expected FFDC magic 0xfbad at offset {offset:#x}, found {found:#06x}")]
    BadFfdcMagic {
        /// Byte offset of the record.
        offset: usize,
        /// Magic half-word found there.
        found: u16,
    },
    /// FFDC record overruns the decode range.
    #[error(
        "FFDC record at offset {offset:#x} declares {declared_bytes} bytes, only {remaining} remain"
    )]
    TruncatedRecord {
        /// Byte offset of the record.
        offset: usize,
        /// Record length declared by its header, in bytes.
        declared_bytes: usize,
        /// Bytes left between the record and the end of the range.
        remaining: usize,
    },
    /// FFDC record length is shorter than its own header.
    #[error("FFDC record at offset {offset:#x} declares {length_words} words, below header size")]
    UndersizedRecord {
        /// Byte offset of the record.
        offset: usize,
        /// Declared record length in words.
        length_words: u16,
    },
    /// Standalone record carries bytes past its declared length.
    #[error("FFDC record declares {declared_bytes} bytes but {actual_bytes} were supplied")]
    RecordLengthMismatch {
        /// Record length declared by its header, in bytes.
        declared_bytes: usize,
        /// Bytes supplied for the record.
        actual_bytes: usize,
    },
    /// Decode range is reversed or extends past the buffer.
    #[error("decode range {start:#x}..{end:#x} is invalid for a {len}-byte buffer")]
    InvalidRange {
        /// Requested range start.
        start: usize,
        /// Requested range end.
        end: usize,
        /// Observed buffer length.
        len: usize,
    },
}

impl ProtocolError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ProtocolErrorKind {
        match self {
            Self::TooShort { .. } => ProtocolErrorKind::TooShort,
            Self::InvalidOffset { .. } => ProtocolErrorKind::InvalidOffset,
            Self::BadMagic { .. } => ProtocolErrorKind::BadMagic,
            Self::BadFfdcMagic { .. } => ProtocolErrorKind::BadFfdcMagic,
            Self::TruncatedRecord { .. } => ProtocolErrorKind::TruncatedRecord,
            Self::UndersizedRecord { .. } => ProtocolErrorKind::UndersizedRecord,
            Self::RecordLengthMismatch { .. } => ProtocolErrorKind::RecordLengthMismatch,
            Self::InvalidRange { .. } => ProtocolErrorKind::InvalidRange,
        }
    }

    /// Faults raised while walking the FFDC chain rather than locating the frame.
    #[must_use]
    pub const fn is_chain_error(&self) -> bool {
        matches!(
            self.kind(),
            ProtocolErrorKind::BadFfdcMagic
                | ProtocolErrorKind::TruncatedRecord
                | ProtocolErrorKind::UndersizedRecord
                | ProtocolErrorKind::RecordLengthMismatch
        )
    }
}
