//! Locates the status frame at the tail of a response buffer.
//!
//! ```text
//! [ leading payload ........................ ]
//! [ frame header: 0xC0DE | free              ]  <- header_offset
//! [ status: primary      | secondary         ]
//! [ optional FFDC chain .................... ]
//! [ distance to frame header, in words       ]  <- last word
//! ```

use std::ops::Range;

use crate::wire::{
    is_frame_magic, read_u32_be, MIN_RESPONSE_LEN, STATUS_FRAME_BYTES, WORD_BYTES,
};
use crate::{ProtocolError, StatusWord};

/// Borrowed view of a response split around its status frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Bytes preceding the frame header.
    pub payload: &'a [u8],
    /// Decoded status word.
    pub status: StatusWord,
    /// Byte offset of the frame header word.
    pub header_offset: usize,
    /// Raw frame header word; the low half is engine-defined.
    pub frame_header: u32,
    /// Byte range holding the FFDC chain, when requested and present.
    ///
    /// The trailing distance word is never part of this range.
    pub diagnostic_range: Option<Range<usize>>,
}

impl Frame<'_> {
    /// Primary status half-word.
    #[must_use]
    pub const fn primary(&self) -> u16 {
        self.status.primary
    }

    /// Secondary status half-word.
    #[must_use]
    pub const fn secondary(&self) -> u16 {
        self.status.secondary
    }
}

/// Splits `buffer` into payload, status and (optionally) the FFDC range.
///
/// The diagnostic range is only produced when `want_diagnostics` is set and
/// bytes remain between the status word and the trailing distance word.
///
/// # Errors
///
/// - [`ProtocolError::TooShort`] when `buffer` is below [`MIN_RESPONSE_LEN`].
/// - [`ProtocolError::InvalidOffset`] when the distance word points before
///   the buffer start or leaves no room for the header and status words.
/// - [`ProtocolError::BadMagic`] when the frame header lacks the sentinel.
pub fn locate(buffer: &[u8], want_diagnostics: bool) -> Result<Frame<'_>, ProtocolError> {
    let len = buffer.len();
    if len < MIN_RESPONSE_LEN {
        return Err(ProtocolError::TooShort {
            len,
            minimum: MIN_RESPONSE_LEN,
        });
    }

    let distance_offset = len - WORD_BYTES;
    let distance_words = read_u32_be(buffer, distance_offset).ok_or(ProtocolError::TooShort {
        len,
        minimum: MIN_RESPONSE_LEN,
    })?;
    let invalid_offset = ProtocolError::InvalidOffset {
        distance_words,
        len,
    };

    let header_offset = usize::try_from(distance_words)
        .ok()
        .and_then(|words| words.checked_mul(WORD_BYTES))
        .and_then(|distance_bytes| len.checked_sub(distance_bytes))
        .ok_or_else(|| invalid_offset.clone())?;
    if header_offset + 2 * WORD_BYTES > len {
        return Err(invalid_offset);
    }

    let frame_header = read_u32_be(buffer, header_offset).ok_or_else(|| invalid_offset.clone())?;
    if !is_frame_magic(frame_header) {
        return Err(ProtocolError::BadMagic {
            offset: header_offset,
            found: frame_header,
        });
    }

    let raw_status = read_u32_be(buffer, header_offset + WORD_BYTES).ok_or(invalid_offset)?;
    let status = StatusWord::from_u32(raw_status);
    let payload = &buffer[..header_offset];

    let diagnostic_range = (want_diagnostics && len > payload.len() + STATUS_FRAME_BYTES)
        .then(|| header_offset + 2 * WORD_BYTES..distance_offset);

    tracing::debug!(
        len,
        distance_words,
        header_offset,
        primary = status.primary,
        secondary = status.secondary,
        diagnostic_bytes = diagnostic_range.as_ref().map_or(0, ExactSizeIterator::len),
        "located response frame"
    );

    Ok(Frame {
        payload,
        status,
        header_offset,
        frame_header,
        diagnostic_range,
    })
}
