//! Public entry points combining frame location and FFDC decoding.

use crate::chain::decode_ffdc_chain_into;
use crate::frame::{locate, Frame};
use crate::wire::{starts_with_ffdc_magic, WORD_BYTES};
use crate::{DecodeConfig, DiagnosticMap, ProtocolError, StatusWord};

/// Owned result of decoding one engine response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ParsedResponse {
    /// Bytes preceding the status frame.
    pub payload: Vec<u8>,
    /// Engine status for the command.
    pub status: StatusWord,
    /// Decoded FFDC, or `None` when diagnostics were not requested.
    pub diagnostics: Option<DiagnosticMap>,
}

impl ParsedResponse {
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

    /// Returns `true` when the payload length is a whole number of words.
    #[must_use]
    pub fn payload_is_word_aligned(&self) -> bool {
        self.payload.len() % WORD_BYTES == 0
    }

    /// Returns `true` when the payload itself opens with the FFDC sentinel.
    #[must_use]
    pub fn payload_starts_with_ffdc(&self) -> bool {
        starts_with_ffdc_magic(&self.payload)
    }

    /// Returns `true` when at least one FFDC entry was decoded.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics.as_ref().is_some_and(|map| !map.is_empty())
    }
}

/// Decodes `buffer`, appending any FFDC entries to a caller-owned map.
///
/// This is the form to use when partial diagnostics matter: entries decoded
/// before a malformed record stay in `map` even when an error is returned.
/// When `config.want_diagnostics` is false the map is left untouched.
///
/// # Errors
///
/// Any [`ProtocolError`] raised by [`locate`] or the chain decoder.
pub fn parse_response_into<'a>(
    buffer: &'a [u8],
    config: DecodeConfig,
    map: &mut DiagnosticMap,
) -> Result<Frame<'a>, ProtocolError> {
    let frame = locate(buffer, config.want_diagnostics)?;

    if let Some(range) = &frame.diagnostic_range {
        decode_ffdc_chain_into(buffer, range.start, range.end, map)?;
    }

    if config.decodes_nested_payload() && starts_with_ffdc_magic(frame.payload) {
        tracing::debug!(
            payload_bytes = frame.payload.len(),
            "payload carries FFDC, decoding it"
        );
        decode_ffdc_chain_into(frame.payload, 0, frame.payload.len(), map)?;
    }

    Ok(frame)
}

/// Decodes `buffer` according to `config`.
///
/// # Errors
///
/// Any [`ProtocolError`] raised by [`locate`] or the chain decoder.
pub fn parse_response_with_config(
    buffer: &[u8],
    config: DecodeConfig,
) -> Result<ParsedResponse, ProtocolError> {
    let mut map = DiagnosticMap::new();
    let frame = parse_response_into(buffer, config, &mut map)?;
    Ok(ParsedResponse {
        payload: frame.payload.to_vec(),
        status: frame.status,
        diagnostics: config.want_diagnostics.then_some(map),
    })
}

/// Decodes `buffer`, walking the trailing FFDC chain when `want_diagnostics` is set.
///
/// # Errors
///
/// Any [`ProtocolError`] raised by [`locate`] or the chain decoder.
pub fn parse_response(
    buffer: &[u8],
    want_diagnostics: bool,
) -> Result<ParsedResponse, ProtocolError> {
    parse_response_with_config(
        buffer,
        DecodeConfig::default().with_diagnostics(want_diagnostics),
    )
}
