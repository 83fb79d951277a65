//! Decoder for SBE FIFO chip-op responses and their FFDC record chains.
//!
//! A response carries an optional payload, a status frame located through
//! the trailing distance word, and an optional chain of First-Failure Data
//! Capture records keyed by diagnostic source (Slid).

/// Wire constants and big-endian word helpers.
pub mod wire;
pub use wire::{
    is_frame_magic, read_u16_be, read_u32_be, starts_with_ffdc_magic, FFDC_HEADER_BYTES,
    FFDC_HEADER_WORDS, FFDC_MAGIC, FRAME_MAGIC, FRAME_MAGIC_MASK, MIN_RESPONSE_LEN,
    STATUS_FRAME_BYTES, WORD_BYTES,
};

/// Protocol error taxonomy.
pub mod error;
pub use error::{ProtocolError, ProtocolErrorKind};

/// Primary/secondary status word.
pub mod status;
pub use status::StatusWord;

/// FFDC record severity.
pub mod severity;
pub use severity::Severity;

/// FFDC record header layout.
pub mod header;
pub use header::{FfdcHeader, Slid};

/// Decoded FFDC entries and the per-source map.
pub mod entry;
pub use entry::{DiagnosticEntry, DiagnosticMap};

/// Status frame locator.
pub mod frame;
pub use frame::{locate, Frame};

/// FFDC chain decoder.
pub mod chain;
pub use chain::{decode_ffdc_chain, decode_ffdc_chain_into, ChainSummary};

/// Decode configuration.
pub mod config;
pub use config::DecodeConfig;

/// Response-level entry points.
pub mod response;
pub use response::{
    parse_response, parse_response_into, parse_response_with_config, ParsedResponse,
};

/// Inverse encoder for synthesising responses.
pub mod encode;
pub use encode::{FfdcRecord, ResponseBuilder};

#[cfg(test)]
use proptest as _;
