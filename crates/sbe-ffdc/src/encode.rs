//! Inverse encoder producing bit-exact engine responses.
//!
//! The decoder never needs this; it exists so collaborators and tests can
//! synthesise responses without hand-assembling words.

use crate::header::{FfdcHeader, Slid};
use crate::wire::{FFDC_HEADER_WORDS, FFDC_MAGIC, FRAME_MAGIC, MIN_RESPONSE_LEN, WORD_BYTES};
use crate::{Severity, StatusWord};

/// One FFDC record to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfdcRecord {
    /// Diagnostic-source identifier.
    pub slid: Slid,
    /// Raw severity byte.
    pub severity: u8,
    /// Engine return code.
    pub return_code: u32,
    /// Sequence id.
    pub seq_id: u16,
    /// Command class of the failing chip-op.
    pub cmd_class: u8,
    /// Command of the failing chip-op.
    pub cmd: u8,
    /// Chip type identifier.
    pub chip_id: u8,
    /// Record payload, padded with zeroes to a word boundary on encode.
    pub payload: Vec<u8>,
}

impl FfdcRecord {
    /// Creates a header-only record.
    #[must_use]
    pub const fn new(slid: Slid, severity: Severity, return_code: u32) -> Self {
        Self {
            slid,
            severity: severity.as_u8(),
            return_code,
            seq_id: 0,
            cmd_class: 0,
            cmd: 0,
            chip_id: 0,
            payload: Vec::new(),
        }
    }

    /// Replaces the severity with an arbitrary raw byte.
    #[must_use]
    pub fn with_raw_severity(mut self, severity: u8) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the command class and command fields.
    #[must_use]
    pub fn with_command(mut self, cmd_class: u8, cmd: u8) -> Self {
        self.cmd_class = cmd_class;
        self.cmd = cmd;
        self
    }

    /// Sets the sequence id.
    #[must_use]
    pub fn with_seq_id(mut self, seq_id: u16) -> Self {
        self.seq_id = seq_id;
        self
    }

    /// Sets the chip type identifier.
    #[must_use]
    pub fn with_chip_id(mut self, chip_id: u8) -> Self {
        self.chip_id = chip_id;
        self
    }

    /// Sets the payload from big-endian words.
    #[must_use]
    pub fn with_payload_words(mut self, words: &[u32]) -> Self {
        self.payload = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        self
    }

    /// Sets the payload from raw bytes.
    #[must_use]
    pub fn with_payload(mut self, bytes: &[u8]) -> Self {
        self.payload = bytes.to_vec();
        self
    }

    /// Total record length in words, header included.
    ///
    /// Saturates at `u16::MAX` for payloads the wire format cannot express.
    #[must_use]
    pub fn length_words(&self) -> u16 {
        let payload_words = self.payload.len().div_ceil(WORD_BYTES);
        u16::try_from(payload_words)
            .ok()
            .and_then(|words| words.checked_add(FFDC_HEADER_WORDS))
            .unwrap_or(u16::MAX)
    }

    /// Header that [`FfdcRecord::to_bytes`] will emit.
    #[must_use]
    pub fn header(&self) -> FfdcHeader {
        FfdcHeader {
            magic: FFDC_MAGIC,
            length_words: self.length_words(),
            seq_id: self.seq_id,
            cmd_class: self.cmd_class,
            cmd: self.cmd,
            slid: self.slid,
            severity: self.severity,
            chip_id: self.chip_id,
            return_code: self.return_code,
        }
    }

    /// Encodes header and word-padded payload.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header().to_bytes().to_vec();
        out.extend_from_slice(&self.payload);
        pad_to_word(&mut out);
        out
    }
}

/// Builds a complete response buffer from its parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseBuilder {
    payload: Vec<u8>,
    frame_tag: u16,
    status: StatusWord,
    ffdc: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a builder for a successful, payload-free response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the leading payload bytes.
    #[must_use]
    pub fn payload(mut self, bytes: &[u8]) -> Self {
        self.payload = bytes.to_vec();
        self
    }

    /// Sets the leading payload from big-endian words.
    #[must_use]
    pub fn payload_words(mut self, words: &[u32]) -> Self {
        self.payload = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        self
    }

    /// Sets the engine-defined low half of the frame header word.
    #[must_use]
    pub fn frame_tag(mut self, tag: u16) -> Self {
        self.frame_tag = tag;
        self
    }

    /// Sets the status word.
    #[must_use]
    pub fn status(mut self, status: StatusWord) -> Self {
        self.status = status;
        self
    }

    /// Appends an encoded FFDC record after the status word.
    ///
    /// The record's length field saturates as described on
    /// [`FfdcRecord::length_words`].
    #[must_use]
    pub fn record(mut self, record: &FfdcRecord) -> Self {
        self.ffdc.extend(record.to_bytes());
        self
    }

    /// Appends raw bytes after the status word, bypassing record encoding.
    #[must_use]
    pub fn raw_ffdc(mut self, bytes: &[u8]) -> Self {
        self.ffdc.extend_from_slice(bytes);
        self
    }

    /// Encodes the response.
    ///
    /// The FFDC area is zero-padded to a word boundary. A response that would
    /// be shorter than [`MIN_RESPONSE_LEN`] gets zero words between the status
    /// and the distance word, as the engine pads its own minimal frames; those
    /// bytes decode as leftover, never as records.
    ///
    /// The distance word saturates at `u32::MAX` for tails of 16 GiB or more,
    /// which the decoder then rejects as [`crate::ProtocolError::InvalidOffset`].
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut tail = Vec::with_capacity(self.ffdc.len() + 4 * WORD_BYTES);
        tail.extend_from_slice(&(FRAME_MAGIC | u32::from(self.frame_tag)).to_be_bytes());
        tail.extend_from_slice(&self.status.as_u32().to_be_bytes());
        tail.extend_from_slice(&self.ffdc);
        pad_to_word(&mut tail);

        let unpadded = self.payload.len() + tail.len() + WORD_BYTES;
        if unpadded < MIN_RESPONSE_LEN {
            let pad = (MIN_RESPONSE_LEN - unpadded).div_ceil(WORD_BYTES) * WORD_BYTES;
            tail.resize(tail.len() + pad, 0);
        }

        let distance_words = tail.len() / WORD_BYTES + 1;
        let distance_words = u32::try_from(distance_words).unwrap_or(u32::MAX);
        tail.extend_from_slice(&distance_words.to_be_bytes());

        let mut out = Vec::with_capacity(self.payload.len() + tail.len());
        out.extend_from_slice(&self.payload);
        out.extend(tail);
        out
    }
}

fn pad_to_word(bytes: &mut Vec<u8>) {
    let padded = bytes.len().div_ceil(WORD_BYTES) * WORD_BYTES;
    bytes.resize(padded, 0);
}
