//! Fixed 16-byte header opening every FFDC record.
//!
//! ```text
//!            Byte 0 | Byte 1 | Byte 2    | Byte 3
//! Word 0 :   magic 0xFBAD    | length in words
//! Word 1 :   sequence id     | cmd class | cmd
//! Word 2 :   slid            | severity  | chip id
//! Word 3 :   return code
//! ```

use crate::wire::{read_u16_be, read_u32_be, FFDC_HEADER_BYTES, FFDC_MAGIC, WORD_BYTES};
use crate::Severity;

/// Diagnostic-source identifier keying the diagnostic map.
pub type Slid = u16;

/// Decoded FFDC record header. All fields are host-order copies of the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FfdcHeader {
    /// Record sentinel; equals [`FFDC_MAGIC`] for well-formed records.
    pub magic: u16,
    /// Total record length in words, header included.
    pub length_words: u16,
    /// Engine sequence id.
    pub seq_id: u16,
    /// Command class of the failing chip-op.
    pub cmd_class: u8,
    /// Command of the failing chip-op.
    pub cmd: u8,
    /// Diagnostic-source identifier.
    pub slid: Slid,
    /// Raw severity byte.
    pub severity: u8,
    /// Chip type identifier.
    pub chip_id: u8,
    /// Engine-reported return code.
    pub return_code: u32,
}

impl FfdcHeader {
    /// Decodes the header occupying the first 16 bytes of `bytes`.
    ///
    /// Returns `None` when fewer than 16 bytes are available. The magic is
    /// not validated here; see [`FfdcHeader::has_valid_magic`].
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..FFDC_HEADER_BYTES)?;
        Some(Self {
            magic: read_u16_be(bytes, 0)?,
            length_words: read_u16_be(bytes, 2)?,
            seq_id: read_u16_be(bytes, 4)?,
            cmd_class: bytes[6],
            cmd: bytes[7],
            slid: read_u16_be(bytes, 8)?,
            severity: bytes[10],
            chip_id: bytes[11],
            return_code: read_u32_be(bytes, 12)?,
        })
    }

    /// Encodes the header back into its wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FFDC_HEADER_BYTES] {
        let mut out = [0u8; FFDC_HEADER_BYTES];
        out[0..2].copy_from_slice(&self.magic.to_be_bytes());
        out[2..4].copy_from_slice(&self.length_words.to_be_bytes());
        out[4..6].copy_from_slice(&self.seq_id.to_be_bytes());
        out[6] = self.cmd_class;
        out[7] = self.cmd;
        out[8..10].copy_from_slice(&self.slid.to_be_bytes());
        out[10] = self.severity;
        out[11] = self.chip_id;
        out[12..16].copy_from_slice(&self.return_code.to_be_bytes());
        out
    }

    /// Returns `true` when the header opens with the FFDC sentinel.
    #[must_use]
    pub const fn has_valid_magic(&self) -> bool {
        self.magic == FFDC_MAGIC
    }

    /// Declared record length in bytes, header included.
    #[must_use]
    pub const fn total_bytes(&self) -> usize {
        self.length_words as usize * WORD_BYTES
    }

    /// Severity decoded from the raw byte, when it is a defined value.
    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        Severity::from_u8(self.severity)
    }
}
