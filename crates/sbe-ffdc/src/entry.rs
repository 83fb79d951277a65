//! Decoded FFDC records and the per-source map they accumulate into.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::header::{FfdcHeader, Slid};
use crate::wire::{FFDC_HEADER_BYTES, WORD_BYTES};
use crate::{ProtocolError, Severity};

/// One FFDC record copied out of a response.
///
/// Owns the full record bytes (header and payload) so it outlives the
/// response buffer it was decoded from. Serialized as the raw record bytes;
/// deserialization goes through the same checks as the `TryFrom` conversions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct DiagnosticEntry {
    data: Vec<u8>,
    header: FfdcHeader,
    severity: Severity,
}

impl DiagnosticEntry {
    /// Copies a complete record (header and payload) into a new entry.
    ///
    /// Returns `None` when `record` is shorter than a header. Severity bytes
    /// outside the defined range decode as [`Severity::Undefined`]; the raw
    /// byte stays available through [`DiagnosticEntry::severity_raw`].
    #[must_use]
    pub fn from_record(record: &[u8]) -> Option<Self> {
        let header = FfdcHeader::parse(record)?;
        Some(Self::with_header(record.to_vec(), header))
    }

    fn with_header(data: Vec<u8>, header: FfdcHeader) -> Self {
        Self {
            data,
            header,
            severity: header.severity().unwrap_or_default(),
        }
    }

    /// Checks that `record` is exactly one well-formed FFDC record.
    fn checked_header(record: &[u8]) -> Result<FfdcHeader, ProtocolError> {
        let len = record.len();
        let header = FfdcHeader::parse(record).ok_or(ProtocolError::TruncatedRecord {
            offset: 0,
            declared_bytes: FFDC_HEADER_BYTES,
            remaining: len,
        })?;
        if !header.has_valid_magic() {
            return Err(ProtocolError::BadFfdcMagic {
                offset: 0,
                found: header.magic,
            });
        }

        let declared_bytes = header.total_bytes();
        if declared_bytes > len {
            return Err(ProtocolError::TruncatedRecord {
                offset: 0,
                declared_bytes,
                remaining: len,
            });
        }
        if declared_bytes < FFDC_HEADER_BYTES {
            return Err(ProtocolError::UndersizedRecord {
                offset: 0,
                length_words: header.length_words,
            });
        }
        if declared_bytes < len {
            return Err(ProtocolError::RecordLengthMismatch {
                declared_bytes,
                actual_bytes: len,
            });
        }
        Ok(header)
    }

    /// Full record bytes, header included.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Engine-reported return code.
    #[must_use]
    pub const fn return_code(&self) -> u32 {
        self.header.return_code
    }

    /// Decoded severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Severity byte exactly as it appeared on the wire.
    #[must_use]
    pub const fn severity_raw(&self) -> u8 {
        self.header.severity
    }

    /// Decoded record header.
    #[must_use]
    pub const fn header(&self) -> &FfdcHeader {
        &self.header
    }

    /// Diagnostic-source identifier of this record.
    #[must_use]
    pub const fn slid(&self) -> Slid {
        self.header.slid
    }

    /// Record bytes following the 16-byte header.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.data.get(FFDC_HEADER_BYTES..).unwrap_or_default()
    }

    /// Iterates the record as big-endian words, header included.
    ///
    /// A trailing partial word, which a decoded record never has, is skipped.
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        self.data.chunks_exact(WORD_BYTES).map(|chunk| {
            u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
        })
    }
}

/// Builds an entry from standalone record bytes, rejecting anything the
/// chain decoder would not have produced: a bad magic, or a declared length
/// that differs from the bytes supplied.
impl TryFrom<&[u8]> for DiagnosticEntry {
    type Error = ProtocolError;

    fn try_from(record: &[u8]) -> Result<Self, Self::Error> {
        let header = Self::checked_header(record)?;
        Ok(Self::with_header(record.to_vec(), header))
    }
}

impl TryFrom<Vec<u8>> for DiagnosticEntry {
    type Error = ProtocolError;

    fn try_from(record: Vec<u8>) -> Result<Self, Self::Error> {
        let header = Self::checked_header(&record)?;
        Ok(Self::with_header(record, header))
    }
}

impl From<DiagnosticEntry> for Vec<u8> {
    fn from(entry: DiagnosticEntry) -> Self {
        entry.data
    }
}

/// FFDC entries grouped by diagnostic source, each list in stream order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DiagnosticMap {
    entries: BTreeMap<Slid, Vec<DiagnosticEntry>>,
}

impl DiagnosticMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` after any entries already recorded for `slid`.
    pub fn insert(&mut self, slid: Slid, entry: DiagnosticEntry) {
        self.entries.entry(slid).or_default().push(entry);
    }

    /// Entries recorded for `slid`, in encounter order.
    #[must_use]
    pub fn get(&self, slid: Slid) -> Option<&[DiagnosticEntry]> {
        self.entries.get(&slid).map(Vec::as_slice)
    }

    /// Returns `true` when at least one entry exists for `slid`.
    #[must_use]
    pub fn contains(&self, slid: Slid) -> bool {
        self.entries.contains_key(&slid)
    }

    /// Iterates sources in ascending Slid order.
    pub fn iter(&self) -> impl Iterator<Item = (Slid, &[DiagnosticEntry])> + '_ {
        self.entries
            .iter()
            .map(|(slid, entries)| (*slid, entries.as_slice()))
    }

    /// Distinct sources present in the map.
    pub fn slids(&self) -> impl Iterator<Item = Slid> + '_ {
        self.entries.keys().copied()
    }

    /// Number of distinct sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entry has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries across all sources.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Consumes the map, returning the underlying ordered storage.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<Slid, Vec<DiagnosticEntry>> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a DiagnosticMap {
    type Item = (&'a Slid, &'a Vec<DiagnosticEntry>);
    type IntoIter = btree_map::Iter<'a, Slid, Vec<DiagnosticEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
