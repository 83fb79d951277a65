//! FFDC chain walker.
//!
//! Records are self-delimiting: each header declares the total record
//! length in words, so the scan hops from header to header until fewer than
//! a header's worth of bytes remain in the range.

use crate::header::FfdcHeader;
use crate::wire::FFDC_HEADER_BYTES;
use crate::{DiagnosticEntry, DiagnosticMap, ProtocolError};

/// Outcome of a completed chain walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainSummary {
    /// Records appended to the map.
    pub records: usize,
    /// Bytes left at the end of the range that could not hold another header.
    pub leftover_bytes: usize,
}

/// Decodes every FFDC record in `buffer[start..end]` and appends them to `map`.
///
/// Records already appended stay in `map` when a later record fails, so a
/// caller holding the map after an error still sees the diagnostics that
/// preceded the malformed record. Bytes left over once no further header
/// fits are logged and reported in the summary; they are not an error.
///
/// # Errors
///
/// - [`ProtocolError::InvalidRange`] when `start > end` or `end` is past the buffer.
/// - [`ProtocolError::BadFfdcMagic`] when a record lacks the `0xFBAD` sentinel.
/// - [`ProtocolError::UndersizedRecord`] when a record declares fewer words than its header.
/// - [`ProtocolError::TruncatedRecord`] when a record overruns `end`.
pub fn decode_ffdc_chain_into(
    buffer: &[u8],
    start: usize,
    end: usize,
    map: &mut DiagnosticMap,
) -> Result<ChainSummary, ProtocolError> {
    if start > end || end > buffer.len() {
        return Err(ProtocolError::InvalidRange {
            start,
            end,
            len: buffer.len(),
        });
    }

    tracing::debug!(start, end, "decoding FFDC chain");

    let mut offset = start;
    let mut records = 0usize;
    while end - offset >= FFDC_HEADER_BYTES {
        let remaining = end - offset;
        let header =
            FfdcHeader::parse(&buffer[offset..end]).ok_or(ProtocolError::TruncatedRecord {
                offset,
                declared_bytes: FFDC_HEADER_BYTES,
                remaining,
            })?;

        if !header.has_valid_magic() {
            return Err(ProtocolError::BadFfdcMagic {
                offset,
                found: header.magic,
            });
        }

        let total = header.total_bytes();
        if total > remaining {
            return Err(ProtocolError::TruncatedRecord {
                offset,
                declared_bytes: total,
                remaining,
            });
        }
        if total < FFDC_HEADER_BYTES {
            return Err(ProtocolError::UndersizedRecord {
                offset,
                length_words: header.length_words,
            });
        }

        let record = &buffer[offset..offset + total];
        let entry =
            DiagnosticEntry::from_record(record).ok_or(ProtocolError::TruncatedRecord {
                offset,
                declared_bytes: total,
                remaining,
            })?;
        if header.severity().is_none() {
            tracing::warn!(
                offset,
                slid = header.slid,
                severity = header.severity,
                "FFDC record carries an unknown severity"
            );
        }
        tracing::debug!(
            offset,
            slid = header.slid,
            length_words = header.length_words,
            return_code = header.return_code,
            severity = header.severity,
            "decoded FFDC record"
        );

        map.insert(header.slid, entry);
        records += 1;
        offset += total;
    }

    let leftover_bytes = end - offset;
    if leftover_bytes != 0 {
        tracing::warn!(offset, end, leftover_bytes, "unparsed bytes after FFDC chain");
    }

    Ok(ChainSummary {
        records,
        leftover_bytes,
    })
}

/// Decodes `buffer[start..end]` into a fresh map.
///
/// Use [`decode_ffdc_chain_into`] to keep the records decoded before a failure.
///
/// # Errors
///
/// Same as [`decode_ffdc_chain_into`].
pub fn decode_ffdc_chain(
    buffer: &[u8],
    start: usize,
    end: usize,
) -> Result<DiagnosticMap, ProtocolError> {
    let mut map = DiagnosticMap::new();
    decode_ffdc_chain_into(buffer, start, end, &mut map)?;
    Ok(map)
}
