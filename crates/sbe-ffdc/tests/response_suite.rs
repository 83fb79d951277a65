//! Response decoding suite: concrete frames, error paths and property coverage.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation,
    clippy::unreadable_literal
)]

use proptest::prelude::*;
use rstest::rstest;
use sbe_ffdc::{
    decode_ffdc_chain, decode_ffdc_chain_into, locate, parse_response, DiagnosticEntry,
    DiagnosticMap, FfdcRecord, ProtocolError, ProtocolErrorKind, ResponseBuilder, Severity,
    StatusWord,
};
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn expected_map(records: &[FfdcRecord]) -> DiagnosticMap {
    let mut map = DiagnosticMap::new();
    for record in records {
        let entry = DiagnosticEntry::from_record(&record.to_bytes()).expect("full header");
        map.insert(record.slid, entry);
    }
    map
}

#[test]
fn single_predictive_record_with_failure_status() {
    let buffer = words(&[
        0xC0DE_0000,
        0x0200_0001,
        0xFBAD_0009,
        0x0000_0000,
        0xA201_0200,
        0x00A5_BA9B,
        0x0000_0001,
        0x0001_000C,
        0x0000_0000,
        0x0000_0000,
        0x0000_0000,
        0x0000_000C,
    ]);
    let parsed = parse_response(&buffer, true).expect("valid response");

    assert!(parsed.payload.is_empty());
    assert_eq!(parsed.primary(), 0x0200);
    assert_eq!(parsed.secondary(), 0x0001);
    assert!(!parsed.status.is_success());

    let map = parsed.diagnostics.expect("diagnostics requested");
    assert_eq!(map.len(), 1);
    let entries = map.get(0xA201).expect("slid present");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity(), Severity::Predictive);
    assert_eq!(entries[0].return_code(), 0x00A5_BA9B);
    assert_eq!(entries[0].data().len(), 36);
}

#[test]
fn builder_matches_hand_assembled_frame() {
    let record = FfdcRecord::new(0xA201, Severity::Predictive, 0x00A5_BA9B)
        .with_payload_words(&[1, 0x0001_000C, 0, 0, 0]);
    let built = ResponseBuilder::new()
        .status(StatusWord::from_u32(0x0200_0001))
        .record(&record)
        .build();
    let parsed = parse_response(&built, true).expect("valid response");
    assert_eq!(parsed.diagnostics, Some(expected_map(&[record])));
    assert_eq!(&built[built.len() - 4..], &12u32.to_be_bytes());
}

#[test]
fn corrupt_first_magic_yields_empty_map() {
    let mut buffer = ResponseBuilder::new()
        .payload_words(&[0xAAAA_5555])
        .status(StatusWord::new(0x00FE, 0x000A))
        .record(&FfdcRecord::new(1, Severity::Recovered, 0x11))
        .record(&FfdcRecord::new(2, Severity::Unrecoverable, 0x22))
        .build();
    let frame = locate(&buffer, true).expect("valid frame");
    let range = frame.diagnostic_range.expect("ffdc present");
    buffer[range.start] = 0x0B;

    let mut map = DiagnosticMap::new();
    let err = decode_ffdc_chain_into(&buffer, range.start, range.end, &mut map)
        .expect_err("first record is corrupt");
    assert_eq!(
        err,
        ProtocolError::BadFfdcMagic {
            offset: range.start,
            found: 0x0BAD,
        }
    );
    assert_eq!(err.kind(), ProtocolErrorKind::BadFfdcMagic);
    assert!(map.is_empty());
    assert_eq!(parse_response(&buffer, true), Err(err));
}

#[test]
fn shared_slid_keeps_encounter_order() {
    let records = [
        FfdcRecord::new(0x0005, Severity::Recovered, 3),
        FfdcRecord::new(0x0005, Severity::Predictive, 1),
        FfdcRecord::new(0x0005, Severity::Unrecoverable, 2),
    ];
    let buffer = records
        .iter()
        .fold(ResponseBuilder::new(), |builder, record| builder.record(record))
        .build();
    let map = parse_response(&buffer, true)
        .expect("valid response")
        .diagnostics
        .expect("diagnostics requested");
    let severities: Vec<Severity> = map
        .get(0x0005)
        .expect("slid present")
        .iter()
        .map(DiagnosticEntry::severity)
        .collect();
    assert_eq!(
        severities,
        vec![Severity::Recovered, Severity::Predictive, Severity::Unrecoverable]
    );
}

#[test]
fn distance_word_is_outside_diagnostic_range() {
    let buffer = ResponseBuilder::new()
        .record(&FfdcRecord::new(1, Severity::Recovered, 1))
        .build();
    let range = locate(&buffer, true)
        .expect("valid frame")
        .diagnostic_range
        .expect("ffdc present");
    assert_eq!(range, 8..buffer.len() - 4);

    let mut map = DiagnosticMap::new();
    let summary = decode_ffdc_chain_into(&buffer, range.start, range.end, &mut map)
        .expect("valid chain");
    assert_eq!(summary.records, 1);
    assert_eq!(summary.leftover_bytes, 0);
}

#[rstest]
#[case::empty(&[])]
#[case::one_word(&[0xC0, 0xDE, 0x00, 0x00])]
#[case::three_words(&[0xC0, 0xDE, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3])]
fn undersized_buffers_are_too_short(#[case] buffer: &[u8]) {
    let err = parse_response(buffer, true).expect_err("too short");
    assert_eq!(
        err,
        ProtocolError::TooShort {
            len: buffer.len(),
            minimum: 16,
        }
    );
    assert!(!err.is_chain_error());
}

#[test]
fn error_display_carries_context() {
    let buffer = words(&[0x1234_5678, 0, 0, 2]);
    let err = parse_response(&buffer, false).expect_err("bad frame magic");
    assert_eq!(err.to_string(), "invalid frame header 0x00000000 at offset 0x8");
}

fn record_strategy() -> impl Strategy<Value = FfdcRecord> {
    (
        any::<u16>(),
        0u8..4,
        any::<u32>(),
        any::<(u8, u8)>(),
        prop::collection::vec(any::<u32>(), 0..12),
    )
        .prop_map(|(slid, severity, rc, (cmd_class, cmd), payload)| {
            FfdcRecord::new(slid, Severity::Undefined, rc)
                .with_raw_severity(severity)
                .with_command(cmd_class, cmd)
                .with_payload_words(&payload)
        })
}

proptest! {
    #[test]
    fn property_encoded_responses_round_trip(
        payload in prop::collection::vec(any::<u32>(), 0..16),
        status in any::<u32>(),
        records in prop::collection::vec(record_strategy(), 0..6),
    ) {
        let buffer = records
            .iter()
            .fold(
                ResponseBuilder::new().payload_words(&payload).status(StatusWord::from_u32(status)),
                |builder, record| builder.record(record),
            )
            .build();

        let parsed = parse_response(&buffer, true).expect("encoded response is valid");
        prop_assert_eq!(parsed.payload, words(&payload));
        prop_assert_eq!(parsed.status.as_u32(), status);

        let map = parsed.diagnostics.expect("diagnostics requested");
        prop_assert_eq!(map.entry_count(), records.len());
        for (slid, entries) in map.iter() {
            let expected: Vec<&FfdcRecord> =
                records.iter().filter(|record| record.slid == slid).collect();
            prop_assert_eq!(entries.len(), expected.len());
            for (entry, record) in entries.iter().zip(expected) {
                prop_assert_eq!(entry.return_code(), record.return_code);
                prop_assert_eq!(Some(entry.severity()), Severity::from_u8(record.severity));
                let encoded = record.to_bytes();
                prop_assert_eq!(entry.data(), encoded.as_slice());
            }
        }
        prop_assert_eq!(map, expected_map(&records));

        let frame = locate(&buffer, true).expect("encoded response is valid");
        if let Some(range) = frame.diagnostic_range {
            let mut rescanned = DiagnosticMap::new();
            let summary = decode_ffdc_chain_into(&buffer, range.start, range.end, &mut rescanned)
                .expect("encoded chain is valid");
            let pad_bytes = if payload.is_empty() && records.is_empty() { 4 } else { 0 };
            prop_assert_eq!(summary.records, records.len());
            prop_assert_eq!(summary.leftover_bytes, pad_bytes);
        } else {
            prop_assert!(records.is_empty() && !payload.is_empty());
        }
    }

    #[test]
    fn property_chain_decode_is_idempotent(
        records in prop::collection::vec(record_strategy(), 0..6),
        tail in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut bytes: Vec<u8> = records.iter().flat_map(FfdcRecord::to_bytes).collect();
        bytes.extend_from_slice(&tail);
        let first = decode_ffdc_chain(&bytes, 0, bytes.len());
        let second = decode_ffdc_chain(&bytes, 0, bytes.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn property_overlong_record_is_truncated(
        records in prop::collection::vec(record_strategy(), 1..6),
        pick in any::<prop::sample::Index>(),
        extra_words in 1u16..64,
    ) {
        let index = pick.index(records.len());
        let mut bytes: Vec<u8> = records.iter().flat_map(FfdcRecord::to_bytes).collect();
        let offset: usize = records[..index].iter().map(|record| record.to_bytes().len()).sum();
        let remaining = bytes.len() - offset;
        let length_words = (remaining / 4) as u16 + extra_words;
        bytes[offset + 2..offset + 4].copy_from_slice(&length_words.to_be_bytes());

        let mut map = DiagnosticMap::new();
        let result = decode_ffdc_chain_into(&bytes, 0, bytes.len(), &mut map);
        prop_assert_eq!(
            result,
            Err(ProtocolError::TruncatedRecord {
                offset,
                declared_bytes: usize::from(length_words) * 4,
                remaining,
            })
        );
        prop_assert_eq!(map, expected_map(&records[..index]));
    }

    #[test]
    fn property_short_buffers_are_rejected(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        prop_assert_eq!(
            parse_response(&bytes, true),
            Err(ProtocolError::TooShort { len: bytes.len(), minimum: 16 })
        );
    }

    #[test]
    fn property_arbitrary_bytes_never_panic(
        bytes in prop::collection::vec(any::<u8>(), 0..512),
        want_diagnostics in any::<bool>(),
    ) {
        if let Ok(parsed) = parse_response(&bytes, want_diagnostics) {
            prop_assert!(parsed.payload.len() + 8 <= bytes.len());
            prop_assert_eq!(parsed.diagnostics.is_some(), want_diagnostics);
        }
    }
}
