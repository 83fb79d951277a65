#![no_main]

use libfuzzer_sys::fuzz_target;
use sbe_ffdc::{
    decode_ffdc_chain, locate, parse_response, parse_response_with_config, DecodeConfig,
};

fuzz_target!(|data: &[u8]| {
    let _ = parse_response(data, false);
    let _ = parse_response(data, true);
    let _ = parse_response_with_config(data, DecodeConfig::default().with_nested_payload(true));

    if let Ok(frame) = locate(data, true) {
        assert!(frame.header_offset + 8 <= data.len());
        assert_eq!(frame.payload.len(), frame.header_offset);
        if let Some(range) = frame.diagnostic_range {
            assert!(range.start <= range.end && range.end + 4 == data.len());
        }
    }

    if data.len() >= 2 {
        let split = usize::from(data[0]) % data.len();
        let _ = decode_ffdc_chain(data, split, data.len());
    }
    let _ = decode_ffdc_chain(data, 0, data.len());
});
