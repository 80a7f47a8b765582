//! Fuzz target: `codec::decode_line`
//!
//! Arbitrary text must decode or fail cleanly.  Anything that decodes must
//! re-encode within the line bound.
//!
//! cargo fuzz run fuzz_decode_line

#![no_main]

use imu_tracker::codec::{decode_line, Encoder, JsonCodec, Line, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(msg) = decode_line(text) {
        let mut line = Line::new();
        JsonCodec
            .encode(&msg, &mut line)
            .expect("decoded message must re-encode");
        assert!(line.len() <= MAX_LINE_LEN);
    }
});
