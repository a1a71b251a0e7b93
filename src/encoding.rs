//! Text encoding detection for dump files of unknown origin.
//!
//! Detection looks at a bounded sample only. A byte-order mark wins, then
//! UTF-8 validity, then the `chardetng` statistical guess. Nothing here can
//! fail: an empty or unreadable sample degrades to UTF-8.
use std::io::{self, Read};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Number of leading bytes inspected when guessing an encoding.
pub const SAMPLE_BYTES: usize = 10_000;

/// Read up to [`SAMPLE_BYTES`] from the front of `reader`.
pub fn read_sample<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut sample = Vec::with_capacity(SAMPLE_BYTES);
    reader
        .by_ref()
        .take(SAMPLE_BYTES as u64)
        .read_to_end(&mut sample)?;
    Ok(sample)
}

pub fn detect_encoding(sample: &[u8]) -> &'static Encoding {
    if sample.is_empty() {
        return UTF_8;
    }
    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        return encoding;
    }
    if looks_like_utf8(sample) {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    detector.guess(None, true)
}

// The sample may cut a multi-byte character in half.
fn looks_like_utf8(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && sample.len() - e.valid_up_to() < 4,
    }
}
