//! Fuzz target for scanner output interpretation.
//!
//! Goal: interpreting arbitrary scanner output should **never panic**, and the
//! verdict must follow the zero/non-zero marker threshold.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_output_interpreters
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use raidguard_domain::{CountedOutput, MarkerLines, OutputInterpreter, classify};

#[derive(Arbitrary, Debug)]
struct InterpretInput {
    /// Raw scanner (or filter) output.
    output: String,
    /// Failure marker for the raw interpreter.
    marker: String,
}

fuzz_target!(|input: InterpretInput| {
    if input.output.len() > 64 * 1024 || input.marker.is_empty() || input.marker.len() > 64 {
        return;
    }

    if let Ok(verdict) = classify(&CountedOutput, &input.output) {
        assert_eq!(verdict.is_compliant(), verdict.marker_count() == 0);
    }

    let raw = MarkerLines::new(input.marker.as_str());
    let count = raw
        .marker_count(&input.output)
        .expect("raw interpretation is infallible");
    assert!(count <= input.output.lines().count() as u64);
});
