//! Fuzz target for assessment id validation.
//!
//! Goal: accepted ids are always safe single path components.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_assessment_id
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use raidguard_types::AssessmentId;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(id) = AssessmentId::parse(text)
    {
        let s = id.as_str();
        assert!(!s.is_empty() && s.len() <= 128);
        assert!(s != "." && s != "..");
        assert!(!s.contains('/') && !s.contains('\\'));
    }
});
