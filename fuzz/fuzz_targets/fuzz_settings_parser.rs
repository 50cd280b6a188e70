//! Fuzz target for `raidguard.toml` parsing and resolution.
//!
//! Goal: The parser and resolver should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_settings_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use raidguard_settings::{Overrides, parse_config_toml, resolve_config};

fuzz_target!(|data: &[u8]| {
    // Settings files must be UTF-8
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = parse_config_toml(text)
        && let Ok(resolved) = resolve_config(cfg, Overrides::default())
    {
        assert!(!resolved.effective.scanner.timeout.is_zero());
        assert!(!resolved.effective.policy.marker.trim().is_empty());
    }
});
