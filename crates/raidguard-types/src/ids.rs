//! Stable identifiers: configuration keys, property names and failure codes.
//!
//! Property names and codes are short snake_case tokens.

// Configuration
pub const CONFIG_KEY_POLICY: &str = "yaml";

// Subject props
pub const PROP_ID: &str = "id";
pub const PROP_POLICY_SHA256: &str = "policy_sha256";

// Observation / evidence props
pub const PROP_SUBJECT: &str = "subject";
pub const PROP_MARKER: &str = "marker";
pub const PROP_MARKER_COUNT: &str = "marker_count";

// Execution failure codes
pub const CODE_SCANNER_INVOCATION: &str = "scanner_invocation";
pub const CODE_SCANNER_TIMEOUT: &str = "scanner_timeout";
pub const CODE_OUTPUT_PARSE: &str = "output_parse";
