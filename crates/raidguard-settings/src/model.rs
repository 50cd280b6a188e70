use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `raidguard.toml` schema v1.
///
/// Every key is optional; unset keys fall back to built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RaidguardConfigV1 {
    /// Optional schema string for tooling (`raidguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Directory holding one sub-directory per assessment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_root: Option<String>,

    /// File name of the policy artifact inside the assessment directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_file: Option<String>,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub verdict: VerdictConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScannerConfig {
    /// Scanner executable (looked up on `PATH` when not a path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Scanner subcommand (the raid to run).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<String>,

    /// `count` pipes scanner output through the marker-count filter;
    /// `raw` reads scanner output directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Upper bound on scanner runtime, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Counting filter executable used in `count` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_program: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VerdictConfig {
    /// Failure marker searched for in scanner output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}
