use crate::model::RaidguardConfigV1;
use camino::Utf8PathBuf;
use raidguard_domain::policy::{AssessmentPolicy, DEFAULT_MARKER};
use raidguard_types::SCHEMA_CONFIG_V1;
use std::time::Duration;

pub const DEFAULT_ARTIFACT_ROOT: &str = ".raidguard/assessments";
pub const DEFAULT_ARTIFACT_FILE: &str = "raid-wireframe-config.yml";
pub const DEFAULT_SCANNER_PROGRAM: &str = "privateer";
pub const DEFAULT_SCANNER_SUBCOMMAND: &str = "sally";
pub const DEFAULT_FILTER_PROGRAM: &str = "grep";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Longest accepted scanner timeout: one day.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub artifact_root: Option<String>,
    pub program: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// How scanner output reaches the interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// `<scanner> | <filter> -c <marker>`; the interpreter parses the count.
    Count,
    /// Scanner stdout as-is; the interpreter counts marker lines itself.
    Raw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSettings {
    pub root: Utf8PathBuf,
    pub file_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerSettings {
    pub program: String,
    pub subcommand: String,
    pub output: OutputMode,
    pub timeout: Duration,
    pub filter_program: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub artifacts: ArtifactSettings,
    pub scanner: ScannerSettings,
    pub policy: AssessmentPolicy,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            artifacts: ArtifactSettings {
                root: Utf8PathBuf::from(DEFAULT_ARTIFACT_ROOT),
                file_name: DEFAULT_ARTIFACT_FILE.to_string(),
            },
            scanner: ScannerSettings {
                program: DEFAULT_SCANNER_PROGRAM.to_string(),
                subcommand: DEFAULT_SCANNER_SUBCOMMAND.to_string(),
                output: OutputMode::Count,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                filter_program: DEFAULT_FILTER_PROGRAM.to_string(),
            },
            policy: AssessmentPolicy {
                marker: DEFAULT_MARKER.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveSettings,
}

pub fn resolve_config(
    cfg: RaidguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported settings schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let mut effective = EffectiveSettings::default();

    if let Some(root) = overrides.artifact_root.or(cfg.artifact_root) {
        effective.artifacts.root = Utf8PathBuf::from(non_empty("artifact_root", root)?);
    }
    if let Some(file_name) = cfg.artifact_file {
        effective.artifacts.file_name = validate_file_name(file_name)?;
    }

    let scanner = cfg.scanner;
    if let Some(program) = overrides.program.or(scanner.program) {
        effective.scanner.program = non_empty("scanner.program", program)?;
    }
    if let Some(subcommand) = scanner.subcommand {
        effective.scanner.subcommand = non_empty("scanner.subcommand", subcommand)?;
    }
    if let Some(output) = scanner.output.as_deref() {
        effective.scanner.output = parse_output_mode(output)?;
    }
    if let Some(secs) = overrides.timeout_secs.or(scanner.timeout_secs) {
        if secs == 0 {
            anyhow::bail!("scanner.timeout_secs must be greater than zero");
        }
        if secs > MAX_TIMEOUT_SECS {
            anyhow::bail!("scanner.timeout_secs must be at most {MAX_TIMEOUT_SECS}, got {secs}");
        }
        effective.scanner.timeout = Duration::from_secs(secs);
    }
    if let Some(filter) = scanner.filter_program {
        effective.scanner.filter_program = non_empty("scanner.filter_program", filter)?;
    }

    if let Some(marker) = cfg.verdict.marker {
        effective.policy.marker = non_empty("verdict.marker", marker)?;
    }

    Ok(ResolvedConfig { effective })
}

fn non_empty(key: &str, value: String) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        anyhow::bail!("{key} must not be empty");
    }
    Ok(value)
}

fn validate_file_name(name: String) -> anyhow::Result<String> {
    let name = non_empty("artifact_file", name)?;
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        anyhow::bail!("artifact_file must be a bare file name, got {name:?}");
    }
    Ok(name)
}

fn parse_output_mode(v: &str) -> anyhow::Result<OutputMode> {
    match v {
        "count" => Ok(OutputMode::Count),
        "raw" => Ok(OutputMode::Raw),
        other => anyhow::bail!("unknown scanner.output: {other} (expected 'count' or 'raw')"),
    }
}
