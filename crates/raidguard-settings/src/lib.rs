//! Provider settings parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves settings provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{RaidguardConfigV1, ScannerConfig, VerdictConfig};
pub use resolve::{
    ArtifactSettings, EffectiveSettings, OutputMode, Overrides, ResolvedConfig, ScannerSettings,
};

/// Parse `raidguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<RaidguardConfigV1> {
    let cfg: RaidguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings used by the provider (defaults + file + overrides).
pub fn resolve_config(
    cfg: RaidguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
