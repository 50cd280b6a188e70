//! Logging setup. Events go to stderr; stdout carries JSON results only.

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line.
    #[default]
    Compact,
    /// Newline-delimited JSON (for log aggregation).
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl LogConfig {
    /// `RUST_LOG` wins over the configured level.
    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|err| anyhow::anyhow!("invalid log level {:?}: {err}", self.level)),
        }
    }
}

pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = config.env_filter()?;
    let ansi = std::io::stderr().is_terminal();
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        let config = LogConfig {
            level: "raidguard=loud".to_string(),
            format: LogFormat::Compact,
        };
        // Only meaningful when RUST_LOG does not override the level.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(config.env_filter().is_err());
        }
    }

    #[test]
    fn accepts_plain_and_directive_levels() {
        for level in ["warn", "raidguard_app=debug,info"] {
            let config = LogConfig {
                level: level.to_string(),
                format: LogFormat::Json,
            };
            assert!(config.env_filter().is_ok(), "level {level}");
        }
    }
}
