//! CLI entry point for raidguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All provider logic lives in the `raidguard-app` crate.

mod logging;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logging::{LogConfig, LogFormat};
use raidguard_app::{
    Provider, RaidProvider, execute_exit_code, parse_evaluate_result, serialize_evaluate_result,
    serialize_execute_result,
};
use raidguard_settings::{EffectiveSettings, Overrides};
use raidguard_types::{
    AssessmentContext, AssessmentId, Configuration, EvaluateInput, EvaluateResult, ExecuteInput,
    ExecuteResult, InvalidAssessmentId,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "raidguard",
    version,
    about = "Compliance provider that assesses policies with Privateer raids"
)]
struct Cli {
    /// Path to raidguard settings TOML (missing file means defaults).
    #[arg(long, default_value = "raidguard.toml")]
    settings: Utf8PathBuf,

    /// Override the directory holding per-assessment policy artifacts.
    #[arg(long)]
    artifact_root: Option<String>,

    /// Override the scanner executable.
    #[arg(long)]
    scanner: Option<String>,

    /// Override the scanner timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is unset (e.g. `info`, `raidguard_app=debug`).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format (always written to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discovery: write the policy artifact and print the subjects.
    Evaluate {
        #[command(flatten)]
        assessment: AssessmentArg,

        #[command(flatten)]
        config: ConfigArgs,

        /// Where to write the JSON result (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Execution: run the raid against a previously written artifact.
    Execute {
        #[command(flatten)]
        assessment: AssessmentArg,

        /// Evaluate result JSON whose subjects the observation is attributed to.
        #[arg(long)]
        subjects: Option<Utf8PathBuf>,

        /// Where to write the JSON result (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Discovery followed by execution for the same assessment.
    Run {
        #[command(flatten)]
        assessment: AssessmentArg,

        #[command(flatten)]
        config: ConfigArgs,

        /// Where to write the execute JSON result (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Print the JSON schema of a result or of the settings file.
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

#[derive(Args, Debug)]
struct AssessmentArg {
    /// Assessment id shared by discovery and execution ([A-Za-z0-9._-]).
    #[arg(long = "assessment", value_parser = parse_assessment_id)]
    id: AssessmentId,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON object of configuration keys to string values.
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Read the `yaml` policy text from a file.
    #[arg(long)]
    policy: Option<Utf8PathBuf>,

    /// Set one configuration key (repeatable; applied last).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    Evaluate,
    Execute,
    Settings,
}

fn parse_assessment_id(s: &str) -> Result<AssessmentId, InvalidAssessmentId> {
    AssessmentId::parse(s)
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    };
    let result = logging::init_logging(&log_config).and_then(|()| dispatch(&cli));

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("raidguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Run the selected command and return the process exit code.
fn dispatch(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Evaluate {
            assessment,
            config,
            out,
        } => {
            let provider = RaidProvider::new(&load_settings(cli)?);
            let result = evaluate(&provider, &assessment.id, config)?;
            emit(out.as_deref(), &serialize_evaluate_result(&result)?)?;
            Ok(0)
        }
        Commands::Execute {
            assessment,
            subjects,
            out,
        } => {
            let provider = RaidProvider::new(&load_settings(cli)?);
            let subjects = match subjects {
                Some(path) => read_subjects(path)?,
                None => EvaluateResult::default(),
            };
            let result = execute(&provider, &assessment.id, subjects)?;
            emit(out.as_deref(), &serialize_execute_result(&result)?)?;
            Ok(execute_exit_code(&result))
        }
        Commands::Run {
            assessment,
            config,
            out,
        } => {
            let provider = RaidProvider::new(&load_settings(cli)?);
            let discovered = evaluate(&provider, &assessment.id, config)?;
            let result = execute(&provider, &assessment.id, discovered)?;
            emit(out.as_deref(), &serialize_execute_result(&result)?)?;
            Ok(execute_exit_code(&result))
        }
        Commands::Schema { kind } => {
            let schema = match kind {
                SchemaKind::Evaluate => schemars::schema_for!(EvaluateResult),
                SchemaKind::Execute => schemars::schema_for!(ExecuteResult),
                SchemaKind::Settings => schemars::schema_for!(raidguard_settings::RaidguardConfigV1),
            };
            let mut json = serde_json::to_string_pretty(&schema).context("serialize schema")?;
            json.push('\n');
            print!("{json}");
            Ok(0)
        }
    }
}

fn evaluate(
    provider: &RaidProvider,
    id: &AssessmentId,
    args: &ConfigArgs,
) -> anyhow::Result<EvaluateResult> {
    let configuration = build_configuration(args)?;
    let context = AssessmentContext::new(id.clone());
    let result = provider
        .evaluate(&context, &EvaluateInput::new(configuration))
        .with_context(|| format!("evaluate assessment {id}"))?;
    info!(assessment = %id, subjects = result.subjects.len(), "evaluate finished");
    Ok(result)
}

fn execute(
    provider: &RaidProvider,
    id: &AssessmentId,
    discovered: EvaluateResult,
) -> anyhow::Result<ExecuteResult> {
    let context = AssessmentContext::new(id.clone());
    let input = ExecuteInput {
        subjects: discovered.subjects,
    };
    let result = provider
        .execute(&context, &input)
        .with_context(|| format!("execute assessment {id}"))?;
    info!(assessment = %id, status = ?result.status, "execute finished");
    Ok(result)
}

fn load_settings(cli: &Cli) -> anyhow::Result<EffectiveSettings> {
    let cfg = if cli.settings.exists() {
        let text = std::fs::read_to_string(&cli.settings)
            .with_context(|| format!("read settings: {}", cli.settings))?;
        raidguard_settings::parse_config_toml(&text)
            .with_context(|| format!("parse settings: {}", cli.settings))?
    } else {
        raidguard_settings::RaidguardConfigV1::default()
    };

    let overrides = Overrides {
        artifact_root: cli.artifact_root.clone(),
        program: cli.scanner.clone(),
        timeout_secs: cli.timeout_secs,
    };
    let resolved = raidguard_settings::resolve_config(cfg, overrides).context("resolve settings")?;
    Ok(resolved.effective)
}

/// `--config` file first, then `--policy`, then each `--set`.
fn build_configuration(args: &ConfigArgs) -> anyhow::Result<Configuration> {
    let mut configuration = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read configuration: {path}"))?;
            serde_json::from_str::<Configuration>(&text)
                .with_context(|| format!("parse configuration (JSON object of strings): {path}"))?
        }
        None => Configuration::new(),
    };
    if let Some(path) = &args.policy {
        let policy =
            std::fs::read_to_string(path).with_context(|| format!("read policy: {path}"))?;
        configuration.insert(raidguard_types::ids::CONFIG_KEY_POLICY.to_string(), policy);
    }
    configuration.extend(args.set.iter().cloned());
    Ok(configuration)
}

fn read_subjects(path: &Utf8Path) -> anyhow::Result<EvaluateResult> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read subjects: {path}"))?;
    parse_evaluate_result(&text).with_context(|| format!("subjects file: {path}"))
}

fn emit(out: Option<&Utf8Path>, data: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create directory: {parent}"))?;
            }
            std::fs::write(path, data).with_context(|| format!("write result: {path}"))
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data).context("write result to stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}
