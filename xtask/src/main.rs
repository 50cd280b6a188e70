//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use raidguard_types::{SCHEMA_CONFIG_V1, SCHEMA_EVALUATE_RESULT_V1, SCHEMA_EXECUTE_RESULT_V1};
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        parent.to_path_buf()
    } else {
        manifest_dir
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Get the golden fixtures directory path.
fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    id: &'static str,
    generate: fn() -> schemars::Schema,
}

impl SchemaSpec {
    fn filename(&self) -> String {
        format!("{}.json", self.id)
    }
}

fn generate_evaluate_schema() -> schemars::Schema {
    schema_for!(raidguard_types::EvaluateResult)
}

fn generate_execute_schema() -> schemars::Schema {
    schema_for!(raidguard_types::ExecuteResult)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(raidguard_settings::RaidguardConfigV1)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            id: SCHEMA_EVALUATE_RESULT_V1,
            generate: generate_evaluate_schema,
        },
        SchemaSpec {
            id: SCHEMA_EXECUTE_RESULT_V1,
            generate: generate_execute_schema,
        },
        SchemaSpec {
            id: SCHEMA_CONFIG_V1,
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn compile(spec_id: &str) -> anyhow::Result<jsonschema::Validator> {
    let spec = schema_specs()
        .into_iter()
        .find(|s| s.id == spec_id)
        .with_context(|| format!("unknown schema {spec_id}"))?;
    let value = serde_json::to_value((spec.generate)()).context("schema to JSON")?;
    jsonschema::draft202012::new(&value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema {spec_id}: {e}"))
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename());

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate golden fixtures against the result schemas");
    eprintln!("  conform-full      Full conformance: golden fixtures + raidguard binary output");
}

/// Failure codes are lowercase snake_case tokens.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Structural rules of an execute result that a schema cannot express.
fn execute_invariants(label: &str, value: &Value, errors: &mut Vec<String>) {
    let array = |key: &str| value.get(key).and_then(Value::as_array).cloned();
    let observations = array("observations").unwrap_or_default();
    let findings = array("findings").unwrap_or_default();
    let logs = array("logs").unwrap_or_default();

    match value.get("status").and_then(Value::as_str) {
        Some("SUCCESS") => {
            if observations.len() != 1 {
                errors.push(format!(
                    "{label}: SUCCESS result must carry exactly one observation, found {}",
                    observations.len()
                ));
            }
            if logs.len() != 1 {
                errors.push(format!(
                    "{label}: SUCCESS result must carry exactly one log entry, found {}",
                    logs.len()
                ));
            }
            if findings.len() > 1 {
                errors.push(format!("{label}: at most one finding expected"));
            }
        }
        Some("FAILURE") => {
            if !(observations.is_empty() && findings.is_empty() && logs.is_empty()) {
                errors.push(format!(
                    "{label}: FAILURE result must not carry observations, findings or logs"
                ));
            }
            match value.pointer("/failure/code").and_then(Value::as_str) {
                Some(code) if is_valid_token(code) => {}
                Some(code) => errors.push(format!("{label}: failure code '{code}' is not a token")),
                None => errors.push(format!("{label}: FAILURE result lacks failure.code")),
            }
        }
        other => errors.push(format!("{label}: unexpected status {other:?}")),
    }

    let observation_ids: Vec<&str> = observations
        .iter()
        .filter_map(|o| o.get("id").and_then(Value::as_str))
        .collect();
    for (i, finding) in findings.iter().enumerate() {
        let related = finding
            .get("related_observations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if related.is_empty() {
            errors.push(format!("{label}: findings[{i}] has no related observation"));
        }
        for id in related.iter().filter_map(Value::as_str) {
            if !observation_ids.contains(&id) {
                errors.push(format!(
                    "{label}: findings[{i}] references unknown observation '{id}'"
                ));
            }
        }
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let dir = fixtures_dir();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn fixture_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Validate golden fixtures against the generated result schemas.
fn conform() -> anyhow::Result<()> {
    let evaluate = compile(SCHEMA_EVALUATE_RESULT_V1)?;
    let execute = compile(SCHEMA_EXECUTE_RESULT_V1)?;
    println!("✓ result schemas compile");

    let mut fixture_count = 0;
    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let name = fixture_name(&dir);

        let evaluate_path = dir.join("expected.evaluate.json");
        if evaluate_path.exists() {
            let value = read_json(&evaluate_path)?;
            for err in evaluate.iter_errors(&value) {
                errors.push(format!("{name}/expected.evaluate.json: schema validation: {err}"));
            }
        }

        let execute_path = dir.join("expected.execute.json");
        if execute_path.exists() {
            let value = read_json(&execute_path)?;
            for err in execute.iter_errors(&value) {
                errors.push(format!("{name}/expected.execute.json: schema validation: {err}"));
            }
            execute_invariants(&format!("{name}/expected.execute.json"), &value, &mut errors);
        }

        fixture_count += 1;
        println!("  ✓ {name} checked");
    }

    if fixture_count == 0 {
        bail!("No fixtures found in {}", fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {fixture_count} fixtures pass conformance checks!");
    Ok(())
}

/// Full conformance: golden fixtures + raidguard binary output.
///
/// Runs the built binary on every fixture with a stand-in scanner that replays
/// `scanner-output.txt`, validates the produced results against the schemas,
/// and compares them with the golden files after normalization.
#[cfg(unix)]
fn conform_full() -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    conform()?;

    println!("\n--- Full conformance: raidguard binary output ---\n");

    let execute = compile(SCHEMA_EXECUTE_RESULT_V1)?;
    let raidguard_bin = project_root().join("target").join("debug").join("raidguard");
    if !raidguard_bin.exists() {
        bail!(
            "raidguard binary not found at {}.\n\
            Run `cargo build -p raidguard-cli` first.",
            raidguard_bin.display()
        );
    }

    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let name = fixture_name(&dir);
        let recorded = dir.join("scanner-output.txt");
        if !recorded.exists() {
            continue;
        }

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let scanner = temp_dir.path().join("privateer");
        fs::write(
            &scanner,
            format!("#!/bin/sh\ncat '{}'\n", recorded.display()),
        )?;
        fs::set_permissions(&scanner, fs::Permissions::from_mode(0o755))?;

        let run = |args: &[&str]| {
            std::process::Command::new(&raidguard_bin)
                .arg("--settings")
                .arg(temp_dir.path().join("absent.toml"))
                .arg("--artifact-root")
                .arg(temp_dir.path().join("assessments"))
                .arg("--scanner")
                .arg(&scanner)
                .args(args)
                .output()
                .with_context(|| format!("Failed to run raidguard on fixture '{name}'"))
        };

        let config = dir.join("configuration.json");
        let output = run(&[
            "run",
            "--assessment",
            &name,
            "--config",
            &config.to_string_lossy(),
        ])?;

        // 0 compliant, 2 non-compliant; anything else is an execution failure.
        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{name}': raidguard exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let produced: Value = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse output for fixture '{name}'"))?;
        for err in execute.iter_errors(&produced) {
            errors.push(format!("fixture '{name}': schema validation: {err}"));
        }
        execute_invariants(&format!("fixture '{name}'"), &produced, &mut errors);

        let golden_path = dir.join("expected.execute.json");
        if golden_path.exists() {
            let golden = read_json(&golden_path)?;
            if raidguard_test_util::normalize_nondeterministic(produced) != golden {
                errors.push(format!(
                    "fixture '{name}': output differs from golden file expected.execute.json"
                ));
            } else {
                println!("  ✓ fixture '{name}' matches golden execute result");
            }
        } else {
            println!("  ✓ fixture '{name}' produces a valid result (no golden file)");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

#[cfg(not(unix))]
fn conform_full() -> anyhow::Result<()> {
    bail!("conform-full needs a POSIX shell for the stand-in scanner")
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.id);
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokens() {
        assert!(is_valid_token("scanner_timeout"));
        assert!(is_valid_token("output_parse"));
        assert!(!is_valid_token("Scanner"));
        assert!(!is_valid_token("_x"));
        assert!(!is_valid_token(""));
    }

    #[test]
    fn invariants_accept_linked_finding() {
        let value = json!({
            "status": "SUCCESS",
            "observations": [{ "id": "o-1" }],
            "findings": [{ "id": "f-1", "related_observations": ["o-1"] }],
            "logs": [{}]
        });
        let mut errors = Vec::new();
        execute_invariants("t", &value, &mut errors);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn invariants_reject_dangling_finding_and_dirty_failure() {
        let dangling = json!({
            "status": "SUCCESS",
            "observations": [{ "id": "o-1" }],
            "findings": [{ "id": "f-1", "related_observations": ["o-9"] }],
            "logs": [{}]
        });
        let mut errors = Vec::new();
        execute_invariants("t", &dangling, &mut errors);
        assert_eq!(errors.len(), 1);

        let dirty_failure = json!({
            "status": "FAILURE",
            "observations": [{ "id": "o-1" }],
            "findings": [],
            "logs": [],
            "failure": { "code": "Bad Code", "message": "x" }
        });
        let mut errors = Vec::new();
        execute_invariants("t", &dirty_failure, &mut errors);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn schema_ids_are_unique() {
        let mut ids: Vec<_> = schema_specs().iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), schema_specs().len());
    }
}
