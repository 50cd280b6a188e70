use std::process::Command;

#[test]
fn xtask_help_runs() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("help")
        .output()
        .expect("run xtask");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xtask commands"));
}

#[test]
fn xtask_prints_schema_ids() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("print-schema-ids")
        .output()
        .expect("run xtask");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in [
        "raidguard.evaluate.v1",
        "raidguard.execute.v1",
        "raidguard.config.v1",
    ] {
        assert!(stdout.contains(id), "missing {id}");
    }
}

#[test]
fn xtask_conform_passes_on_golden_fixtures() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("conform")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("run xtask");

    assert!(
        output.status.success(),
        "conform failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn xtask_rejects_unknown_command() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("frobnicate")
        .output()
        .expect("run xtask");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown xtask command"));
}

#[test]
fn help_lists_only_runnable_commands() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("help")
        .output()
        .expect("run xtask");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("validate-schemas"));

    let output = Command::new(exe)
        .arg("validate-schemas")
        .output()
        .expect("run xtask");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown xtask command"));
}
