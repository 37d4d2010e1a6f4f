// End-to-end tests for the restodup binary.
// Run with: cargo test -p restodup-cli --test cli_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn restodup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_restodup"))
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../resolve/tests/fixtures")
}

/// Copy the shared fixtures into a scratch directory so runs can write
/// their outputs next to the config.
fn scratch() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["restaurants.tsv", "restaurants_DPL.tsv", "restaurants.dedup.toml"] {
        std::fs::copy(fixtures_dir().join(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("custom.dedup.toml");
    std::fs::write(&path, body).unwrap();
    path
}

// -------------------------------------------------------------------------
// run
// -------------------------------------------------------------------------

#[test]
fn run_prints_report_and_writes_catalog() {
    let dir = scratch();
    let output = restodup()
        .arg("run")
        .arg(dir.path().join("restaurants.dedup.toml"))
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Exact same value: name, street and city\nPrecision: 1.00000000\n"));
    assert!(out.contains("\nExact same value: phone\n"));
    assert!(out.contains("\nField matching techniques\nPrecision: 1.00000000\nRecall: 1.00000000\nF1 Score: 1.00000000\n"));

    let written = dir.path().join("restaurants_duplicates_removed.tsv");
    let text = std::fs::read_to_string(&written).unwrap();
    // Header plus nine surviving records.
    assert_eq!(text.lines().count(), 10);
    assert!(text.lines().nth(1).unwrap().starts_with("1\t\"arnie morton's of chicago\""));
    assert!(stderr(&output).contains("13 -> 9 records"));
}

#[test]
fn run_json_to_stdout() {
    let dir = scratch();
    let output = restodup()
        .arg("run")
        .arg(dir.path().join("restaurants.dedup.toml"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["meta"]["config_name"], "Los Angeles restaurants");
    assert_eq!(json["reports"].as_array().unwrap().len(), 3);
    assert_eq!(json["reports"][1]["strategy"], "phone_exact");
    assert_eq!(json["reports"][1]["detected"], 4);
    assert_eq!(json["merge"]["strategy"], "field_matching");
    assert_eq!(json["audit"]["streets"], 10);
}

#[test]
fn run_json_to_file() {
    let dir = scratch();
    let report = dir.path().join("report.json");
    let output = restodup()
        .arg("run")
        .arg(dir.path().join("restaurants.dedup.toml"))
        .arg("--output")
        .arg(&report)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["merge"]["records_after"], 9);
    // Text report still goes to stdout.
    assert!(stdout(&output).contains("Field matching techniques"));
}

#[test]
fn run_undefined_metric_exit_5() {
    let dir = scratch();
    let config = write_config(
        dir.path(),
        r#"
name = "no audit"

[input]
records = "restaurants.tsv"
gold = "restaurants_DPL.tsv"

[detection]
strategies = ["exact_fields"]
merge = "exact_fields"

[audit]
enabled = false
"#,
    );
    let output = restodup().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(5));
    let err = stderr(&output);
    assert!(err.contains("error: precision is undefined"));
    assert!(err.contains("hint:"));
}

#[test]
fn run_invalid_config_exit_3() {
    let dir = scratch();
    let config = write_config(
        dir.path(),
        "name = \"x\"\n[input]\nrecords = \"restaurants.tsv\"\ngold = \"restaurants_DPL.tsv\"\n[detection]\nmin_name_similarity = 2.0\n",
    );
    let output = restodup().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("min_name_similarity"));
}

#[test]
fn run_missing_records_exit_4() {
    let dir = scratch();
    let config = write_config(
        dir.path(),
        "name = \"x\"\n[input]\nrecords = \"nope.tsv\"\ngold = \"restaurants_DPL.tsv\"\n",
    );
    let output = restodup().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("nope.tsv"));
}

#[test]
fn run_non_dense_ids_exit_4() {
    let dir = scratch();
    std::fs::write(
        dir.path().join("gappy.tsv"),
        "id\tname\taddress\tcity\tphone\ttype\n1\ta\tb\tc\t1\tx\n3\ta\tb\tc\t1\tx\n",
    )
    .unwrap();
    let config = write_config(
        dir.path(),
        "name = \"x\"\n[input]\nrecords = \"gappy.tsv\"\ngold = \"restaurants_DPL.tsv\"\n",
    );
    let output = restodup().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("has id 3, expected 2"));
}

#[test]
fn run_missing_config_exit_2() {
    let output = restodup().arg("run").arg("/nonexistent/x.dedup.toml").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// -------------------------------------------------------------------------
// validate
// -------------------------------------------------------------------------

#[test]
fn validate_ok() {
    let dir = scratch();
    let output = restodup()
        .arg("validate")
        .arg(dir.path().join("restaurants.dedup.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stderr(&output).contains("ok (3 strategies, merge with field_matching)"));
}

#[test]
fn validate_rejects_merge_outside_strategies() {
    let dir = scratch();
    let config = write_config(
        dir.path(),
        "name = \"x\"\n[input]\nrecords = \"r.tsv\"\ngold = \"g.tsv\"\n[detection]\nstrategies = [\"phone_exact\"]\n",
    );
    let output = restodup().arg("validate").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// -------------------------------------------------------------------------
// audit / normalize
// -------------------------------------------------------------------------

#[test]
fn audit_json_survey() {
    let dir = scratch();
    let output = restodup()
        .arg("audit")
        .arg(dir.path().join("restaurants.tsv"))
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["phone_formats"]["-"], 3);
    assert_eq!(json["phone_formats"]["/"], 10);
    assert_eq!(json["cities"]["los angeles"], 4);
    assert!(json["street_types"]["blvd."].as_array().unwrap().len() >= 3);
}

#[test]
fn audit_text_survey() {
    let dir = scratch();
    let output = restodup()
        .arg("audit")
        .arg(dir.path().join("restaurants.tsv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("\nPhone separators\n"));
    assert!(out.contains("  delis: 1\n"));
}

#[test]
fn normalize_to_file() {
    let dir = scratch();
    let out_path = dir.path().join("normalized.tsv");
    let output = restodup()
        .arg("normalize")
        .arg(dir.path().join("restaurants.tsv"))
        .arg("-o")
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(text.lines().count(), 14);
    assert!(text.contains("\"435 s. la cienega boulevard\""));
    assert!(text.contains("\"818/762-1221\"\t\"delicatessen\""));
    assert!(stderr(&output).contains("normalized 13 record(s)"));
}

#[test]
fn normalize_to_stdout() {
    let dir = scratch();
    let output = restodup()
        .arg("normalize")
        .arg(dir.path().join("restaurants.tsv"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("\"id\"\t\"name\"\t\"address\"\t\"city\"\t\"phone\"\t\"type\"\n"));
}

#[test]
fn normalize_windows_1252_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.tsv");
    let mut bytes = b"id\tname\taddress\tcity\tphone\ttype\n1\tcaf".to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(b" bizou\t14016 ventura blvd.\tsherman oaks\t818-788-3536\tfrench\n");
    std::fs::write(&path, bytes).unwrap();

    let output = restodup().arg("normalize").arg(&path).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("\"caf\u{e9} bizou\""));
    assert!(out.contains("\"818/788-3536\""));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = restodup().arg("dedupe").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
