use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run(config: &Path, extra: &[&str]) -> (i32, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_wordswap"))
        .arg("--config")
        .arg(config)
        .args(extra)
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    (output.status.code().unwrap(), json)
}

fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("words.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn rewrites_selected_files_in_place() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ch1.md"), "老张去了集市\n老张回家").unwrap();
    fs::write(dir.path().join("notes.txt"), "老张").unwrap();
    let config = write_config(&dir, r#"{"select": "*.md", "mappings": {"张三": ["老张"]}}"#);

    let (code, json) = run(&config, &[]);

    assert_eq!(code, 0);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["updated"], 1);
    assert_eq!(json["data"]["replacements"], 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("ch1.md")).unwrap(),
        "张三去了集市\n张三回家"
    );
    assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "老张");
}

#[test]
fn mirrors_output_and_skips_up_to_date_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ch1.md"), "Tom went\nhome").unwrap();
    let config = write_config(
        &dir,
        r#"{"select": ["*.md"], "restore": "out", "min_update": true, "mappings": {"Thomas": ["Tom"]}}"#,
    );

    let (code, json) = run(&config, &[]);
    assert_eq!(code, 0);
    assert_eq!(json["data"]["updated"], 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("out/ch1.md")).unwrap(),
        "Thomas went\nhome"
    );
    assert_eq!(fs::read_to_string(dir.path().join("ch1.md")).unwrap(), "Tom went\nhome");

    let (code, json) = run(&config, &[]);
    assert_eq!(code, 0);
    assert_eq!(json["data"]["skipped"], 1);
    assert_eq!(json["data"]["items"][0]["status"], "skipped");
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ch1.md"), "老张").unwrap();
    let config = write_config(&dir, r#"{"select": "*.md", "mappings": {"张三": ["老张"]}}"#);

    let (code, json) = run(&config, &["--dry-run"]);

    assert_eq!(code, 0);
    assert_eq!(json["data"]["dryRun"], true);
    assert_eq!(json["data"]["updated"], 1);
    assert_eq!(fs::read_to_string(dir.path().join("ch1.md")).unwrap(), "老张");
}

#[test]
fn unchanged_files_are_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ch1.md"), "nothing here").unwrap();
    let config = write_config(&dir, r#"{"select": "*.md", "mappings": {"张三": ["老张"]}}"#);

    let (code, json) = run(&config, &[]);

    assert_eq!(code, 0);
    assert_eq!(json["data"]["unchanged"], 1);
}

#[test]
fn missing_mappings_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"select": "*.md"}"#);

    let (code, json) = run(&config, &[]);

    assert_eq!(code, 2);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "config.missing_key");
}

#[test]
fn empty_alias_is_a_pattern_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, r#"{"select": "*.md", "mappings": {"X": [""]}}"#);

    let (code, json) = run(&config, &[]);

    assert_eq!(code, 3);
    assert_eq!(json["error"]["code"], "pattern.invalid");
}

#[test]
fn missing_config_file_is_a_validation_error() {
    let dir = TempDir::new().unwrap();

    let (code, json) = run(&dir.path().join("absent.json"), &[]);

    assert_eq!(code, 2);
    assert_eq!(json["error"]["code"], "validation.invalid_argument");
}
