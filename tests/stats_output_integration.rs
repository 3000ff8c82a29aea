use serde_json::Value;
use std::process::Command;

mod integration;
use integration::fixtures::{C_HEADER, C_HEADER_JAVADOC};
use integration::TestFixture;

fn docstyle() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docstyle"))
}

/// Test that --stats-out writes a JSON run summary with per-file entries
#[test]
fn test_stats_output_json_structure() {
    let fixture = TestFixture::new();
    fixture.create_source_file("geometry.h", C_HEADER);
    let stats_file = fixture.root_path.join("stats.json");

    let output = docstyle()
        .arg(&fixture.root_path)
        .args(["--style", "javadoc_block", "--no-progress", "--stats-out"])
        .arg(&stats_file)
        .output()
        .expect("Failed to run docstyle");
    assert!(
        output.status.success(),
        "docstyle failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fixture.read("geometry.h"), C_HEADER_JAVADOC);

    let stats: Value = serde_json::from_str(&std::fs::read_to_string(&stats_file).unwrap())
        .expect("Failed to parse JSON");
    let obj = stats.as_object().expect("Stats should be a JSON object");
    for key in [
        "run_start",
        "total_processing_time_ms",
        "files_processed",
        "files_written",
        "files_failed",
        "comments_converted",
        "comments_skipped",
        "comments_failed",
        "file_stats",
    ] {
        assert!(obj.contains_key(key), "Missing {key} field");
    }
    assert_eq!(obj["files_processed"].as_u64(), Some(1));
    assert_eq!(obj["files_written"].as_u64(), Some(1));
    assert_eq!(obj["comments_converted"].as_u64(), Some(3));

    let file_stats = obj["file_stats"].as_array().expect("file_stats should be an array");
    assert_eq!(file_stats.len(), 1);
    assert_eq!(file_stats[0]["status"].as_str(), Some("success"));
    assert!(file_stats[0]["error"].is_null());
}

#[test]
fn test_dry_run_flag_keeps_sources() {
    let fixture = TestFixture::new();
    fixture.create_source_file("geometry.h", C_HEADER);
    let stats_file = fixture.root_path.join("stats.json");

    let output = docstyle()
        .arg(&fixture.root_path)
        .args(["--dry-run", "--no-progress", "--stats-out"])
        .arg(&stats_file)
        .output()
        .expect("Failed to run docstyle");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run"));
    assert_eq!(fixture.read("geometry.h"), C_HEADER);
}

#[test]
fn test_missing_root_fails() {
    let fixture = TestFixture::new();
    let output = docstyle()
        .arg(fixture.root_path.join("nowhere"))
        .arg("--no-progress")
        .output()
        .expect("Failed to run docstyle");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_invalid_pattern_fails() {
    let fixture = TestFixture::new();
    fixture.create_source_file("a.c", "// a\nint a;\n");
    let output = docstyle()
        .arg(&fixture.root_path)
        .args(["--strategy", "substitute", "--pattern", "(", "--replacement", "x", "--no-progress"])
        .output()
        .expect("Failed to run docstyle");
    assert!(!output.status.success());
    assert_eq!(fixture.read("a.c"), "// a\nint a;\n");
}
