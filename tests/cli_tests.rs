//! Process-level tests for the `element-explorer` binary.

use std::process::Command;

use tempfile::TempDir;

#[test]
fn test_missing_data_file_exits_non_zero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("final_element_sheet.xlsx");

    let output = Command::new(env!("CARGO_BIN_EXE_element-explorer"))
        .arg("--data")
        .arg(&missing)
        .arg("--port")
        .arg("0")
        .env_remove("ELEMENT_EXPLORER_DATA")
        .env_remove("ELEMENT_EXPLORER_SHEET")
        .output()
        .expect("Failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data file not found"), "stderr: {stderr}");
}
