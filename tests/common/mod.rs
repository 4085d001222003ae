use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Sample decoded flight, one record per line of interest
#[allow(dead_code)]
pub const SAMPLE_FLIGHT: &str = r#"{
  "GPS": [
    {"timestamp": 1000.0, "fix_type": 3},
    {"timestamp": 1030.0, "fix_type": 1},
    {"timestamp": 1090.5, "fix_type": 3}
  ],
  "ATT": [
    {"timestamp": 1000.1, "alt": 1.0, "roll": 0.0, "pitch": 0.0},
    {"timestamp": 1000.2, "alt": 5.25, "roll": 60.0, "pitch": 0.0},
    {"timestamp": 1000.3, "roll": 58.0, "pitch": 2.0}
  ],
  "BAT": [
    {"timestamp": 1000.0, "volt": 12.6},
    {"timestamp": 1080.0, "volt": 10.2}
  ],
  "EV": [{"timestamp": 1001.0, "id": 10}]
}"#;

#[allow(dead_code)]
pub fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("failed to write temp file");
    (temp_dir, path)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    temp_file("config.yaml", contents)
}
