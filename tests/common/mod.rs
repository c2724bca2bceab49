#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PASSWORD: &str = "Correct-Horse-42";

/// Isolated config file and data directory for one test.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sealnote").expect("binary exists");
        cmd.env("SEALNOTE_CONFIG", self.config_path())
            .env_remove("SEALNOTE_LOG")
            .env_remove("SEALNOTE_LOG_FORMAT")
            .env("NO_COLOR", "1")
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    /// Seal `content` with [`PASSWORD`] and return the share URL.
    pub fn seal(&self, content: &str, extra: &[&str]) -> String {
        let output = self
            .cmd()
            .args(["seal", "--json", "--content", content])
            .args(extra)
            .write_stdin(format!("{PASSWORD}\n{PASSWORD}\n"))
            .output()
            .expect("seal output");
        assert!(
            output.status.success(),
            "seal failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        json_value(&output.stdout)
            .get("value")
            .and_then(Value::as_str)
            .expect("url value")
            .to_string()
    }
}

pub fn json_value(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json")
}
