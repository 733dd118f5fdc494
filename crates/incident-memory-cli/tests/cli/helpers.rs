//! Shared helpers for invoking the CLI binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_WARNING: i32 = 1;
pub const EXIT_BLOCKING: i32 = 2;

pub const OFFLINE_DIM: usize = 768;

/// Captured result of one CLI invocation.
#[derive(Debug)]
pub struct CliOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    /// Parses stdout, failing the test with both streams if it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({e}).\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            )
        })
    }

    pub fn assert_success(&self) -> Value {
        assert_eq!(
            self.exit_code, EXIT_SUCCESS,
            "command failed.\nstdout: {}\nstderr: {}",
            self.stdout, self.stderr
        );
        self.json()
    }
}

/// A temp database directory plus a scratch directory for input files.
pub struct TestDb {
    pub dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("db")
    }

    /// Runs the CLI with `--db-path` pointing at this database.
    pub fn run(&self, args: &[&str]) -> CliOutput {
        run_cli(&self.db_path(), args)
    }

    /// Writes `contents` to a scratch file and returns its path as a string.
    pub fn write_file(&self, name: &str, contents: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write input file");
        path.display().to_string()
    }

    /// Writes `vector` as a JSON array and returns the file path.
    pub fn vector_file(&self, name: &str, vector: &[f32]) -> String {
        let json = serde_json::to_string(vector).expect("vector encodes");
        self.write_file(name, &json)
    }

    pub fn init(&self) {
        self.run(&["init"]).assert_success();
    }
}

pub fn run_cli(db_path: &Path, args: &[&str]) -> CliOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_incident-memory"))
        .arg("--db-path")
        .arg(db_path)
        .args(args)
        .env_remove("INCIDENT_MEMORY_CONFIG")
        .env_remove("INCIDENT_MEMORY_DB_PATH")
        .env_remove("INCIDENT_MEMORY_AUTO_CREATE")
        .env_remove("INCIDENT_MEMORY_CONFIDENT_THRESHOLD")
        .env_remove("INCIDENT_MEMORY_KNOWLEDGE_THRESHOLD")
        .env_remove("INCIDENT_MEMORY_EMBED_TIMEOUT_MS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run incident-memory binary");

    CliOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// `e_i` of width `dim`.
pub fn unit_vector(dim: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[i] = 1.0;
    v
}
