//! Shared test utilities for otapack tests.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use otapack::artifact::Artifact;
use otapack::config::PackagerConfig;
use tempfile::TempDir;

/// Test environment with a temporary project root laid out like a PlatformIO project.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Project root
    pub root: PathBuf,
    /// Packager configuration with default paths under `root`
    pub config: PackagerConfig,
}

impl TestEnv {
    /// Create a new test environment with an empty build directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let config = PackagerConfig::new(&root);
        fs::create_dir_all(&config.build_dir).expect("Failed to create build dir");

        Self {
            _temp_dir: temp_dir,
            root,
            config,
        }
    }

    /// Write an artifact into the build directory.
    pub fn write_artifact(&self, artifact: Artifact, content: &[u8]) -> PathBuf {
        let path = self.config.artifact_path(artifact);
        fs::write(&path, content).expect("Failed to write artifact");
        path
    }

    pub fn output(&self) -> &Path {
        &self.config.output
    }
}

/// Read every entry of a tarball as (name, bytes).
pub fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = File::open(path).expect("Failed to open archive");
    let mut archive = tar::Archive::new(file);
    let mut out = Vec::new();
    for entry in archive.entries().expect("Failed to read entries") {
        let mut entry = entry.expect("Failed to read entry");
        let name = entry
            .path()
            .expect("Entry has no path")
            .to_string_lossy()
            .into_owned();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read entry data");
        out.push((name, data));
    }
    out
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a file does not exist.
pub fn assert_file_absent(path: &Path) {
    assert!(!path.exists(), "Expected file to be absent: {}", path.display());
}
