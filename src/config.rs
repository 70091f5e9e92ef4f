//! Configuration management for otapack.
//!
//! Reads configuration from a .env file in the project root and from
//! environment variables. Environment variables take precedence over .env.
//! Command-line flags are applied on top by the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::artifact::Artifact;

/// Build directory PlatformIO uses for the device environment.
pub const DEFAULT_BUILD_DIR: &str = ".pio/build/m5stack-atom";

/// Archive written next to the project.
pub const DEFAULT_OUTPUT: &str = "update.tar";

/// Overrides the build directory (relative to the project root unless absolute).
pub const ENV_BUILD_DIR: &str = "OTAPACK_BUILD_DIR";

/// Overrides the output archive path (relative to the project root unless absolute).
pub const ENV_OUTPUT: &str = "OTAPACK_OUTPUT";

/// Where to find the build outputs and where to write the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerConfig {
    /// Project root; relative paths are resolved against it.
    pub project_root: PathBuf,
    /// Directory the build toolchain deposits `firmware.bin` and `spiffs.bin` in.
    pub build_dir: PathBuf,
    /// Output archive path.
    pub output: PathBuf,
}

impl PackagerConfig {
    /// Configuration with the built-in defaults for `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            build_dir: project_root.join(DEFAULT_BUILD_DIR),
            output: project_root.join(DEFAULT_OUTPUT),
            project_root,
        }
    }

    /// Load configuration from `<root>/.env` and the environment.
    pub fn load(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let mut vars = HashMap::new();

        let env_path = project_root.join(".env");
        if env_path.exists() {
            match dotenvy::from_path_iter(&env_path) {
                Ok(iter) => {
                    for item in iter {
                        match item {
                            Ok((key, value)) => {
                                vars.insert(key, value);
                            }
                            Err(e) => warn!("skipping malformed line in {}: {}", env_path.display(), e),
                        }
                    }
                }
                Err(e) => warn!("cannot read {}: {}", env_path.display(), e),
            }
        }

        let env: Vec<_> = [ENV_BUILD_DIR, ENV_OUTPUT]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        overlay(&mut vars, env);

        Self::from_vars(project_root, &vars)
    }

    fn from_vars(project_root: PathBuf, vars: &HashMap<String, String>) -> Self {
        let mut config = Self::new(project_root);
        if let Some(dir) = vars.get(ENV_BUILD_DIR).filter(|v| !v.is_empty()) {
            config = config.with_build_dir(dir);
        }
        if let Some(out) = vars.get(ENV_OUTPUT).filter(|v| !v.is_empty()) {
            config = config.with_output(out);
        }
        debug!(?config, "resolved configuration");
        config
    }

    /// Replace the build directory. Relative paths are joined to the project root.
    pub fn with_build_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.build_dir = self.resolve(dir.as_ref());
        self
    }

    /// Replace the output archive path. Relative paths are joined to the project root.
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = self.resolve(output.as_ref());
        self
    }

    /// Source path of an artifact inside the build directory.
    pub fn artifact_path(&self, artifact: Artifact) -> PathBuf {
        self.build_dir.join(artifact.file_name())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Project root: {}", self.project_root.display());
        println!("  Build dir:    {}", self.build_dir.display());
        println!("  Output:       {}", self.output.display());
        for artifact in Artifact::ALL {
            let path = self.artifact_path(artifact);
            let state = if path.is_file() { "FOUND" } else { "NOT FOUND" };
            println!("  {}: {} ({})", artifact.entry_name(), path.display(), state);
        }
    }
}

/// Apply environment values over `.env` values. Empty values are unset, not overrides.
fn overlay(vars: &mut HashMap<String, String>, env: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in env {
        if !value.is_empty() {
            vars.insert(key, value);
        }
    }
}
