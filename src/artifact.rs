//! Build outputs that go into an update package.
//!
//! The device's update receiver only understands two entries:
//! - `firmware.bin` - application image, flashed to the next OTA slot
//! - `spiffs.bin`   - SPIFFS image, flashed to the data partition

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::PackagerConfig;
use crate::report::format_mb;

/// One of the two images the device accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Firmware,
    Filesystem,
}

impl Artifact {
    /// Packaging order.
    pub const ALL: [Artifact; 2] = [Artifact::Firmware, Artifact::Filesystem];

    /// Name of the entry inside the archive.
    pub fn entry_name(self) -> &'static str {
        match self {
            Artifact::Firmware => "firmware.bin",
            Artifact::Filesystem => "spiffs.bin",
        }
    }

    /// File name the build toolchain writes into the build directory.
    pub fn file_name(self) -> &'static str {
        // PlatformIO uses the entry names verbatim.
        self.entry_name()
    }

    /// Command that produces this artifact.
    pub fn remediation(self) -> &'static str {
        match self {
            Artifact::Firmware => "pio run",
            Artifact::Filesystem => "pio run --target buildfs",
        }
    }

    /// What the remediation command does, for the guidance text.
    pub fn remediation_purpose(self) -> &'static str {
        match self {
            Artifact::Firmware => "Compiles the firmware",
            Artifact::Filesystem => "Builds the SPIFFS image",
        }
    }

    /// Largest image the device will buffer for flashing.
    pub fn max_size(self) -> u64 {
        match self {
            Artifact::Firmware => 10 * 1024 * 1024,
            Artifact::Filesystem => 2 * 1024 * 1024,
        }
    }

    /// Artifact whose entry name is `name`, if any.
    pub fn from_entry_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.entry_name() == name)
    }
}

/// Result of looking for one artifact on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactCheck {
    Found {
        artifact: Artifact,
        path: PathBuf,
        size: u64,
    },
    Missing {
        artifact: Artifact,
        path: PathBuf,
    },
}

impl ArtifactCheck {
    pub fn artifact(&self) -> Artifact {
        match self {
            ArtifactCheck::Found { artifact, .. } | ArtifactCheck::Missing { artifact, .. } => {
                *artifact
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ArtifactCheck::Found { path, .. } | ArtifactCheck::Missing { path, .. } => path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ArtifactCheck::Found { .. })
    }

    /// Size above the device limit, if the artifact is too large to flash.
    pub fn oversize(&self) -> Option<u64> {
        match self {
            ArtifactCheck::Found { artifact, size, .. } if *size > artifact.max_size() => {
                Some(*size)
            }
            _ => None,
        }
    }

    /// Print the found/missing line with sizes or remediation hints.
    pub fn print(&self) {
        let artifact = self.artifact();
        match self {
            ArtifactCheck::Found { size, .. } => {
                println!("✓ {} found ({})", artifact.entry_name(), format_mb(*size));
                if self.oversize().is_some() {
                    println!(
                        "  ⚠ exceeds the device limit of {}, the update will be rejected",
                        format_mb(artifact.max_size())
                    );
                }
            }
            ArtifactCheck::Missing { path, .. } => {
                println!("✗ {} not found in {}", artifact.entry_name(), path.display());
                println!("  -> Run '{}' first", artifact.remediation());
                if which::which("pio").is_err() {
                    println!("  -> 'pio' is not on PATH. Install PlatformIO Core to build it.");
                }
            }
        }
    }
}

/// Look for one artifact. Anything that is not a regular file counts as missing.
pub fn check(config: &PackagerConfig, artifact: Artifact) -> ArtifactCheck {
    let path = config.artifact_path(artifact);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => {
            debug!(path = %path.display(), size = meta.len(), "found artifact");
            ArtifactCheck::Found {
                artifact,
                path,
                size: meta.len(),
            }
        }
        _ => {
            debug!(path = %path.display(), "artifact missing");
            ArtifactCheck::Missing { artifact, path }
        }
    }
}

/// Check every artifact in packaging order.
pub fn check_all(config: &PackagerConfig) -> Vec<ArtifactCheck> {
    Artifact::ALL
        .into_iter()
        .map(|artifact| check(config, artifact))
        .collect()
}
