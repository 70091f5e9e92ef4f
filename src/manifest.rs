//! The list of entries that go into one package.

use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, ArtifactCheck};

/// A single archive entry and the file its bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub artifact: Artifact,
    pub source: PathBuf,
}

impl ManifestEntry {
    pub fn entry_name(&self) -> &'static str {
        self.artifact.entry_name()
    }
}

/// Ordered entries for one package: firmware first, then filesystem, each at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    entries: Vec<ManifestEntry>,
}

impl PackageManifest {
    /// Build the manifest from artifact checks, keeping only what was found.
    pub fn from_checks(checks: &[ArtifactCheck]) -> Self {
        let mut manifest = Self::default();
        for check in checks {
            if let ArtifactCheck::Found { artifact, path, .. } = check {
                manifest.push(*artifact, path);
            }
        }
        manifest
    }

    /// Add an entry, replacing an earlier one for the same artifact.
    pub fn push(&mut self, artifact: Artifact, source: &Path) {
        self.entries.retain(|e| e.artifact != artifact);
        self.entries.push(ManifestEntry {
            artifact,
            source: source.to_path_buf(),
        });
        self.entries.sort_by_key(|e| {
            Artifact::ALL
                .iter()
                .position(|a| *a == e.artifact)
                .unwrap_or(usize::MAX)
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn entry_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(ManifestEntry::entry_name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
