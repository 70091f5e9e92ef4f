//! Error types for packaging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the packager.
///
/// A single missing artifact is not an error; it is reported through
/// [`crate::artifact::ArtifactCheck::Missing`] and packaging continues with
/// whatever was found.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Neither the firmware nor the filesystem image exists.
    #[error("no files to package (missing: {})", display_paths(.missing))]
    NoInputsAvailable { missing: Vec<PathBuf> },

    /// Removing, creating or writing the output archive failed.
    #[error("failed to write archive {}", .path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output path points at one of the files being packaged.
    #[error(
        "output {} is the same file as the {} source; choose a different --output",
        .output.display(),
        .entry
    )]
    OutputIsSource { output: PathBuf, entry: &'static str },

    /// The archive to inspect does not exist.
    #[error("archive not found: {}\nRun 'otapack build' first to create it.", .path.display())]
    ArchiveMissing { path: PathBuf },

    /// The archive exists but could not be read as a tarball.
    #[error("failed to read archive {}", .path.display())]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PackageError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            PackageError::NoInputsAvailable { .. } => 1,
            PackageError::ArchiveWrite { .. }
            | PackageError::OutputIsSource { .. }
            | PackageError::ArchiveMissing { .. }
            | PackageError::ArchiveRead { .. } => 2,
        }
    }

    /// Short machine-readable kind, used by the status line.
    pub fn kind(&self) -> &'static str {
        match self {
            PackageError::NoInputsAvailable { .. } => "no_inputs",
            PackageError::ArchiveWrite { .. } => "archive_write",
            PackageError::OutputIsSource { .. } => "output_is_source",
            PackageError::ArchiveMissing { .. } => "archive_missing",
            PackageError::ArchiveRead { .. } => "archive_read",
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PackageError::ArchiveWrite {
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
