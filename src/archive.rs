//! Tarball operations for update packages.
//!
//! This module handles writing the update tarball and listing an existing one.
//! Archives are plain (uncompressed) ustar, which is what the device parses.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use tar::{Archive, Builder, Header, HeaderMode};
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::error::PackageError;
use crate::manifest::PackageManifest;

/// Write `manifest` to a fresh archive at `output`, replacing any existing file.
///
/// Returns the size of the written archive in bytes.
///
/// Fails with [`PackageError::OutputIsSource`] before touching anything when
/// `output` is one of the manifest's source files.
pub fn write_archive(output: &Path, manifest: &PackageManifest) -> Result<u64, PackageError> {
    if let Some(entry) = manifest.entries().iter().find(|e| same_file(output, &e.source)) {
        return Err(PackageError::OutputIsSource {
            output: output.to_path_buf(),
            entry: entry.entry_name(),
        });
    }

    remove_existing(output).map_err(|e| PackageError::write(output, e))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PackageError::write(output, e))?;
    }

    write_entries(output, manifest).map_err(|e| PackageError::write(output, e))?;

    let size = fs::metadata(output)
        .map_err(|e| PackageError::write(output, e))?
        .len();
    info!(path = %output.display(), size, "archive written");
    Ok(size)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Delete `path` if it exists. Returns whether anything was removed.
pub fn remove_existing(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous archive");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn write_entries(output: &Path, manifest: &PackageManifest) -> io::Result<()> {
    let file = File::create(output)?;
    let mut builder = Builder::new(BufWriter::new(file));

    for entry in manifest.entries() {
        println!("  Adding {}...", entry.entry_name());
        let mut source = File::open(&entry.source)?;
        let meta = source.metadata()?;

        // ustar magic is what the receiver checks; keep the source mtime so
        // reruns over unchanged inputs produce identical bytes.
        let mut header = Header::new_ustar();
        header.set_metadata_in_mode(&meta, HeaderMode::Complete);
        builder.append_data(&mut header, entry.entry_name(), &mut source)?;
        debug!(
            entry = entry.entry_name(),
            source = %entry.source.display(),
            size = meta.len(),
            "appended entry"
        );
    }

    let writer = builder.into_inner()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// One entry of an existing archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub size: u64,
    pub regular: bool,
}

impl ArchiveEntry {
    /// Why the device would not flash this entry, if it would not.
    pub fn problem(&self) -> Option<String> {
        if !self.regular {
            return Some("not a regular file, ignored by the device".to_string());
        }
        match Artifact::from_entry_name(&self.name) {
            None => Some("unknown entry name, ignored by the device".to_string()),
            Some(artifact) if self.size > artifact.max_size() => Some(format!(
                "exceeds the device limit of {} bytes",
                artifact.max_size()
            )),
            Some(_) => None,
        }
    }
}

/// List the entries of the archive at `path`.
pub fn list_archive(path: &Path) -> Result<Vec<ArchiveEntry>, PackageError> {
    if !path.is_file() {
        return Err(PackageError::ArchiveMissing {
            path: path.to_path_buf(),
        });
    }
    read_entries(path).map_err(|source| PackageError::ArchiveRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_entries(path: &Path) -> io::Result<Vec<ArchiveEntry>> {
    let mut archive = Archive::new(File::open(path)?);
    let mut out = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        out.push(ArchiveEntry {
            name: entry.path()?.to_string_lossy().into_owned(),
            size: entry.size(),
            regular: entry.header().entry_type().is_file(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn entries_use_fixed_names_and_ustar_headers() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("deep/nested/fw.img");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, b"\x01\x02\x03").unwrap();

        let mut manifest = PackageManifest::default();
        manifest.push(Artifact::Firmware, &src);
        let out = tmp.path().join("update.tar");
        let size = write_archive(&out, &manifest).unwrap();
        assert_eq!(size, fs::metadata(&out).unwrap().len());

        let mut archive = Archive::new(File::open(&out).unwrap());
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        assert_eq!(entry.path().unwrap().to_str(), Some("firmware.bin"));
        assert_eq!(&entry.header().as_bytes()[257..262], b"ustar");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        drop(entry);
        assert!(entries.next().is_none());
    }

    #[test]
    fn write_failure_is_reported_as_archive_write() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = PackageManifest::default();
        manifest.push(Artifact::Firmware, &tmp.path().join("gone.bin"));
        let out = tmp.path().join("update.tar");

        let err = write_archive(&out, &manifest).unwrap_err();
        assert!(matches!(err, PackageError::ArchiveWrite { ref path, .. } if *path == out));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn output_pointing_at_a_source_is_refused_and_source_kept() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        fs::create_dir_all(&build).unwrap();
        let fw = build.join("firmware.bin");
        fs::write(&fw, [1u8, 2, 3]).unwrap();

        let mut manifest = PackageManifest::default();
        manifest.push(Artifact::Firmware, &fw);
        // Same file reached through a different spelling.
        let alias = build.join("../build/firmware.bin");

        let err = write_archive(&alias, &manifest).unwrap_err();
        assert!(matches!(err, PackageError::OutputIsSource { entry: "firmware.bin", .. }));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(fs::read(&fw).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn malformed_archive_is_reported_as_archive_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("update.tar");
        fs::write(&path, vec![b'x'; 1024]).unwrap();

        let err = list_archive(&path).unwrap_err();
        assert!(matches!(err, PackageError::ArchiveRead { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn directory_entries_are_listed_as_not_regular() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("assets")).unwrap();
        let path = tmp.path().join("update.tar");
        let mut builder = Builder::new(File::create(&path).unwrap());
        builder.append_dir("assets", tmp.path().join("assets")).unwrap();
        builder.into_inner().unwrap();

        let entries = list_archive(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].regular);
        assert!(entries[0].problem().unwrap().contains("not a regular file"));
    }

    #[test]
    fn remove_existing_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("update.tar");
        fs::write(&path, b"old").unwrap();
        assert!(remove_existing(&path).unwrap());
        assert!(!remove_existing(&path).unwrap());
    }

    #[test]
    fn problem_flags_entries_the_device_ignores() {
        let ok = ArchiveEntry {
            name: "spiffs.bin".into(),
            size: 10,
            regular: true,
        };
        let unknown = ArchiveEntry {
            name: "notes.txt".into(),
            ..ok.clone()
        };
        let huge = ArchiveEntry {
            name: "firmware.bin".into(),
            size: 11 * 1024 * 1024,
            regular: true,
        };
        assert_eq!(ok.problem(), None);
        assert!(unknown.problem().unwrap().contains("unknown entry name"));
        assert!(huge.problem().unwrap().contains("device limit"));
    }

    #[test]
    fn listing_missing_archive_fails() {
        let tmp = TempDir::new().unwrap();
        let err = list_archive(&tmp.path().join("update.tar")).unwrap_err();
        assert!(matches!(err, PackageError::ArchiveMissing { .. }));
    }
}
