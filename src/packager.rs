//! Packager: turns the build outputs into an update tarball.

use tracing::info;

use crate::archive;
use crate::artifact;
use crate::config::PackagerConfig;
use crate::error::PackageError;
use crate::manifest::PackageManifest;
use crate::report::{self, PackageReport};

/// Build the update package described by `config`.
///
/// Missing artifacts are reported and skipped. Fails with
/// [`PackageError::NoInputsAvailable`] when neither exists, in which case an
/// archive left over from an earlier run is not touched.
pub fn build_package(config: &PackagerConfig) -> Result<PackageReport, PackageError> {
    report::print_banner();
    info!(build_dir = %config.build_dir.display(), "checking build outputs");

    let checks = artifact::check_all(config);
    for check in &checks {
        check.print();
    }

    let missing: Vec<_> = checks
        .iter()
        .filter(|c| !c.is_found())
        .map(|c| c.path().to_path_buf())
        .collect();

    let manifest = PackageManifest::from_checks(&checks);
    if manifest.is_empty() {
        report::print_no_inputs();
        return Err(PackageError::NoInputsAvailable { missing });
    }

    println!("\nCreating {}...", config.output.display());
    let size = archive::write_archive(&config.output, &manifest)?;

    let report = PackageReport {
        archive: config.output.clone(),
        size,
        entries: manifest.entry_names(),
        missing,
    };
    report.print();
    Ok(report)
}
