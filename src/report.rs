//! Console output for packaging runs.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::artifact::Artifact;
use crate::error::PackageError;

const RULE: &str = "============================================================";

/// Format a byte count as MiB with two decimals.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub archive: PathBuf,
    pub size: u64,
    pub entries: Vec<&'static str>,
    /// Artifacts that were not found and left out.
    pub missing: Vec<PathBuf>,
}

impl PackageReport {
    /// Print the archive summary and the steps to apply it on the device.
    pub fn print(&self) {
        println!("\n✅ Update package created: {}", self.archive.display());
        println!("   Size: {}", format_mb(self.size));
        println!("   Contains: {}", self.entries.join(", "));
        print_next_steps(&self.archive);
    }
}

pub fn print_banner() {
    println!("{RULE}");
    println!("OTA Package Builder (TAR)");
    println!("{RULE}");
}

/// Guidance when neither image exists.
pub fn print_no_inputs() {
    println!("\n❌ No files found to package!");
    println!("Run the following commands:");
    for artifact in Artifact::ALL {
        println!("  {:<24} # {}", artifact.remediation(), artifact.remediation_purpose());
    }
}

fn print_next_steps(archive: &Path) {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive.display().to_string());
    println!("\n{RULE}");
    println!("Next steps:");
    println!("1. Open the device settings in a web browser");
    println!("2. Click 'Upload Firmware'");
    println!("3. Select {name}");
    println!("4. Start the update");
    println!("{RULE}");
}

/// Single-line JSON summary for scripts.
#[derive(Debug, Serialize)]
pub struct StatusLine {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub entries: Vec<&'static str>,
    pub missing: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusLine {
    pub fn ok(report: &PackageReport) -> Self {
        Self {
            status: "ok",
            archive: Some(report.archive.clone()),
            size: Some(report.size),
            entries: report.entries.clone(),
            missing: report.missing.clone(),
            error: None,
        }
    }

    pub fn failed(err: &PackageError) -> Self {
        let (status, missing) = match err {
            PackageError::NoInputsAvailable { missing } => ("no_inputs", missing.clone()),
            _ => ("error", Vec::new()),
        };
        Self {
            status,
            archive: None,
            size: None,
            entries: Vec::new(),
            missing,
            error: Some(format!("{}: {}", err.kind(), error_chain(err))),
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing plain strings and numbers cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"status\":\"{}\"}}", self.status))
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
