//! Inspect command - lists the contents of an update package.

use anyhow::Result;
use std::path::Path;

use otapack::archive;
use otapack::config::PackagerConfig;
use otapack::report::format_mb;

/// Execute the inspect command.
///
/// `target` defaults to the configured output path.
pub fn cmd_inspect(config: &PackagerConfig, target: Option<&Path>) -> Result<()> {
    let path = match target {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => config.project_root.join(p),
        None => config.output.clone(),
    };

    let entries = archive::list_archive(&path)?;
    println!("Contents of {}:", path.display());
    if entries.is_empty() {
        println!("  (empty)");
    }

    let mut flashable = 0;
    for entry in &entries {
        match entry.problem() {
            Some(problem) => println!("  ⚠ {} ({}): {}", entry.name, format_mb(entry.size), problem),
            None => {
                flashable += 1;
                println!("  ✓ {} ({})", entry.name, format_mb(entry.size));
            }
        }
    }

    println!("\n{} of {} entries will be flashed.", flashable, entries.len());
    if flashable == 0 {
        println!("The device will reject this package: it needs firmware.bin and/or spiffs.bin.");
    }
    Ok(())
}
