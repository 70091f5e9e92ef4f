//! Clean command - removes the update package.

use anyhow::{Context, Result};

use otapack::archive;
use otapack::config::PackagerConfig;

/// Execute the clean command.
pub fn cmd_clean(config: &PackagerConfig) -> Result<()> {
    let removed = archive::remove_existing(&config.output)
        .with_context(|| format!("Failed to remove {}", config.output.display()))?;
    if removed {
        println!("Removed {}", config.output.display());
    } else {
        println!("Nothing to clean ({} does not exist).", config.output.display());
    }
    Ok(())
}
