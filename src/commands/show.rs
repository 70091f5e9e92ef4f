//! Show command - displays the resolved configuration.

use anyhow::Result;

use otapack::config::PackagerConfig;

/// Execute the show command.
pub fn cmd_show(config: &PackagerConfig) -> Result<()> {
    config.print();
    Ok(())
}
