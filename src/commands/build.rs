//! Build command - creates the update package.

use anyhow::Result;

use otapack::config::PackagerConfig;
use otapack::packager;
use otapack::report::StatusLine;

/// Execute the build command.
///
/// With `status_line`, a single JSON summary follows the human-readable output.
pub fn cmd_build(config: &PackagerConfig, status_line: bool) -> Result<()> {
    match packager::build_package(config) {
        Ok(report) => {
            if status_line {
                println!("{}", StatusLine::ok(&report).to_json());
            }
            Ok(())
        }
        Err(e) => {
            if status_line {
                println!("{}", StatusLine::failed(&e).to_json());
            }
            Err(e.into())
        }
    }
}
