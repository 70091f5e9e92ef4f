//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Package firmware and SPIFFS into the update tarball
//! - `inspect` - List the entries of an existing package
//! - `clean` - Remove the update tarball
//! - `show` - Display the resolved configuration

pub mod build;
pub mod clean;
pub mod inspect;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use inspect::cmd_inspect;
pub use show::cmd_show;
