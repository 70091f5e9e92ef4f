//! otapack library exports for testing.
//!
//! The binary in `main.rs` is a thin CLI over these modules.

pub mod archive;
pub mod artifact;
pub mod config;
pub mod error;
pub mod manifest;
pub mod packager;
pub mod report;

pub use error::PackageError;
pub use packager::build_package;
