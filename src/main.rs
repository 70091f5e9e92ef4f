//! otapack - OTA update package builder.
//!
//! Bundles the PlatformIO build outputs into `update.tar`:
//! - `firmware.bin` (application image)
//! - `spiffs.bin` (SPIFFS filesystem image)

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use otapack::config::PackagerConfig;
use otapack::PackageError;

#[derive(Parser)]
#[command(name = "otapack", version)]
#[command(about = "Package firmware and SPIFFS images into an OTA update tarball")]
#[command(
    after_help = "QUICK START:\n  pio run                   Compile the firmware\n  pio run --target buildfs  Build the SPIFFS image\n  otapack                   Create update.tar"
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Directory containing firmware.bin and spiffs.bin (default: .pio/build/m5stack-atom)
    #[arg(long, global = true)]
    build_dir: Option<PathBuf>,

    /// Output archive (default: update.tar)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Also print a one-line JSON status after the build
    #[arg(long, global = true)]
    status_line: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the update package (default)
    Build,
    /// List the entries of an update package
    Inspect {
        /// Archive to inspect (default: the configured output)
        archive: Option<PathBuf>,
    },
    /// Remove the update package
    Clean,
    /// Show the resolved configuration
    Show,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {:#}", e);
            let code = e
                .downcast_ref::<PackageError>()
                .map(PackageError::exit_code)
                .unwrap_or(2);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut config = PackagerConfig::load(root);
    if let Some(dir) = &cli.build_dir {
        config = config.with_build_dir(dir);
    }
    if let Some(output) = &cli.output {
        config = config.with_output(output);
    }

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => commands::cmd_build(&config, cli.status_line),
        Commands::Inspect { archive } => commands::cmd_inspect(&config, archive.as_deref()),
        Commands::Clean => commands::cmd_clean(&config),
        Commands::Show => commands::cmd_show(&config),
    }
}
