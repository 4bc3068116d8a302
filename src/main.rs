//! `leviso-bundle` CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use leviso_bundle::{bundle, install_dir, Config};

/// Command line usage error (sysexits.h `EX_USAGE`).
const EX_USAGE: u8 = 64;

#[derive(Parser)]
#[command(name = "leviso-bundle", version)]
#[command(about = "Copy a binary's shared libraries into a shared_libs directory next to it", long_about = None)]
struct Cli {
    /// Binary whose libraries should be bundled
    binary: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EX_USAGE);
        }
    };

    init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::new(&cli.binary, &install_dir()?)?;
    bundle(&config, |src, dest| {
        println!("Copied {} to {}.", src.display(), dest.display());
    })?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
