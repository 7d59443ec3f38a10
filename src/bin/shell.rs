//! scull Shell Binary
//!
//! Builds a device registry and runs shell commands against it, from stdin
//! or from a script file.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use scull::shell::Session;
use scull::{Config, Registry};
use tracing_subscriber::{fmt, EnvFilter};

/// scull Shell
#[derive(Parser, Debug)]
#[command(name = "scull-shell")]
#[command(about = "Interactive shell for in-memory scull devices")]
#[command(version)]
struct Args {
    /// Number of devices
    #[arg(short, long, default_value = "4")]
    devices: usize,

    /// Block size in bytes
    #[arg(short, long, default_value = "4000")]
    quantum: usize,

    /// Blocks per segment
    #[arg(short = 's', long, default_value = "1000")]
    qset: usize,

    /// Per-device memory limit in bytes (unlimited if omitted)
    #[arg(short, long)]
    memory_limit: Option<usize>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() {
    // Initialize tracing/logging; keep stdout for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scull=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("scull shell v{}", scull::VERSION);

    // Build config from args
    let config = Config::builder()
        .device_count(args.devices)
        .quantum(args.quantum)
        .qset(args.qset)
        .memory_limit(args.memory_limit)
        .build();

    let registry = match Registry::new(config) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            tracing::error!("Failed to create registry: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(registry);
    let stdout = io::stdout();

    let result = match &args.script {
        Some(path) => {
            tracing::info!("Running script {}", path.display());
            session.run_path(path, stdout.lock())
        }
        None => session.run(io::stdin().lock(), stdout.lock()),
    };

    if let Err(e) = result {
        tracing::error!("Shell error: {}", e);
        std::process::exit(1);
    }
}
