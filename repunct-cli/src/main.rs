//! Repunct command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use repunct_cli::commands::{Commands, RunContext};
use repunct_cli::config::CliConfig;
use std::path::PathBuf;

/// Windowed punctuation and capitalization restoration
#[derive(Debug, Parser)]
#[command(name = "repunct", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (see `generate-config`)
    #[arg(long, global = true, value_name = "FILE", env = "REPUNCT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of worker threads (default: all cores)
    #[arg(long, global = true, value_name = "N")]
    threads: Option<usize>,

    /// Suppress progress output and summaries
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }
    }

    fn init_thread_pool(&self, config: &CliConfig) -> Result<()> {
        let threads = match self.threads.unwrap_or(config.performance.worker_threads) {
            0 => num_cpus::get(),
            n => n,
        };
        log::debug!("Using {threads} worker threads");
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to initialize the worker pool")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    log::debug!("Arguments: {cli:?}");

    let config = CliConfig::load(cli.config.as_deref())?;
    cli.init_thread_pool(&config)?;

    let context = RunContext {
        config,
        quiet: cli.quiet,
    };
    cli.command.execute(&context)
}
