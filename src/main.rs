use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use pwdhash::Result;

#[derive(Parser)]
#[command(name = "pwdhash")]
#[command(author = "Oleg")]
#[command(version = "0.1.0")]
#[command(about = "Hash and verify secrets as PHC strings", long_about = None)]
struct Cli {
    /// JSON configuration file with the active hasher settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Policy tier for new hashes (interactive, moderate, sensitive); overrides the config file tier
    #[arg(short, long, global = true)]
    policy: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a secret and print the PHC string
    Hash {
        /// Read the secret from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },

    /// Verify a secret against a PHC string
    Verify {
        /// Stored PHC string
        encoded: String,
        /// Read the secret from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },

    /// Tell whether a PHC string should be regenerated
    NeedsRehash {
        /// Stored PHC string
        encoded: String,
    },

    /// Show the metadata of a PHC string
    Inspect {
        /// Stored PHC string
        encoded: String,
    },

    /// Show the policy table
    Policy {
        /// Show a single tier
        tier: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "pwdhash=debug" } else { "pwdhash=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the command ran but the answer is negative
fn run(cli: Cli) -> Result<bool> {
    if let Commands::Policy { tier } = &cli.command {
        cli::policy::run(tier.as_deref())?;
        return Ok(true);
    }

    let hasher = cli::build_hasher(cli.config.as_deref(), cli.policy.as_deref())?;

    match cli.command {
        Commands::Hash { stdin } => cli::hash::run(&hasher, stdin).map(|()| true),
        Commands::Verify { encoded, stdin } => cli::verify::run(&hasher, &encoded, stdin),
        Commands::NeedsRehash { encoded } => cli::rehash::run(&hasher, &encoded).map(|_| true),
        Commands::Inspect { encoded } => cli::inspect::run(&hasher, &encoded).map(|()| true),
        Commands::Policy { .. } => Ok(true),
    }
}
