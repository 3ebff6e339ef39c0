//! Loyalty CLI - command-line front end for partner rewards
//!
//! Drives an in-memory reward book with line-oriented command scripts:
//! - Register partners under their parents
//! - Load contract batches from CSV files
//! - Query partner levels and quarterly rewards

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
pub mod config;
mod error;
pub mod output;
mod session;

pub use commands::{command_map, Handler, DEMO_CONTRACTS};
use config::LoyaltyConfig;
pub use error::{CliError, CliResult};
use output::OutputFormat;
pub use session::{FailureMode, Session};

/// Loyalty CLI application
#[derive(Parser)]
#[command(name = "loyalty")]
#[command(about = "Partner loyalty rewards - levels and quarterly rewards", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LOYALTY_CONFIG")]
    config: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run a command script from a file, or from stdin
    Run {
        /// Script path; stdin when omitted
        script: Option<PathBuf>,

        /// Keep running after a command fails
        #[arg(long)]
        keep_going: bool,
    },

    /// Register a three-partner chain, load bundled contracts and query them
    Demo,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = LoyaltyConfig::load(cli.config.as_deref())?;

    // Initialize tracing; results go to stdout, logs to stderr
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .try_init();

    config.policy.validate()?;

    let stdout = io::stdout();
    let mut session = Session::new(&config, cli.output, stdout.lock());

    match cli.command {
        Commands::Run { script, keep_going } => {
            let mode = if keep_going {
                FailureMode::KeepGoing
            } else {
                FailureMode::Stop
            };
            match script {
                Some(path) => session.run_script(BufReader::new(File::open(path)?), mode),
                None => session.run_script(io::stdin().lock(), mode),
            }
        }
        Commands::Demo => commands::demo(&mut session),
    }
}
