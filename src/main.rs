// Command line interface for iRMC configuration
use std::io::stderr;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

mod cmd;

use cmd::compare::CompareArgs;
use cmd::power::PowerArgs;
use cmd::scci::ScciArgs;
use cmd::session::SessionArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Remote configuration of iRMC controllers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two iRMC profiles
    Compare(CompareArgs),
    /// Send a raw SCCI command
    Scci(ScciArgs),
    /// Get or change the server power state
    Power(PowerArgs),
    /// Track iRMC sessions
    Session(SessionArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Respect RUST_LOG, fall back to verbose/info for our crates
    let level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "irmcctl={level},irmc_scci={level},irmc_profile={level},irmc_client={level},reqwest=warn,hyper=warn,rustls=warn",
        level = level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry().with(filter).with(fmt::layer().with_writer(stderr)).init();
    debug!("logger initialized");

    match cli.command {
        Commands::Compare(args) => cmd::compare::run(args),
        Commands::Scci(args) => cmd::scci::run(args).await,
        Commands::Power(args) => cmd::power::run(args).await,
        Commands::Session(args) => cmd::session::run(args).await,
    }
}
