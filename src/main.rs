use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bgsafe::cli;
use bgsafe::config::{BgsafeConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "bgsafe", version, about = "Sanitize user-supplied profile background CSS")]
struct Cli {
    /// Config file (default: .bgsafe/config.yml, then ~/.config/bgsafe/config.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize one background value (reads stdin when CSS is omitted or `-`)
    Check {
        css: Option<String>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Sanitize every custom_background in a JSONL profile export
    Scan { path: PathBuf },
    /// Write a default .bgsafe/config.yml
    Init,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match &args.config {
        Some(path) => BgsafeConfig::load_from(path)?,
        None => BgsafeConfig::discover(&cwd)?,
    };

    match args.command {
        Commands::Check { css, format } => cli::check::run_check(&config, css.as_deref(), format)?,
        Commands::Scan { path } => cli::scan::run_scan(&config, &path)?,
        Commands::Init => cli::init::run_init(&cwd)?,
    }

    Ok(())
}
