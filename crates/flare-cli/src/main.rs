//! Flare CLI - headless driver for the fireworks simulation

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, run};

#[derive(Parser)]
#[command(name = "flare")]
#[command(about = "Headless particle fireworks simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a show for a number of frames and print a summary
    Run {
        /// Path to a show file ([show] and [spawn] tables)
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 600)]
        frames: u64,

        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Seed for the show and the spawn points (overrides the show file)
        #[arg(long)]
        seed: Option<u64>,

        /// Hold the pointer down and request a spawn every N frames
        #[arg(long, default_value_t = 20)]
        spawn_every: u64,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective show settings as TOML
    Config {
        /// Path to a show file to read instead of the defaults
        #[arg(long)]
        config: Option<String>,
    },
}

fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    match (verbose, quiet) {
        (0, true) => log::LevelFilter::Error,
        (0, false) => log::LevelFilter::Warn,
        (1, _) => log::LevelFilter::Info,
        (2, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, still wins over the flags
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose, cli.quiet))
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Run {
            config,
            frames,
            dt,
            seed,
            spawn_every,
            json,
        } => run::run(run::RunArgs {
            config,
            frames,
            dt,
            seed,
            spawn_every,
            json,
        }),
        Commands::Config { config: path } => config::run(path.as_deref()),
    }
}
