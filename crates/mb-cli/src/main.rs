//! Terminal frontend for the Math Boxing quiz battle.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mathbox",
    about = "Math Boxing: knock out robots with times tables",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fight in the terminal, answering from the keyboard
    Play {
        /// Difficulty: easy or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: String,

        /// RNG seed (default: random, or the config file's seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Skip the pauses between problems and levels
        #[arg(long)]
        fast: bool,

        /// JSON file with seed, balance, and commentary overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the best-level file (default: user data dir)
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },

    /// Let a bot with fixed accuracy fight headless runs
    Simulate {
        /// Difficulty: easy or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: String,

        /// RNG seed (default: the config file's seed, or 42)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Chance that the bot answers correctly
        #[arg(short, long, default_value = "0.8")]
        accuracy: f64,

        /// Stop a run after this many answers
        #[arg(short = 't', long, default_value = "500")]
        max_turns: u32,

        /// Number of runs
        #[arg(short, long, default_value = "1")]
        runs: u32,

        /// Print the event timeline of every run
        #[arg(short, long)]
        events: bool,

        /// JSON file with seed, balance, and commentary overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show or reset the stored best level
    Best {
        /// Forget the stored best level
        #[arg(long)]
        reset: bool,

        /// Directory holding the best-level file (default: user data dir)
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            difficulty,
            seed,
            fast,
            config,
            store_dir,
        } => commands::play::run(
            &difficulty,
            seed,
            fast,
            config.as_deref(),
            store_dir.as_deref(),
        ),
        Commands::Simulate {
            difficulty,
            seed,
            accuracy,
            max_turns,
            runs,
            events,
            config,
        } => commands::simulate::run(&commands::simulate::Options {
            difficulty: &difficulty,
            seed,
            accuracy,
            max_turns,
            runs,
            events,
            config: config.as_deref(),
        }),
        Commands::Best { reset, store_dir } => commands::best::run(reset, store_dir.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
