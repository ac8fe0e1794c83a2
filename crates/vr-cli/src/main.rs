//! CLI frontend for the Voidreach rules core.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vr",
    about = "Voidreach rules core: resolve actions, preview odds, roll dice",
    version,
    propagate_version = true
)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Table data file (JSON) replacing the built-in tables
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice expression such as 2d8+3
    Roll {
        /// Dice notation
        notation: String,

        /// Seed text (default: random)
        #[arg(short, long)]
        seed: Option<String>,

        /// Substream label
        #[arg(short, long, default_value = "roll")]
        label: String,
    },

    /// Resolve an action against a context
    Resolve {
        /// Action: mining, scavenging, derelict, away_team, combat, flee, repair, mission
        action: String,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Seed text (default: random)
        #[arg(short, long)]
        seed: Option<String>,

        /// Print the raw outcome as JSON
        #[arg(long)]
        json: bool,

        /// Append a telemetry snapshot to this file (JSON lines)
        #[arg(long)]
        telemetry: Option<PathBuf>,
    },

    /// Preview tier probabilities for an action
    Odds {
        /// Action to preview
        action: String,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview hit chance and expected damage for a combat attack
    Hit {
        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the difficulty label closest to a desired success chance
    Balance {
        /// Action to tune
        action: String,

        /// Desired success chance in percent (0-100)
        #[arg(long)]
        chance: f64,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,
    },

    /// Resolve many times and compare observed tiers with the preview
    Simulate {
        /// Action to simulate
        action: String,

        /// Number of resolutions
        #[arg(short = 'n', long, default_value = "10000")]
        iterations: u32,

        /// Context file (JSON)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Base seed text (default: random)
        #[arg(short, long)]
        seed: Option<String>,
    },

    /// Validate and list table data
    Tables {
        /// Table file to inspect (default: --tables or the built-in tables)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data = commands::DataPaths {
        config: cli.config,
        tables: cli.tables,
    };

    let result = match cli.command {
        Commands::Roll {
            notation,
            seed,
            label,
        } => commands::roll::run(&notation, seed, &label),
        Commands::Resolve {
            action,
            context,
            seed,
            json,
            telemetry,
        } => commands::resolve::run(
            &data,
            &action,
            context.as_deref(),
            seed,
            json,
            telemetry.as_deref(),
        ),
        Commands::Odds {
            action,
            context,
            json,
        } => commands::odds::run(&data, &action, context.as_deref(), json),
        Commands::Hit { context, json } => commands::hit::run(&data, context.as_deref(), json),
        Commands::Balance {
            action,
            chance,
            context,
        } => commands::balance::run(&data, &action, chance, context.as_deref()),
        Commands::Simulate {
            action,
            iterations,
            context,
            seed,
        } => commands::simulate::run(&data, &action, iterations, context.as_deref(), seed),
        Commands::Tables { file } => {
            commands::tables::run(file.as_deref().or(data.tables.as_deref()))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
