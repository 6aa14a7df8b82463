pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use parlatwin_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "parlatwin",
    about = "Parliamentary digital twin CLI",
    long_about = "Aggregate a legislator's full context from the relational store, export it, \
                  and chat with the resulting digital twin.",
    after_help = "Examples:\n  parlatwin migrate\n  parlatwin seed\n  parlatwin legislators\n  parlatwin context 1 --format both\n  parlatwin chat 1"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Print the JSON document to stdout
    Print,
    /// Write the JSON document to a file
    Json,
    /// Write the human-readable report to a file
    Text,
    /// Write both files
    Both,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations")]
    Migrate,
    #[command(about = "Load the deterministic demo dataset and verify it")]
    Seed,
    #[command(about = "List the legislators available for selection")]
    Legislators,
    #[command(about = "Aggregate one legislator's context and export it")]
    Context {
        #[arg(help = "Legislator identifier (mp_uid)")]
        mp_uid: i64,
        #[arg(long, value_enum, default_value_t = ExportFormat::Print)]
        format: ExportFormat,
        #[arg(long, help = "Directory for exported files (default: data/contexts)")]
        output_dir: Option<PathBuf>,
    },
    #[command(about = "Interactive chat with a legislator's digital twin")]
    Chat {
        #[arg(help = "Legislator identifier (mp_uid)")]
        mp_uid: i64,
        #[arg(long, help = "Disable keyword-routed context selection")]
        no_rag: bool,
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,
    },
    #[command(about = "Validate configuration, database connectivity and store contents")]
    Doctor,
}

fn init_logging() {
    use tracing::Level;

    // Best effort: a broken config still leaves the command runnable, and
    // the command itself will report the configuration error.
    let Ok(config) = AppConfig::load(LoadOptions::default()) else {
        tracing_subscriber::fmt().with_target(false).with_max_level(Level::INFO).compact().init();
        return;
    };

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Legislators => commands::legislators::run(),
        Command::Context { mp_uid, format, output_dir } => {
            commands::context::run(mp_uid, format, output_dir)
        }
        Command::Chat { mp_uid, no_rag, temperature } => {
            commands::chat::run(mp_uid, no_rag, temperature)
        }
        Command::Doctor => commands::doctor::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
