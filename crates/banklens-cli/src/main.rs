mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(
    name = "banklens",
    version,
    about = "Financial figure extraction and stability scoring for bank annual reports"
)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one or more reports (PDF, XLSX tables, plain text or a JSON record)
    Analyze {
        /// Report files; several files are ranked by stability score
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Custom JSON analysis config
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Predefined config: default or strict
        #[arg(short, long, value_name = "NAME", default_value = "default")]
        preset: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Include the extraction trace
        #[arg(long)]
        trace: bool,
    },
    /// Inspect and validate analysis configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the canonical indicators and their synonym counts
    Indicators,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List predefined configs
    List,
    /// Print thresholds and weights of a predefined config
    Show {
        /// Preset name (e.g., "default")
        #[arg(default_value = "default")]
        preset: String,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            files,
            config,
            preset,
            output,
            trace,
        } => commands::analyze::run(files, config, &preset, &output, trace),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Show { preset } => commands::config::show(&preset),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
        Commands::Indicators => commands::indicators::list(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
