//! CLI entry point for the `logh` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use loghandle::cli::commands;
use loghandle::format::LineLayout;
use loghandle::types::{LogError, LogOptions, LogResult, MessageLevel, OpenMode};

#[derive(Parser)]
#[command(name = "logh", about = "logh: append to and inspect leveled log files")]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// TOML file with handle options
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one message to a log file
    Append {
        /// Path to the log file
        file: PathBuf,
        /// Level: a number, or critical, error, warning, info, debug
        level: String,
        /// The message text
        text: String,
        /// Discard existing content first
        #[arg(long)]
        truncate: bool,
        /// Prefix the record with the local time
        #[arg(long)]
        timestamps: bool,
        /// Skip the message if its level is above this one
        #[arg(long)]
        threshold: Option<String>,
    },
    /// Count the records in a log file
    Count {
        /// Path to the log file
        file: PathBuf,
    },
    /// Print the records in a log file
    Show {
        /// Path to the log file
        file: PathBuf,
        /// Only show records at or below this level
        #[arg(long)]
        max_level: Option<String>,
        /// Show only the last N records
        #[arg(long)]
        limit: Option<usize>,
        /// Line layout: auto, plain or timestamped (default: from --config, else auto)
        #[arg(long)]
        layout: Option<String>,
    },
    /// Delete a log file if it is empty
    Tidy {
        /// Path to the log file
        file: PathBuf,
    },
    /// Write a configuration file with default options
    InitConfig {
        /// Path to the TOML file to create
        file: PathBuf,
    },
}

fn parse_level(name: &str) -> MessageLevel {
    match MessageLevel::from_name(name) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(3);
        }
    }
}

fn load_options(config: Option<&PathBuf>) -> LogResult<LogOptions> {
    match config {
        Some(path) => LogOptions::load(path),
        None => Ok(LogOptions::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let result = match cli.command {
        Commands::Append {
            file,
            level,
            text,
            truncate,
            timestamps,
            threshold,
        } => {
            let level = parse_level(&level);
            let threshold = threshold.as_deref().map(parse_level);
            load_options(cli.config.as_ref()).and_then(|mut options| {
                if truncate {
                    options.mode = OpenMode::Truncate;
                }
                if timestamps {
                    options.timestamps = true;
                }
                if threshold.is_some() {
                    options.threshold = threshold;
                }
                commands::cmd_append(&file, level, &text, options, json)
            })
        }
        Commands::Count { file } => commands::cmd_count(&file, json),
        Commands::Show {
            file,
            max_level,
            limit,
            layout,
        } => {
            let max_level = max_level.as_deref().map(parse_level);
            let layout = match layout.as_deref() {
                Some(name) => match LineLayout::from_name(name) {
                    Some(layout) => Ok(layout),
                    None => {
                        eprintln!("Invalid layout: {}", name);
                        process::exit(3);
                    }
                },
                None => match &cli.config {
                    Some(_) => {
                        load_options(cli.config.as_ref()).map(|o| LineLayout::for_options(&o))
                    }
                    None => Ok(LineLayout::Auto),
                },
            };
            layout.and_then(|layout| commands::cmd_show(&file, max_level, limit, layout, json))
        }
        Commands::Tidy { file } => commands::cmd_tidy(&file, json),
        Commands::InitConfig { file } => commands::cmd_init_config(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            LogError::Io(_) => 1,
            LogError::PermissionDenied { .. } => 2,
            LogError::InvalidPath(_) | LogError::InvalidLevel(_) => 3,
            LogError::Config(_) => 4,
        };
        process::exit(code);
    }
}
