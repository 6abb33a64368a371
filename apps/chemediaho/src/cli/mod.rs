//! # che media ho? CLI Module
//!
//! This module implements the CLI interface.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `average` - Average of a grade list
//! - `goal` - Grade(s) needed for a target average
//! - `predict` - Average after hypothetical grades
//! - `suggest` - Subjects ranked by ease of reaching a target
//! - `summary` - Summary of a ClasseViva grades file
//! - `trend` - Running-average or period series
//! - `export` - Export a grades file to CSV

mod commands;

use crate::config::AppConfig;
use chemediaho_core::MediaError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// che media ho? - grade averages, goals and predictions
///
/// Works on comma-separated grade lists or on a ClasseViva grades payload
/// saved as JSON.
#[derive(Parser, Debug)]
#[command(name = "chemediaho")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Leave blue grades out of every average
    #[arg(long, global = true)]
    pub exclude_blue: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Average of a grade list
    Average {
        /// Grades, comma-separated (e.g. 6,7.5,8)
        #[arg(short, long)]
        grades: String,
    },

    /// Grade(s) needed to reach a target average
    Goal {
        /// Current grades, comma-separated
        #[arg(short, long, default_value = "")]
        grades: String,

        /// ClasseViva grades file (instead of --grades)
        #[arg(short, long, conflicts_with = "grades")]
        file: Option<PathBuf>,

        /// Period of the file to use
        #[arg(long, requires = "file")]
        period: Option<u32>,

        /// Subject of the file to use (needs --period)
        #[arg(long, requires = "period")]
        subject: Option<String>,

        /// Target average
        #[arg(short, long)]
        target: f64,

        /// Number of future grades (1-10) or "auto"
        #[arg(short, long, default_value = "1")]
        num_grades: String,
    },

    /// Average after hypothetical grades
    Predict {
        /// Current grades, comma-separated
        #[arg(short, long, default_value = "")]
        grades: String,

        /// ClasseViva grades file (instead of --grades)
        #[arg(short, long, conflicts_with = "grades")]
        file: Option<PathBuf>,

        /// Period of the file to use
        #[arg(long, requires = "file")]
        period: Option<u32>,

        /// Subject of the file to use (needs --period)
        #[arg(long, requires = "period")]
        subject: Option<String>,

        /// Hypothetical grades, comma-separated
        #[arg(short, long)]
        predicted: String,
    },

    /// Subjects ranked by how easily each reaches a target
    Suggest {
        /// Subject and grades as NAME=6,7,8 (repeatable)
        #[arg(short, long = "subject", value_name = "NAME=GRADES")]
        subjects: Vec<String>,

        /// ClasseViva grades file (instead of --subject)
        #[arg(short, long, conflicts_with = "subjects")]
        file: Option<PathBuf>,

        /// Period of the file to use (default: all periods)
        #[arg(long, requires = "file")]
        period: Option<u32>,

        /// Target average
        #[arg(short, long)]
        target: f64,

        /// Number of future grades (1-10) or "auto"
        #[arg(short, long, default_value = "1")]
        num_grades: String,

        /// Maximum suggestions shown
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Summary of a ClasseViva grades file
    Summary {
        /// Path to the grades file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Running average of a subject, or the period averages
    Trend {
        /// Path to the grades file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Subject to follow (default: period averages)
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Export a grades file to CSV
    Export {
        /// Path to the grades file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = chemediaho_core::CSV_FILENAME)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MediaError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.exclude_blue {
        config.grades.include_blue_grades = false;
    }
    let json_mode = cli.json_mode;

    if cli.verbose {
        tracing::info!(?config, "Configuration loaded");
    }

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Average { grades }) => cmd_average(json_mode, &grades),
        Some(Commands::Goal {
            grades,
            file,
            period,
            subject,
            target,
            num_grades,
        }) => {
            let source = GradeSource::new(grades, file, period, subject);
            cmd_goal(&config, json_mode, &source, target, &num_grades)
        }
        Some(Commands::Predict {
            grades,
            file,
            period,
            subject,
            predicted,
        }) => {
            let source = GradeSource::new(grades, file, period, subject);
            cmd_predict(&config, json_mode, &source, &predicted)
        }
        Some(Commands::Suggest {
            subjects,
            file,
            period,
            target,
            num_grades,
            limit,
        }) => cmd_suggest(
            &config,
            json_mode,
            &subjects,
            file.as_deref(),
            period,
            target,
            &num_grades,
            limit,
        ),
        Some(Commands::Summary { file }) => cmd_summary(&config, json_mode, &file),
        Some(Commands::Trend { file, subject }) => {
            cmd_trend(&config, json_mode, &file, subject.as_deref())
        }
        Some(Commands::Export { file, output }) => cmd_export(&file, &output),
        None => {
            // No subcommand - start the server with the loaded config
            cmd_server(config).await
        }
    }
}
