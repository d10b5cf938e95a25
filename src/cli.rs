//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every flag is optional: with none given the
//! tool reads `event_attendees.csv` and `form_letter.html` from the
//! working directory and writes letters to `output/`.

use clap::Parser;
use std::path::PathBuf;

/// EventManager - thank-you letters for event attendees
///
/// Cleans the attendee roster, looks up each attendee's legislators,
/// writes a personalized letter per attendee and reports peak
/// registration hours and days.
///
/// Examples:
///   event_manager
///   event_manager --roster attendees.csv --output-dir letters
///   event_manager --offline
///   event_manager --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Attendee roster CSV file
    #[arg(short, long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Letter template file
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Directory the letters are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File holding the civic information API key
    #[arg(short, long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .event_manager.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Civic API request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip the civic lookup; every letter gets the fallback message
    ///
    /// No API key is needed in this mode.
    #[arg(long)]
    pub offline: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .event_manager.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
