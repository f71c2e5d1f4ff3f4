//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// okrsync - GitHub-backed OKR progress tracker
///
/// Keeps a yearly OKR document in sync with GitHub activity
/// (contributions, pull requests, lines-of-code churn, account stats)
/// and prints a progress report.
///
/// Examples:
///   okrsync sync
///   okrsync set engineering loc 750
///   okrsync view
///   okrsync touch
///   okrsync init
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .okrsync.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub login to track (overrides config)
    #[arg(short, long, global = true, env = "OKRSYNC_USERNAME")]
    pub username: Option<String>,

    /// Calendar year to track (overrides config)
    #[arg(short, long, global = true, value_name = "YEAR")]
    pub year: Option<i32>,

    /// OKR document path (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub okr_file: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// What to do on this invocation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch GitHub metrics, merge them into the OKR document, then
    /// refresh the project list
    Sync,

    /// Set one metric's current value by hand
    ///
    /// The goal and metric must already exist in the document; this
    /// command never creates new structure.
    Set {
        /// Goal key (e.g. "engineering")
        goal: String,
        /// Metric key (e.g. "loc")
        metric: String,
        /// New value (parsed as integer if possible, else kept as text)
        value: String,
    },

    /// Print the formatted progress report
    View,

    /// Update only the lastUpdate timestamp (heartbeat)
    Touch,

    /// Generate a default .okrsync.toml configuration file
    Init,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(year) = self.year {
            if !(2000..=2100).contains(&year) {
                return Err(format!("Year out of range: {}", year));
            }
        }

        if let Some(ref username) = self.username {
            if username.is_empty() {
                return Err("Username must not be empty".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            command,
            config: None,
            username: None,
            year: None,
            okr_file: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_set_command() {
        let args = Args::parse_from(["okrsync", "set", "engineering", "loc", "750"]);
        match args.command {
            Command::Set {
                goal,
                metric,
                value,
            } => {
                assert_eq!(goal, "engineering");
                assert_eq!(metric, "loc");
                assert_eq!(value, "750");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_set_requires_three_positionals() {
        let result = Args::try_parse_from(["okrsync", "set", "engineering", "loc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::View);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_year_range() {
        let mut args = make_args(Command::Sync);
        args.year = Some(1999);
        assert!(args.validate().is_err());
        args.year = Some(2026);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::View);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
