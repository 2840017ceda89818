// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Upload finished Foscam motion recordings to an FTPS server, one remote
/// directory per day
#[derive(Parser, Debug)]
#[command(name = "foscam-upload")]
#[command(version, about = "Upload Foscam motion recordings over FTPS")]
pub struct Cli {
    /// Config file path (defaults to $FOSCAM_UPLOAD_CONFIG or ~/.foscam_upload.cfg)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report and log in, but do not create directories or upload
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for the report and summary
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, hide = true)]
    pub today: Option<NaiveDate>,
}

/// Output format for the report
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["foscam-upload"]);
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.today.is_none());
    }

    #[test]
    fn test_cli_config_short() {
        let cli = Cli::parse_from(["foscam-upload", "-c", "/etc/cam.cfg"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/cam.cfg")));
    }

    #[test]
    fn test_cli_config_long() {
        let cli = Cli::parse_from(["foscam-upload", "--config", "/etc/cam.cfg"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/cam.cfg")));
    }

    #[test]
    fn test_cli_dry_run() {
        assert!(Cli::parse_from(["foscam-upload", "-d"]).dry_run);
        assert!(Cli::parse_from(["foscam-upload", "--dry-run"]).dry_run);
    }

    #[test]
    fn test_cli_verbose_multiple() {
        let cli = Cli::parse_from(["foscam-upload", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["foscam-upload", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_today_override() {
        let cli = Cli::parse_from(["foscam-upload", "--today", "2023-01-03"]);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2023, 1, 3));
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["foscam-upload", "--today", "03/01/2023"]).is_err());
    }

    #[test]
    fn test_cli_rejects_positional() {
        assert!(Cli::try_parse_from(["foscam-upload", "extra"]).is_err());
    }
}
