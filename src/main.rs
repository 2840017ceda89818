// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! foscam-upload
//!
//! Entry point for the foscam-upload CLI.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use foscam_upload::cli::{Cli, OutputFormat};
use foscam_upload::config::Settings;
use foscam_upload::error::Result;
use foscam_upload::pipeline::{run_upload, RunOutcome, UploadContext, UploadOptions};
use foscam_upload::preflight::locate_program;
use foscam_upload::secret::TerminalPrompt;
use foscam_upload::transfer::{ConsoleObserver, LftpClient};
use foscam_upload::utils;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` turns on our own targets; `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { "trace" } else { "debug" };
        for target in [
            "foscam.config",
            "foscam.inventory",
            "foscam.preflight",
            "foscam.pipeline",
            "foscam.transfer",
            "foscam.transfer.lftp",
        ] {
            if let Ok(parsed) = format!("{}={}", target, level).parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}", utils::format_error(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let mut stdout = io::stdout();

    // Keep stdout pure JSON when asked for it.
    let mut console: Box<dyn Write> = match cli.format {
        OutputFormat::Json => Box::new(io::stderr()),
        OutputFormat::Text => Box::new(io::stdout()),
    };

    writeln!(console, "{}", utils::format_banner_time(&Local::now()))?;
    if cli.dry_run {
        writeln!(console, "Dry run: directories will not be created and nothing will be uploaded.")?;
    }
    tracing::debug!(
        target: "foscam.pipeline",
        config = ?cli.config,
        dry_run = cli.dry_run,
        format = ?cli.format,
        today = ?cli.today,
        "Parsed arguments"
    );

    let settings = Settings::load(cli.config.as_deref())?;
    let program = locate_program(&settings.transfer_client)?;
    let client = LftpClient::new(program);

    let options = UploadOptions {
        dry_run: cli.dry_run,
        format: cli.format,
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
    };

    let mut observer = ConsoleObserver::new(console);
    run_upload(UploadContext {
        settings: &settings,
        options,
        client: &client,
        prompt: &TerminalPrompt,
        observer: &mut observer,
        out: &mut stdout,
    })
    .await
}
