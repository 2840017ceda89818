// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! End-to-end upload run
//!
//! Validate, scan, report, then transfer. Nothing touches the network until
//! the report has been written and the bucket is known to be non-empty.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::config::Settings;
use crate::error::Result;
use crate::inventory::scan_source;
use crate::preflight::check_source_dir;
use crate::report::SessionReport;
use crate::secret::SecretPrompt;
use crate::transfer::{run_transfer, TransferClient, TransferObserver, TransferPlan, TransferSummary};

/// Exit code when there was nothing to upload
pub const EXIT_NOTHING_TO_UPLOAD: u8 = 10;

/// Exit code when at least one day failed
pub const EXIT_DAYS_FAILED: u8 = 5;

/// Per-run switches
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub dry_run: bool,
    pub format: OutputFormat,
    /// Recordings from this day are left alone
    pub today: NaiveDate,
}

/// Everything one run needs
pub struct UploadContext<'a> {
    pub settings: &'a Settings,
    pub options: UploadOptions,
    pub client: &'a dyn TransferClient,
    pub prompt: &'a dyn SecretPrompt,
    pub observer: &'a mut dyn TransferObserver,
    pub out: &'a mut dyn Write,
}

/// How a run ended, short of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The bucket was empty; no session was opened
    NothingToUpload,
    Completed(TransferSummary),
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::NothingToUpload => EXIT_NOTHING_TO_UPLOAD,
            RunOutcome::Completed(summary) if !summary.is_success() => EXIT_DAYS_FAILED,
            RunOutcome::Completed(_) => 0,
        }
    }
}

/// The one JSON document a `--format json` run writes
#[derive(Debug, Serialize)]
struct RunDocument<'a> {
    report: &'a SessionReport,
    /// `null` when nothing was uploaded
    summary: Option<&'a TransferSummary>,
}

fn write_document(
    out: &mut dyn Write,
    report: &SessionReport,
    summary: Option<&TransferSummary>,
) -> Result<()> {
    let document = RunDocument { report, summary };
    writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

pub async fn run_upload(ctx: UploadContext<'_>) -> Result<RunOutcome> {
    let UploadContext {
        settings,
        options,
        client,
        prompt,
        observer,
        out,
    } = ctx;
    let source = &settings.local_source_path;

    check_source_dir(source)?;

    let inventory = scan_source(source, options.today)?;
    let report = SessionReport::from_bucket(&inventory.bucket, source).with_scan_stats(inventory.stats);
    if options.format == OutputFormat::Text {
        report.write_text(out)?;
        out.flush()?;
    }

    if inventory.bucket.is_empty() {
        tracing::info!(target: "foscam.pipeline", source = %source.display(), "Nothing to upload");
        match options.format {
            OutputFormat::Text => writeln!(out, "Nothing to upload.")?,
            OutputFormat::Json => write_document(out, &report, None)?,
        }
        return Ok(RunOutcome::NothingToUpload);
    }

    let plan = TransferPlan::build(settings, &inventory.bucket);
    let secret = prompt.prompt_secret(&format!(
        "Password for {}@{}: ",
        settings.ftp_user_name, settings.remote_ftp_hostname
    ))?;

    let summary = run_transfer(client, settings, &plan, &secret, options.dry_run, observer).await?;

    match options.format {
        OutputFormat::Text => write!(out, "{}", summary.render())?,
        OutputFormat::Json => write_document(out, &report, Some(&summary))?,
    }

    Ok(RunOutcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::secret::{MockSecretPrompt, Secret};
    use crate::transfer::{MockTransferClient, NoopTransferObserver};
    use tempfile::TempDir;

    fn settings(source: &std::path::Path) -> Settings {
        Settings {
            remote_ftp_hostname: "ftp.example.com".into(),
            ftp_user_name: "camera".into(),
            local_source_path: source.to_path_buf(),
            remote_dest_path: "/backup".into(),
            transfer_client: "lftp".into(),
            verify_certificate: true,
        }
    }

    fn options(dry_run: bool) -> UploadOptions {
        UploadOptions {
            dry_run,
            format: OutputFormat::Text,
            today: NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
        }
    }

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), b"0123456789").unwrap();
    }

    #[tokio::test]
    async fn test_empty_source_opens_no_session() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230103_090000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt.expect_prompt_secret().times(0);
        let mut out = Vec::new();

        let outcome = run_upload(UploadContext {
            settings: &settings,
            options: options(false),
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::NothingToUpload);
        assert_eq!(outcome.exit_code(), 10);
        assert_eq!(client.sessions_started(), 0);
        assert!(String::from_utf8(out).unwrap().contains("Nothing to upload"));
    }

    #[tokio::test]
    async fn test_uploads_past_days() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230101_120000.mkv");
        touch(&dir, "MDalarm_20230102_080000.mkv");
        touch(&dir, "MDalarm_20230103_090000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt
            .expect_prompt_secret()
            .withf(|label| label.starts_with("Password for camera@ftp.example.com"))
            .times(1)
            .returning(|_| Ok(Secret::new("pw")));
        let mut out = Vec::new();

        let outcome = run_upload(UploadContext {
            settings: &settings,
            options: options(false),
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap();

        let RunOutcome::Completed(summary) = &outcome else {
            panic!("Expected completed run");
        };
        assert_eq!(summary.uploaded(), 2);
        assert_eq!(outcome.exit_code(), 0);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("20230101"));
        assert!(text.contains("Total: 2 recording(s) over 2 day(s)"));
        assert!(client.commands().iter().all(|c| !c.contains("20230103")));
    }

    #[tokio::test]
    async fn test_failed_day_sets_exit_code() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230101_120000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new().failing_day("20230101");
        let mut prompt = MockSecretPrompt::new();
        prompt
            .expect_prompt_secret()
            .returning(|_| Ok(Secret::new("pw")));
        let mut out = Vec::new();

        let outcome = run_upload(UploadContext {
            settings: &settings,
            options: options(false),
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap();
        assert_eq!(outcome.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_prompt() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir.path().join("missing"));
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt.expect_prompt_secret().times(0);
        let mut out = Vec::new();

        let err = run_upload(UploadContext {
            settings: &settings,
            options: options(false),
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, UploadError::SourceDir { .. }));
        assert_eq!(client.sessions_started(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_prompt_opens_no_session() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230101_120000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt
            .expect_prompt_secret()
            .returning(|_| Err(UploadError::Secret("cancelled".into())));
        let mut out = Vec::new();

        let err = run_upload(UploadContext {
            settings: &settings,
            options: options(false),
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 7);
        assert_eq!(client.sessions_started(), 0);
    }

    #[tokio::test]
    async fn test_json_report() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230101_120000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt
            .expect_prompt_secret()
            .returning(|_| Ok(Secret::new("pw")));
        let mut out = Vec::new();
        let mut opts = options(true);
        opts.format = OutputFormat::Json;

        run_upload(UploadContext {
            settings: &settings,
            options: opts,
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap();

        // The whole of stdout must be one parseable document.
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["report"]["totalFiles"], 1);
        assert_eq!(value["summary"]["dryRun"], true);
        assert_eq!(value["summary"]["results"][0]["status"], "planned");
    }

    #[tokio::test]
    async fn test_json_nothing_to_upload_is_one_document() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "MDalarm_20230103_090000.mkv");
        let settings = settings(dir.path());
        let client = MockTransferClient::new();
        let mut prompt = MockSecretPrompt::new();
        prompt.expect_prompt_secret().times(0);
        let mut out = Vec::new();
        let mut opts = options(false);
        opts.format = OutputFormat::Json;

        let outcome = run_upload(UploadContext {
            settings: &settings,
            options: opts,
            client: &client,
            prompt: &prompt,
            observer: &mut NoopTransferObserver,
            out: &mut out,
        })
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::NothingToUpload);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["report"]["totalFiles"], 0);
        assert!(value["summary"].is_null());
    }
}
