// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Transfer driver
//!
//! Runs a [`TransferPlan`] over a single control session. A failed day does
//! not stop the run; every day gets a [`DayResult`] and the caller decides
//! what the summary means for the exit status.

use serde::Serialize;

use crate::config::Settings;
use crate::error::Result;
use crate::inventory::DayKey;
use crate::secret::Secret;

use super::command::SessionCommand;
use super::observer::TransferObserver;
use super::plan::{DayPlan, TransferPlan};
use super::session::{open_session, TransferClient, TransferSession};

/// What happened to one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum DayStatus {
    Uploaded,
    /// Dry run: commands were only logged
    Planned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayResult {
    pub day: DayKey,
    pub files: usize,
    #[serde(flatten)]
    pub status: DayStatus,
}

/// Per-day results of a run, in day order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    pub dry_run: bool,
    pub results: Vec<DayResult>,
}

impl TransferSummary {
    pub fn uploaded(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Uploaded))
    }

    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Planned))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, DayStatus::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn days(&self) -> Vec<DayKey> {
        self.results.iter().map(|r| r.day).collect()
    }

    fn count(&self, pred: impl Fn(&DayStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    /// Closing summary printed after the transfer stage.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.dry_run {
            out.push_str(&format!(
                "Dry run: {} day(s) planned, nothing sent.\n",
                self.planned()
            ));
            return out;
        }

        out.push_str(&format!(
            "Uploaded {} of {} day(s).\n",
            self.uploaded(),
            self.results.len()
        ));
        let failures: Vec<&DayResult> = self
            .results
            .iter()
            .filter(|r| matches!(r.status, DayStatus::Failed(_)))
            .collect();
        if !failures.is_empty() {
            out.push_str(&format!("{} day(s) failed:\n", failures.len()));
            for result in failures {
                if let DayStatus::Failed(reason) = &result.status {
                    out.push_str(&format!("  {}: {}\n", result.day, reason));
                }
            }
        }
        out
    }
}

/// Open one session, run every day of `plan`, close the session.
///
/// Fails only if the session cannot be opened, in which case no day
/// command has been sent.
pub async fn run_transfer(
    client: &dyn TransferClient,
    settings: &Settings,
    plan: &TransferPlan,
    secret: &Secret,
    dry_run: bool,
    observer: &mut dyn TransferObserver,
) -> Result<TransferSummary> {
    let mut session = open_session(client, settings, secret, &plan.setup).await?;

    tracing::info!(
        target: "foscam.transfer",
        host = %settings.remote_ftp_hostname,
        days = plan.days.len(),
        dry_run,
        "Control session open"
    );

    let mut summary = TransferSummary {
        dry_run,
        results: Vec::with_capacity(plan.days.len()),
    };

    let run = run_days(session.as_mut(), plan, dry_run, observer, &mut summary).await;

    if let Err(e) = session.close().await {
        tracing::warn!(target: "foscam.transfer", error = %e, "Error while closing session");
    }
    observer.on_session_closed()?;
    run?;

    tracing::info!(
        target: "foscam.transfer",
        uploaded = summary.uploaded(),
        failed = summary.failed(),
        planned = summary.planned(),
        "Transfer finished"
    );

    Ok(summary)
}

async fn run_days(
    session: &mut dyn TransferSession,
    plan: &TransferPlan,
    dry_run: bool,
    observer: &mut dyn TransferObserver,
    summary: &mut TransferSummary,
) -> Result<()> {
    if let Some(host) = plan.setup.iter().find_map(|c| match c {
        SessionCommand::Open { host } => Some(host.as_str()),
        _ => None,
    }) {
        observer.on_session_open(host)?;
    }

    for day in &plan.days {
        observer.on_day_start(day)?;

        let status = if dry_run {
            for command in day.commands() {
                tracing::info!(target: "foscam.transfer", day = %day.day, "[dry-run] {}", command);
                observer.on_command(&day.day, command, true)?;
            }
            DayStatus::Planned
        } else {
            upload_day(session, day, observer).await?
        };

        let result = DayResult {
            day: day.day,
            files: day.files,
            status,
        };
        if let DayStatus::Failed(reason) = &result.status {
            tracing::warn!(target: "foscam.transfer", day = %day.day, reason = %reason, "Day failed");
        }
        observer.on_day_finished(&result)?;
        summary.results.push(result);
    }

    Ok(())
}

/// Send one day's commands. Transport errors become a failed day rather
/// than an error so later days still run.
async fn upload_day(
    session: &mut dyn TransferSession,
    day: &DayPlan,
    observer: &mut dyn TransferObserver,
) -> Result<DayStatus> {
    for mkdir in &day.mkdirs {
        observer.on_command(&day.day, mkdir, false)?;
        match session.send(mkdir).await {
            Ok(outcome) if !outcome.success => {
                // Usually "already exists"; the mirror will fail if it wasn't.
                tracing::debug!(
                    target: "foscam.transfer",
                    command = %mkdir,
                    reason = %outcome.reason(),
                    "mkdir not applied"
                );
            }
            Ok(_) => {}
            Err(e) => return Ok(DayStatus::Failed(e.to_string())),
        }
    }

    observer.on_command(&day.day, &day.mirror, false)?;
    let status = match session.send(&day.mirror).await {
        Ok(outcome) if outcome.success => DayStatus::Uploaded,
        Ok(outcome) => DayStatus::Failed(outcome.reason()),
        Err(e) => DayStatus::Failed(e.to_string()),
    };
    Ok(status)
}
