// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Pre-transfer session report
//!
//! Summarises what is about to be uploaded, one row per day. Sizes come
//! from the inventory, so no external disk-usage query is needed.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::inventory::{DayBucket, DayKey, ScanStats};
use crate::utils::format_size;

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub day: DayKey,
    pub files: usize,
    pub bytes: u64,
    pub size: String,
}

/// The report shown before any network activity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub source: PathBuf,
    pub rows: Vec<ReportRow>,
    pub total_files: usize,
    pub total_days: usize,
    pub total_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanStats>,
}

impl SessionReport {
    /// Build the report from the bucket, in ascending day order.
    pub fn from_bucket(bucket: &DayBucket, source: &Path) -> Self {
        let rows: Vec<ReportRow> = bucket
            .iter()
            .map(|(day, files)| {
                let bytes: u64 = files.iter().map(|r| r.size).sum();
                ReportRow {
                    day: *day,
                    files: files.len(),
                    bytes,
                    size: format_size(bytes),
                }
            })
            .collect();

        Self {
            source: source.to_path_buf(),
            total_files: rows.iter().map(|r| r.files).sum(),
            total_days: rows.len(),
            total_bytes: rows.iter().map(|r| r.bytes).sum(),
            rows,
            scan: None,
        }
    }

    /// Attach scan statistics (shown in JSON output only).
    pub fn with_scan_stats(mut self, stats: ScanStats) -> Self {
        self.scan = Some(stats);
        self
    }

    /// Days covered, in report order.
    pub fn days(&self) -> Vec<DayKey> {
        self.rows.iter().map(|r| r.day).collect()
    }

    /// Summary line for the bottom of the table.
    pub fn summary_line(&self) -> String {
        format!(
            "Total: {} recording(s) over {} day(s), {}",
            self.total_files,
            self.total_days,
            format_size(self.total_bytes)
        )
    }

    /// Render the human-readable table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Recordings in '{}':\n\n", self.source.display()));

        if self.rows.is_empty() {
            out.push_str("  (no recordings before today)\n\n");
        } else {
            out.push_str(&format!("  {:<10} {:>7} {:>12}\n", "Day", "Files", "Size"));
            out.push_str(&format!("  {:-<10} {:->7} {:->12}\n", "", "", ""));
            for row in &self.rows {
                out.push_str(&format!(
                    "  {:<10} {:>7} {:>12}\n",
                    row.day.as_key(),
                    row.files,
                    row.size
                ));
            }
            out.push('\n');
        }

        out.push_str(&self.summary_line());
        out.push('\n');
        out
    }

    /// Write the human-readable table. JSON runs embed the report in the
    /// run document instead.
    pub fn write_text(&self, out: &mut dyn Write) -> Result<()> {
        write!(out, "{}", self.render_table())?;
        Ok(())
    }
}
