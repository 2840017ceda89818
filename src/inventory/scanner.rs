// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Source directory scanning
//!
//! Only the top level of the source directory is read. Membership in the
//! bucket depends on the filename alone; metadata is consulted only for the
//! file size shown in the report.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::bucket::DayBucket;
use super::recording::{DayKey, Recording};
use crate::error::{Result, UploadError};

/// Counters describing what the scan saw and skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Directory entries examined
    pub entries: usize,
    /// Entries skipped because they are directories
    pub directories: usize,
    /// Entries whose names are not recordings
    pub malformed: usize,
    /// Recordings skipped because they belong to today
    pub today: usize,
}

/// Result of scanning the source directory
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub bucket: DayBucket,
    pub stats: ScanStats,
}

/// Scan `dir` and bucket every recording not dated `today`.
///
/// Failing to open the directory is fatal; problems with individual
/// entries are logged and the entry is skipped.
pub fn scan_source(dir: &Path, today: NaiveDate) -> Result<Inventory> {
    let entries = std::fs::read_dir(dir).map_err(|e| UploadError::SourceDir {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let today = DayKey::new(today);
    let mut inventory = Inventory::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(target: "foscam.inventory", error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        inventory.stats.entries += 1;

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            inventory.stats.malformed += 1;
            continue;
        };

        // file_type() doesn't follow symlinks; a link to a directory is
        // still a directory for our purposes.
        let is_dir = entry.path().is_dir();
        if is_dir {
            inventory.stats.directories += 1;
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!(target: "foscam.inventory", file = %name, error = %e, "Could not read file size");
                0
            }
        };

        let Some(recording) = Recording::from_name(&name, size) else {
            tracing::trace!(target: "foscam.inventory", file = %name, "Not a recording");
            inventory.stats.malformed += 1;
            continue;
        };

        if recording.day() == today {
            inventory.stats.today += 1;
            continue;
        }

        inventory.bucket.insert(recording);
    }

    tracing::debug!(
        target: "foscam.inventory",
        dir = %dir.display(),
        recordings = inventory.bucket.total_count(),
        days = inventory.bucket.day_count(),
        skipped_today = inventory.stats.today,
        skipped_malformed = inventory.stats.malformed,
        skipped_dirs = inventory.stats.directories,
        "Scan complete"
    );

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn touch(dir: &Path, name: &str, bytes: usize) {
        fs::write(dir.join(name), vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_scan_reference_scenario() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "MDalarm_20230101_120000.mkv", 100);
        touch(temp_dir.path(), "MDalarm_20230101_130000.mkv", 200);
        touch(temp_dir.path(), "MDalarm_20230102_080000.mkv", 50);

        let inventory = scan_source(temp_dir.path(), date(2023, 1, 3)).unwrap();
        let counts = inventory.bucket.counts();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts["20230101"], 2);
        assert_eq!(counts["20230102"], 1);
        assert_eq!(inventory.bucket.total_count(), 3);
        assert_eq!(inventory.bucket.total_size(), 350);
    }

    #[test]
    fn test_scan_excludes_today() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "MDalarm_20230103_000100.mkv", 1);
        touch(temp_dir.path(), "MDalarm_20230102_235959.mkv", 1);

        let inventory = scan_source(temp_dir.path(), date(2023, 1, 3)).unwrap();
        assert_eq!(inventory.bucket.total_count(), 1);
        assert!(!inventory.bucket.contains(&DayKey::new(date(2023, 1, 3))));
        assert_eq!(inventory.stats.today, 1);
    }

    #[test]
    fn test_scan_skips_directories_and_malformed() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("MDalarm_20230101_120000.mkv")).unwrap();
        touch(temp_dir.path(), "snapshot.jpg", 1);
        touch(temp_dir.path(), "MDalarm_20230101_120000.mkv.tmp", 1);

        let inventory = scan_source(temp_dir.path(), date(2023, 1, 3)).unwrap();
        assert!(inventory.bucket.is_empty());
        assert_eq!(inventory.stats.directories, 1);
        assert_eq!(inventory.stats.malformed, 2);
        assert_eq!(inventory.stats.entries, 3);
    }

    #[test]
    fn test_scan_only_today_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "MDalarm_20230103_120000.mkv", 1);

        let inventory = scan_source(temp_dir.path(), date(2023, 1, 3)).unwrap();
        assert!(inventory.bucket.is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        match scan_source(&missing, date(2023, 1, 3)) {
            Err(UploadError::SourceDir { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected SourceDir, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "MDalarm_20230105_010000.mkv",
            "MDalarm_20230101_120000.mkv",
            "MDalarm_20230103_080000.avi",
        ] {
            touch(temp_dir.path(), name, 3);
        }

        let first = scan_source(temp_dir.path(), date(2023, 2, 1)).unwrap();
        let second = scan_source(temp_dir.path(), date(2023, 2, 1)).unwrap();
        assert_eq!(first.bucket, second.bucket);
    }
}
