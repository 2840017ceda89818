// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Utility functions for foscam-upload
//!
//! Pure formatting helpers shared by the binary and the report.

use chrono::{DateTime, TimeZone};

use crate::error::UploadError;

/// Format a size in bytes to human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format an error for display to the user
pub fn format_error(error: &UploadError) -> String {
    match error {
        UploadError::MissingKeys(keys) => {
            let mut msg = String::from("Error: configuration is missing required keys:\n");
            for key in keys {
                msg.push_str(&format!("  - '{}' not found\n", key));
            }
            msg.push_str("Add them as 'key = value' lines to the configuration file.");
            msg
        }
        UploadError::ConfigNotFound(path) => format!(
            "Error: configuration file '{}' not found.\nUse -c <path> to point at another file.",
            path.display()
        ),
        _ => format!("Error: {}", error),
    }
}

/// Timestamp line printed when a run starts, e.g. `Mon 2023-01-02 08:15:00 AM`.
pub fn format_banner_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%a %Y-%m-%d %I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    // ==================== format_size tests ====================

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn test_format_size_gigabytes() {
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    // ==================== format_error tests ====================

    #[test]
    fn test_format_error_missing_keys() {
        let msg = format_error(&UploadError::MissingKeys(vec![
            "ftp_user_name".into(),
            "remote_dest_path".into(),
        ]));
        assert!(msg.contains("'ftp_user_name' not found"));
        assert!(msg.contains("'remote_dest_path' not found"));
    }

    #[test]
    fn test_format_error_config_not_found() {
        let msg = format_error(&UploadError::ConfigNotFound(PathBuf::from("/etc/x.cfg")));
        assert!(msg.contains("/etc/x.cfg"));
        assert!(msg.contains("-c <path>"));
    }

    #[test]
    fn test_format_error_generic() {
        let msg = format_error(&UploadError::Secret("cancelled".into()));
        assert!(msg.starts_with("Error: "));
        assert!(msg.contains("cancelled"));
    }

    // ==================== banner tests ====================

    #[test]
    fn test_format_banner_time() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 2, 20, 15, 0).unwrap();
        assert_eq!(format_banner_time(&ts), "Mon 2023-01-02 08:15:00 PM");
    }
}
