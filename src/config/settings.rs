// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for foscam-upload
//!
//! Settings are read from a plain-text file with one `key = value` pair per
//! line (default `~/.foscam_upload.cfg`). Lines starting with `#` are
//! comments.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

mod io;
mod validation;

pub use io::CONFIG_PATH_ENV;

/// Key for the remote FTPS host name
pub const KEY_REMOTE_HOST: &str = "remote_ftp_hostname";
/// Key for the FTP login name
pub const KEY_USER_NAME: &str = "ftp_user_name";
/// Key for the local recordings directory
pub const KEY_LOCAL_SOURCE: &str = "local_source_path";
/// Key for the remote base directory
pub const KEY_REMOTE_DEST: &str = "remote_dest_path";
/// Optional key for the transfer client binary
pub const KEY_TRANSFER_CLIENT: &str = "transfer_client";
/// Optional key controlling TLS certificate verification
pub const KEY_VERIFY_CERTIFICATE: &str = "verify_certificate";

/// Keys that must be present (and non-empty) in every config file
pub const REQUIRED_KEYS: [&str; 4] = [
    KEY_REMOTE_HOST,
    KEY_USER_NAME,
    KEY_LOCAL_SOURCE,
    KEY_REMOTE_DEST,
];

const OPTIONAL_KEYS: [&str; 2] = [KEY_TRANSFER_CLIENT, KEY_VERIFY_CERTIFICATE];

/// Default transfer client program name, resolved on `PATH`
pub const DEFAULT_TRANSFER_CLIENT: &str = "lftp";

/// Validated uploader settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Remote FTPS host (optionally `ftps://host[:port]`)
    pub remote_ftp_hostname: String,

    /// Login name on the remote host
    pub ftp_user_name: String,

    /// Directory holding the `MDalarm_*` recordings
    pub local_source_path: PathBuf,

    /// Remote base directory; day directories are created beneath it
    pub remote_dest_path: String,

    /// Transfer client binary (name on `PATH` or explicit path)
    pub transfer_client: String,

    /// Whether the server's TLS certificate must verify
    pub verify_certificate: bool,
}

/// Raw key/value pairs as read from a config file, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    entries: BTreeMap<String, String>,
}

impl RawConfig {
    /// Parse config text.
    ///
    /// Malformed lines, unknown keys and duplicates are reported through
    /// `tracing` and otherwise tolerated; only missing keys are fatal, and
    /// that is decided later by [`Settings::from_raw`].
    pub fn parse(content: &str) -> Self {
        let mut entries = BTreeMap::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                tracing::warn!(
                    target: "foscam.config",
                    line = line_no,
                    "Ignoring config line without '='"
                );
                continue;
            };

            let key = key.trim();
            let value = value.trim();

            if !REQUIRED_KEYS.contains(&key) && !OPTIONAL_KEYS.contains(&key) {
                tracing::warn!(
                    target: "foscam.config",
                    line = line_no,
                    key,
                    "Ignoring unknown config key"
                );
                continue;
            }

            if entries
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                tracing::warn!(
                    target: "foscam.config",
                    line = line_no,
                    key,
                    "Duplicate config key, last value wins"
                );
            }
        }

        Self { entries }
    }

    /// Look up a value; empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set a value (used by tests and programmatic construction).
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
