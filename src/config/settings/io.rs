// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::{Result, UploadError};

use super::{RawConfig, Settings};

/// Environment variable that overrides the default config location
pub const CONFIG_PATH_ENV: &str = "FOSCAM_UPLOAD_CONFIG";

const DEFAULT_FILE_NAME: &str = ".foscam_upload.cfg";

impl Settings {
    /// Get the default settings file path ($FOSCAM_UPLOAD_CONFIG or ~/.foscam_upload.cfg).
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_FILE_NAME)
    }

    /// Load settings from `path`, or from the default path when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()),
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(UploadError::ConfigNotFound(path.to_path_buf()));
        }

        tracing::debug!(target: "foscam.config", path = %path.display(), "Reading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_raw(&RawConfig::parse(&content))
    }
}
