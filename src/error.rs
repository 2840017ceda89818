// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for foscam-upload
//!
//! This module defines all error types used throughout the application,
//! along with the process exit code each one maps to.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for upload operations
#[derive(Error, Debug)]
pub enum UploadError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration errors (bad values, unsupported schemes)
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required configuration keys are missing
    #[error("Configuration is missing required key(s): {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// Local source directory is missing or unreadable
    #[error("Source directory '{}' is not usable: {reason}", path.display())]
    SourceDir { path: PathBuf, reason: String },

    /// Transfer client executable could not be located
    #[error("Transfer client not found: {0}")]
    ClientNotFound(String),

    /// Secret prompt was cancelled or failed
    #[error("Password prompt failed: {0}")]
    Secret(String),

    /// Control session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Control-session error types
#[derive(Error, Debug)]
pub enum SessionError {
    /// The transfer client process could not be started
    #[error("Failed to start transfer client: {0}")]
    Spawn(String),

    /// Opening the session did not finish in time
    #[error("Timed out after {0} seconds while connecting")]
    ConnectTimeout(u64),

    /// The remote endpoint refused the connection or the login
    #[error("Could not connect to {host}: {message}")]
    ConnectFailed { host: String, message: String },

    /// The transfer client exited while commands were still pending
    #[error("Transfer client exited unexpectedly (status {0:?})")]
    ClientExited(Option<i32>),

    /// Unexpected output or broken pipe on the control channel
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl UploadError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            UploadError::ConfigNotFound(_)
            | UploadError::Config(_)
            | UploadError::MissingKeys(_) => 2,
            UploadError::SourceDir { .. } => 3,
            UploadError::Session(_) => 4,
            UploadError::ClientNotFound(_) => 6,
            UploadError::Secret(_) => 7,
            UploadError::Io(_) | UploadError::Json(_) => 1,
        }
    }
}

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;
