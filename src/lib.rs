// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! foscam-upload - move finished motion recordings off a Foscam camera share
//! onto an FTPS server.
//!
//! This crate exposes the runtime used by the `foscam-upload` CLI
//! (`src/main.rs`).
//!
//! Architecture highlights:
//! - `config`: key/value configuration file, validation and defaults
//! - `inventory`: source directory scan and per-day bucketing
//! - `report`: pre-transfer report (text table or JSON)
//! - `transfer`: command plan, control-session abstraction, lftp backend
//! - `pipeline`: the end-to-end run tying the stages together

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod pipeline;
pub mod preflight;
pub mod report;
pub mod secret;
pub mod transfer;
pub mod utils;

pub use error::{Result, UploadError};
