// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for foscam-upload
//!
//! Handles locating, parsing and validating the `key = value` config file.

pub mod settings;

pub use settings::*;
