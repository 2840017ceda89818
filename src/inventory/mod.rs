// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Recording inventory
//!
//! Scans the local recordings directory and groups `MDalarm_*` files into
//! per-day buckets keyed by calendar date.

pub mod bucket;
pub mod recording;
pub mod scanner;

pub use bucket::DayBucket;
pub use recording::{parse_recording_name, DayKey, Recording, RECORDING_PREFIX};
pub use scanner::{scan_source, Inventory, ScanStats};
