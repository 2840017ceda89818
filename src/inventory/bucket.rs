// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-day grouping of recordings

use std::collections::BTreeMap;

use super::recording::{DayKey, Recording};

/// Ordered map from day to that day's recordings.
///
/// Iteration is always in ascending day order, and recordings within a day
/// are kept sorted by name. Both the report and the transfer plan walk this
/// map, so they always cover the same days in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucket {
    days: BTreeMap<DayKey, Vec<Recording>>,
}

impl DayBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recording under its own day.
    pub fn insert(&mut self, recording: Recording) {
        let files = self.days.entry(recording.day()).or_default();
        let pos = files
            .binary_search_by(|r| r.name.cmp(&recording.name))
            .unwrap_or_else(|p| p);
        files.insert(pos, recording);
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of distinct days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of recordings for one day (0 if absent).
    pub fn count(&self, day: &DayKey) -> usize {
        self.days.get(day).map_or(0, Vec::len)
    }

    /// Total number of recordings across all days.
    pub fn total_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Total bytes for one day.
    pub fn day_size(&self, day: &DayKey) -> u64 {
        self.days
            .get(day)
            .map_or(0, |files| files.iter().map(|r| r.size).sum())
    }

    /// Total bytes across all days.
    pub fn total_size(&self) -> u64 {
        self.days.values().flatten().map(|r| r.size).sum()
    }

    pub fn contains(&self, day: &DayKey) -> bool {
        self.days.contains_key(day)
    }

    /// Days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = &DayKey> {
        self.days.keys()
    }

    /// `(day, recordings)` pairs in ascending day order.
    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, &[Recording])> {
        self.days.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Day-key string to count.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.days
            .iter()
            .map(|(k, v)| (k.as_key(), v.len()))
            .collect()
    }
}
