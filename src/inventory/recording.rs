// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Recording filenames and day keys

use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Serialize, Serializer};

/// Filename prefix the camera uses for motion-alarm recordings
pub const RECORDING_PREFIX: &str = "MDalarm_";

fn recording_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^MDalarm_(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})\.([A-Za-z0-9]+)$")
            .expect("recording regex must be valid")
    })
}

/// Parse `MDalarm_YYYYMMDD_HHMMSS.<ext>` into its timestamp and extension.
///
/// Returns `None` for anything that doesn't match, including names whose
/// digits don't form a real date or time.
pub fn parse_recording_name(name: &str) -> Option<(NaiveDateTime, String)> {
    let caps = recording_regex().captures(name)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();

    let year = caps[1].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;
    let time = NaiveTime::from_hms_opt(num(4)?, num(5)?, num(6)?)?;

    Some((NaiveDateTime::new(date, time), caps[7].to_string()))
}

/// Calendar day used as the grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Canonical 8-digit `YYYYMMDD` form.
    pub fn as_key(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// The three nested remote directories for this day, outermost first:
    /// `<base>/<yyyy>`, `<base>/<yyyy>/<yyyy>-<mm>`, `<base>/<yyyy>/<yyyy>-<mm>/<yyyy>-<mm>-<dd>`.
    pub fn remote_levels(&self, remote_base: &str) -> [String; 3] {
        let base = remote_base.trim_end_matches('/');
        let year = format!("{}/{:04}", base, self.0.year());
        let month = format!("{}/{}", year, self.0.format("%Y-%m"));
        let day = format!("{}/{}", month, self.0.format("%Y-%m-%d"));
        [year, month, day]
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_key())
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// A single recording file found in the source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recording {
    pub name: String,
    #[serde(skip)]
    pub recorded_at: NaiveDateTime,
    pub extension: String,
    pub size: u64,
}

impl Recording {
    /// Build a recording from a filename, or `None` if it isn't one.
    pub fn from_name(name: &str, size: u64) -> Option<Self> {
        let (recorded_at, extension) = parse_recording_name(name)?;
        Some(Self {
            name: name.to_string(),
            recorded_at,
            extension,
            size,
        })
    }

    pub fn day(&self) -> DayKey {
        DayKey(self.recorded_at.date())
    }
}
