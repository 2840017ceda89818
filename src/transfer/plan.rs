// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Transfer planning
//!
//! The plan is a pure function of the settings and the day bucket, so the
//! same inventory always yields the same command sequence.

use crate::config::Settings;
use crate::inventory::{DayBucket, DayKey};

use super::command::SessionCommand;

/// Commands for one day's upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub day: DayKey,
    pub files: usize,
    pub remote_dir: String,
    /// One `mkdir` per path level, outermost first
    pub mkdirs: Vec<SessionCommand>,
    pub mirror: SessionCommand,
}

impl DayPlan {
    /// All commands for the day, in execution order.
    pub fn commands(&self) -> impl Iterator<Item = &SessionCommand> {
        self.mkdirs.iter().chain(std::iter::once(&self.mirror))
    }
}

/// The complete ordered plan for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Protocol setup and login, sent when the session opens
    pub setup: Vec<SessionCommand>,
    /// Per-day work in ascending day order
    pub days: Vec<DayPlan>,
}

impl TransferPlan {
    /// Build the plan for every day in the bucket.
    pub fn build(settings: &Settings, bucket: &DayBucket) -> Self {
        let days = bucket
            .iter()
            .map(|(day, files)| {
                let levels = day.remote_levels(&settings.remote_dest_path);
                let remote_dir = levels[2].clone();
                DayPlan {
                    day: *day,
                    files: files.len(),
                    mkdirs: levels
                        .into_iter()
                        .map(|path| SessionCommand::Mkdir { path })
                        .collect(),
                    mirror: SessionCommand::Mirror {
                        local_dir: settings.local_source_path.clone(),
                        remote_dir: remote_dir.clone(),
                        include_names: files.iter().map(|r| r.name.clone()).collect(),
                    },
                    remote_dir,
                }
            })
            .collect();

        Self {
            setup: Self::setup_commands(settings),
            days,
        }
    }

    /// Session setup: enforce TLS, passive mode, no retries, then log in.
    pub fn setup_commands(settings: &Settings) -> Vec<SessionCommand> {
        vec![
            SessionCommand::set("ftp:ssl-force", true),
            SessionCommand::set("ftp:ssl-protect-data", true),
            SessionCommand::set("ftp:ssl-protect-list", true),
            SessionCommand::set("ftp:passive-mode", true),
            SessionCommand::set("ssl:verify-certificate", settings.verify_certificate),
            SessionCommand::set("net:max-retries", 1),
            SessionCommand::Open {
                host: settings.remote_ftp_hostname.clone(),
            },
            SessionCommand::Login {
                user: settings.ftp_user_name.clone(),
            },
            SessionCommand::Probe,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days covered, in plan order.
    pub fn day_keys(&self) -> Vec<DayKey> {
        self.days.iter().map(|d| d.day).collect()
    }

    /// Every day command in execution order (setup excluded).
    pub fn day_commands(&self) -> impl Iterator<Item = &SessionCommand> {
        self.days.iter().flat_map(DayPlan::commands)
    }
}
