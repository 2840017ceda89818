// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Progress hooks for the transfer driver

use std::io::Write;

use crate::error::Result;
use crate::inventory::DayKey;

use super::command::SessionCommand;
use super::driver::{DayResult, DayStatus};
use super::plan::DayPlan;

/// Receives transfer progress. Every hook defaults to doing nothing.
pub trait TransferObserver {
    fn on_session_open(&mut self, _host: &str) -> Result<()> {
        Ok(())
    }

    fn on_day_start(&mut self, _day: &DayPlan) -> Result<()> {
        Ok(())
    }

    /// Called for every day command, whether or not it is sent.
    fn on_command(&mut self, _day: &DayKey, _command: &SessionCommand, _dry_run: bool) -> Result<()> {
        Ok(())
    }

    fn on_day_finished(&mut self, _result: &DayResult) -> Result<()> {
        Ok(())
    }

    fn on_session_closed(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct NoopTransferObserver;

impl TransferObserver for NoopTransferObserver {}

/// Prints progress lines to a writer (stdout in the binary)
pub struct ConsoleObserver<W: Write> {
    out: W,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TransferObserver for ConsoleObserver<W> {
    fn on_session_open(&mut self, host: &str) -> Result<()> {
        writeln!(self.out, "Connected to {}", host)?;
        Ok(())
    }

    fn on_day_start(&mut self, day: &DayPlan) -> Result<()> {
        writeln!(
            self.out,
            "Day {}: {} file(s) -> {}",
            day.day, day.files, day.remote_dir
        )?;
        Ok(())
    }

    fn on_command(&mut self, _day: &DayKey, command: &SessionCommand, dry_run: bool) -> Result<()> {
        if dry_run {
            writeln!(self.out, "   [dry-run] {}", command)?;
        } else {
            writeln!(self.out, "   {}", command)?;
        }
        Ok(())
    }

    fn on_day_finished(&mut self, result: &DayResult) -> Result<()> {
        match &result.status {
            DayStatus::Uploaded => writeln!(self.out, "   done")?,
            DayStatus::Planned => {}
            DayStatus::Failed(reason) => writeln!(self.out, "   FAILED: {}", reason)?,
        }
        Ok(())
    }

    fn on_session_closed(&mut self) -> Result<()> {
        writeln!(self.out, "Session closed")?;
        Ok(())
    }
}
