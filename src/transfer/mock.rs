// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock transfer client for testing
//!
//! Records every command a session receives (in its redacted display form)
//! and can be told to fail the login or individual days' mirrors.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::{Result, SessionError};
use crate::inventory::RECORDING_PREFIX;
use crate::secret::Secret;

use super::command::SessionCommand;
use super::session::{CommandOutcome, TransferClient, TransferSession};

/// A mock transfer client
#[derive(Clone, Default)]
pub struct MockTransferClient {
    /// Commands received, in order, across all sessions
    log: Arc<Mutex<Vec<String>>>,
    /// Sessions started
    started: Arc<AtomicUsize>,
    /// Sessions closed
    closed: Arc<AtomicUsize>,
    fail_start: bool,
    fail_login: bool,
    /// Name prefixes (`MDalarm_YYYYMMDD_`) whose mirror fails
    fail_mirror_days: HashSet<String>,
    fail_mkdir: bool,
}

impl MockTransferClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `start` fail as if the client could not be spawned.
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Make the login probe fail (bad password, unreachable host).
    pub fn failing_login(mut self) -> Self {
        self.fail_login = true;
        self
    }

    /// Make the mirror for `day_key` (`YYYYMMDD`) fail.
    pub fn failing_day(mut self, day_key: &str) -> Self {
        self.fail_mirror_days
            .insert(format!("{}{}_", RECORDING_PREFIX, day_key));
        self
    }

    /// Make every mkdir report failure (as for "already exists").
    pub fn failing_mkdir(mut self) -> Self {
        self.fail_mkdir = true;
        self
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn sessions_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn fails_mirror(&self, include_names: &[String]) -> bool {
        include_names.iter().any(|name| {
            self.fail_mirror_days
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
        })
    }
}

#[async_trait]
impl TransferClient for MockTransferClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self, _settings: &Settings, _secret: &Secret) -> Result<Box<dyn TransferSession>> {
        if self.fail_start {
            return Err(SessionError::Spawn("mock start failure".to_string()).into());
        }
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            client: self.clone(),
        }))
    }
}

struct MockSession {
    client: MockTransferClient,
}

#[async_trait]
impl TransferSession for MockSession {
    async fn send(&mut self, command: &SessionCommand) -> Result<CommandOutcome> {
        if let Ok(mut log) = self.client.log.lock() {
            log.push(command.display());
        }

        let outcome = match command {
            SessionCommand::Probe if self.client.fail_login => {
                CommandOutcome::failed("Login failed: 530 Login incorrect.")
            }
            SessionCommand::Mkdir { path } if self.client.fail_mkdir => {
                CommandOutcome::failed(format!("mkdir: Access failed: 550 {}: File exists", path))
            }
            SessionCommand::Mirror { include_names, .. }
                if self.client.fails_mirror(include_names) =>
            {
                CommandOutcome::failed("mirror: Fatal error: max-retries exceeded")
            }
            _ => CommandOutcome::ok(),
        };
        Ok(outcome)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        if let Ok(mut log) = self.client.log.lock() {
            log.push(SessionCommand::Bye.display());
        }
        self.client.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
