// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Control-session abstraction
//!
//! A [`TransferClient`] starts a [`TransferSession`]; the session accepts
//! commands one at a time and reports whether each succeeded.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::{Result, SessionError, UploadError};
use crate::secret::Secret;

use super::command::SessionCommand;

/// Upper bound on protocol setup and login
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of one command on the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Output lines the client printed for this command
    pub output: Vec<String>,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            output: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: vec![message.into()],
        }
    }

    /// Last non-empty output line, used as a short failure reason.
    pub fn reason(&self) -> String {
        self.output
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .unwrap_or("command failed")
            .to_string()
    }
}

/// An open control session
#[async_trait]
pub trait TransferSession: Send {
    /// Send one command and wait for it to finish.
    async fn send(&mut self, command: &SessionCommand) -> Result<CommandOutcome>;

    /// End the session. Called exactly once.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Factory for control sessions
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Client name for logs.
    fn name(&self) -> &str;

    /// Start a session process. No command has been sent yet.
    async fn start(&self, settings: &Settings, secret: &Secret) -> Result<Box<dyn TransferSession>>;
}

/// Start a session and run the setup commands, failing unless every one
/// succeeds within [`CONNECT_TIMEOUT`].
pub async fn open_session(
    client: &dyn TransferClient,
    settings: &Settings,
    secret: &Secret,
    setup: &[SessionCommand],
) -> Result<Box<dyn TransferSession>> {
    open_session_with_timeout(client, settings, secret, setup, CONNECT_TIMEOUT).await
}

pub(crate) async fn open_session_with_timeout(
    client: &dyn TransferClient,
    settings: &Settings,
    secret: &Secret,
    setup: &[SessionCommand],
    limit: Duration,
) -> Result<Box<dyn TransferSession>> {
    tracing::debug!(
        target: "foscam.transfer",
        client = client.name(),
        host = %settings.remote_ftp_hostname,
        "Opening control session"
    );

    let mut session = client.start(settings, secret).await?;

    let setup_result = tokio::time::timeout(limit, async {
        for command in setup {
            tracing::debug!(target: "foscam.transfer", command = %command, "Setup");
            let outcome = session.send(command).await?;
            if !outcome.success {
                return Err(UploadError::Session(SessionError::ConnectFailed {
                    host: settings.remote_ftp_hostname.clone(),
                    message: outcome.reason(),
                }));
            }
        }
        Ok(())
    })
    .await;

    let failure = match setup_result {
        Ok(Ok(())) => return Ok(session),
        Ok(Err(e)) => e,
        Err(_) => UploadError::Session(SessionError::ConnectTimeout(limit.as_secs())),
    };

    if let Err(e) = session.close().await {
        tracing::debug!(target: "foscam.transfer", error = %e, "Close after failed setup");
    }
    Err(failure)
}
