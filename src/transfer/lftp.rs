// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! lftp-backed control session
//!
//! One `lftp` process is spawned per run and fed commands on stdin. Every
//! command line is suffixed with `&& echo <ok> || echo <fail>` so the
//! reader can tell where one command's output ends and whether it worked.
//!
//! On unix the child's stdout and stderr share one pipe. Error text is
//! written before the failure marker, so it always lands in the output of
//! the command that produced it.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, Command};

use crate::config::Settings;
use crate::error::{Result, SessionError};
use crate::secret::Secret;

use super::command::SessionCommand;
use super::session::{CommandOutcome, TransferClient, TransferSession};

/// How long `bye` may take before the process is killed
const CLOSE_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything the client prints, in the order it printed it
type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// Starts `lftp` sessions
#[derive(Debug, Clone)]
pub struct LftpClient {
    program: PathBuf,
}

impl LftpClient {
    /// Use the given (already resolved) lftp executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Send the child's stdout and stderr into one pipe and return its read end.
#[cfg(unix)]
fn merge_output(command: &mut Command) -> Result<Option<OutputStream>> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = std::io::pipe()?;
    command.stdout(writer.try_clone()?).stderr(writer);
    let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok(Some(Box::new(receiver)))
}

/// Without a shared pipe, stderr goes straight to the terminal.
#[cfg(not(unix))]
fn merge_output(command: &mut Command) -> Result<Option<OutputStream>> {
    command.stdout(Stdio::piped()).stderr(Stdio::inherit());
    Ok(None)
}

#[async_trait]
impl TransferClient for LftpClient {
    fn name(&self) -> &str {
        "lftp"
    }

    async fn start(&self, _settings: &Settings, secret: &Secret) -> Result<Box<dyn TransferSession>> {
        let mut command = Command::new(&self.program);
        command.stdin(Stdio::piped()).kill_on_drop(true);
        let merged = merge_output(&mut command)
            .map_err(|e| SessionError::Spawn(format!("output pipe: {}", e)))?;

        let spawned = command.spawn();
        // The command holds our copies of the pipe's write end; EOF only
        // arrives once they are gone.
        drop(command);
        let mut child = spawned
            .map_err(|e| SessionError::Spawn(format!("{}: {}", self.program.display(), e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::Spawn("stdin not captured".to_string()))?;
        let output: OutputStream = match merged {
            Some(stream) => stream,
            None => Box::new(
                child
                    .stdout
                    .take()
                    .ok_or_else(|| SessionError::Spawn("stdout not captured".to_string()))?,
            ),
        };

        tracing::debug!(
            target: "foscam.transfer.lftp",
            program = %self.program.display(),
            pid = child.id(),
            "Started transfer client"
        );

        Ok(Box::new(LftpSession {
            child,
            stdin: Some(stdin),
            output: BufReader::new(output).lines(),
            secret: secret.clone(),
            sequence: 0,
        }))
    }
}

/// A running lftp process
pub struct LftpSession {
    child: Child,
    stdin: Option<ChildStdin>,
    output: Lines<BufReader<OutputStream>>,
    secret: Secret,
    sequence: u64,
}

/// Marker pair for command number `seq`.
fn markers(seq: u64) -> (String, String) {
    (
        format!("__foscam_upload_ok_{}__", seq),
        format!("__foscam_upload_fail_{}__", seq),
    )
}

/// The command line plus the success/failure echo suffix.
fn framed_line(line: &str, seq: u64) -> String {
    let (ok, fail) = markers(seq);
    format!("{} && echo {} || echo {}\n", line, ok, fail)
}

impl LftpSession {
    async fn exited(&mut self) -> SessionError {
        let status = self.child.wait().await.ok().and_then(|s| s.code());
        SessionError::ClientExited(status)
    }
}

#[async_trait]
impl TransferSession for LftpSession {
    async fn send(&mut self, command: &SessionCommand) -> Result<CommandOutcome> {
        self.sequence += 1;
        let seq = self.sequence;
        let (ok, fail) = markers(seq);
        let line = framed_line(&command.script_line(&self.secret), seq);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SessionError::Protocol("session already closed".to_string()).into());
        };
        if let Err(e) = stdin.write_all(line.as_bytes()).await {
            tracing::debug!(target: "foscam.transfer.lftp", error = %e, "Write to lftp failed");
            return Err(self.exited().await.into());
        }
        stdin.flush().await?;

        let mut output = Vec::new();
        loop {
            let next = self
                .output
                .next_line()
                .await
                .map_err(|e| SessionError::Protocol(e.to_string()))?;

            let Some(text) = next else {
                return Err(self.exited().await.into());
            };

            let trimmed = text.trim();
            if trimmed == ok || trimmed == fail {
                return Ok(CommandOutcome {
                    success: trimmed == ok,
                    output,
                });
            }

            tracing::debug!(target: "foscam.transfer.lftp", "{}", text);
            output.push(text);
        }
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            // The process may already be gone; wait() below reports that.
            let _ = stdin
                .write_all(SessionCommand::Bye.display().as_bytes())
                .await;
            let _ = stdin.write_all(b"\n").await;
            let _ = stdin.shutdown().await;
        }

        match tokio::time::timeout(CLOSE_TIMEOUT, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(target: "foscam.transfer.lftp", status = ?status.code(), "Transfer client exited");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                tracing::warn!(target: "foscam.transfer.lftp", "Transfer client did not exit; killing it");
                self.child.kill().await?;
                Ok(())
            }
        }
    }
}
