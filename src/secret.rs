// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Password handling
//!
//! The FTP password is asked for once per run, with echo suppressed, and
//! only ever held in memory.

use std::fmt;
use std::io::Write;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::{Result, UploadError};

/// A password that never prints itself
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Only the transfer backend should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        // Best effort: overwrite the buffer before it is freed.
        let len = self.0.len();
        self.0.clear();
        self.0.extend(std::iter::repeat('\0').take(len));
    }
}

/// Capability for obtaining the password interactively
#[cfg_attr(test, mockall::automock)]
pub trait SecretPrompt {
    /// Ask for a secret, showing `label` as the prompt.
    fn prompt_secret(&self, label: &str) -> Result<Secret>;
}

/// Prompts on the controlling terminal with echo disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

/// Restores cooked mode when dropped, even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().map_err(|e| UploadError::Secret(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// What a single key press does to the line being typed
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Push(char),
    Pop,
    Submit,
    Cancel,
    Ignore,
}

fn classify_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Cancel
        }
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::Pop,
        KeyCode::Char(c) => KeyAction::Push(c),
        _ => KeyAction::Ignore,
    }
}

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&self, label: &str) -> Result<Secret> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", label)?;
        stderr.flush()?;

        let mut value = String::new();
        {
            let guard = RawModeGuard::enable()?;
            loop {
                let Event::Key(key) =
                    event::read().map_err(|e| UploadError::Secret(e.to_string()))?
                else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match classify_key(key.code, key.modifiers) {
                    KeyAction::Push(c) => value.push(c),
                    KeyAction::Pop => {
                        value.pop();
                    }
                    KeyAction::Submit => break,
                    KeyAction::Cancel => {
                        drop(guard);
                        writeln!(stderr)?;
                        return Err(UploadError::Secret("cancelled".to_string()));
                    }
                    KeyAction::Ignore => {}
                }
            }
        }
        writeln!(stderr)?;

        let secret = Secret::new(value);
        if secret.is_empty() {
            return Err(UploadError::Secret("empty password".to_string()));
        }
        Ok(secret)
    }
}
