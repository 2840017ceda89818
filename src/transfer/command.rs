// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Commands sent over the control session
//!
//! Each command has two renderings: [`SessionCommand::display`] is safe to
//! log and print, [`SessionCommand::script_line`] is what the transfer
//! client actually receives and may contain the password.

use std::fmt;
use std::path::PathBuf;

use crate::secret::Secret;

const REDACTED: &str = "********";

/// A single line-oriented transfer-client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// `set <name> <value>`
    Set { name: String, value: String },
    /// `open <host>` (lazy; nothing is sent on the wire yet)
    Open { host: String },
    /// `user <name> <password>`
    Login { user: String },
    /// Forces the connection and login to happen
    Probe,
    /// `mkdir -f <path>`; an existing directory is not an error for us
    Mkdir { path: String },
    /// One-way local-to-remote mirror restricted to one day's files.
    ///
    /// Each name becomes its own `--include-glob`, so only files the
    /// scanner accepted as recordings are ever sent.
    Mirror {
        local_dir: PathBuf,
        remote_dir: String,
        include_names: Vec<String>,
    },
    /// Ends the session
    Bye,
}

impl SessionCommand {
    pub fn set(name: &str, value: impl ToString) -> Self {
        SessionCommand::Set {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether the command changes anything on the remote side.
    ///
    /// Dry runs skip every mutating command.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            SessionCommand::Mkdir { .. } | SessionCommand::Mirror { .. }
        )
    }

    /// Loggable form with the password masked.
    pub fn display(&self) -> String {
        self.render(REDACTED)
    }

    /// Wire form sent to the transfer client.
    pub fn script_line(&self, secret: &Secret) -> String {
        self.render(secret.expose())
    }

    fn render(&self, password: &str) -> String {
        match self {
            SessionCommand::Set { name, value } => format!("set {} {}", name, value),
            SessionCommand::Open { host } => format!("open {}", quote(host)),
            SessionCommand::Login { user } => {
                format!("user {} {}", quote(user), quote(password))
            }
            SessionCommand::Probe => "ls".to_string(),
            SessionCommand::Mkdir { path } => format!("mkdir -f {}", quote(path)),
            SessionCommand::Mirror {
                local_dir,
                remote_dir,
                include_names,
            } => {
                let mut line = String::from("mirror --reverse --no-recursion --verbose");
                for name in include_names {
                    line.push_str(" --include-glob ");
                    line.push_str(&quote(&escape_glob(name)));
                }
                format!(
                    "{} {} {}",
                    line,
                    quote(&local_dir.to_string_lossy()),
                    quote(remote_dir)
                )
            }
            SessionCommand::Bye => "bye".to_string(),
        }
    }
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Double-quote an argument for the lftp command parser.
fn quote(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Make a literal file name safe to use as an lftp glob.
fn escape_glob(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
