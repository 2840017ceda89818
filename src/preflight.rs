// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Checks run before any work starts

use std::path::{Path, PathBuf};

use crate::error::{Result, UploadError};

/// Resolve the transfer client executable.
///
/// A name containing a path separator is taken as a path; a bare name is
/// searched for on `PATH`.
pub fn locate_program(name: &str) -> Result<PathBuf> {
    locate_program_in(name, std::env::var_os("PATH").as_deref())
}

fn locate_program_in(name: &str, path_var: Option<&std::ffi::OsStr>) -> Result<PathBuf> {
    if name.trim().is_empty() {
        return Err(UploadError::ClientNotFound("(empty name)".to_string()));
    }

    let candidate = Path::new(name);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        if is_executable(candidate) {
            return Ok(candidate.to_path_buf());
        }
        return Err(UploadError::ClientNotFound(format!(
            "{} is not an executable file",
            candidate.display()
        )));
    }

    if let Some(path_var) = path_var {
        for dir in std::env::split_paths(path_var) {
            let full = dir.join(name);
            if is_executable(&full) {
                tracing::debug!(target: "foscam.preflight", program = %full.display(), "Found transfer client");
                return Ok(full);
            }
        }
    }

    Err(UploadError::ClientNotFound(format!(
        "'{}' is not on PATH; install it or set transfer_client in the config",
        name
    )))
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// The source directory must exist, be a directory and be listable.
pub fn check_source_dir(path: &Path) -> Result<()> {
    let source_error = |reason: String| UploadError::SourceDir {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| source_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(source_error("not a directory".to_string()));
    }
    std::fs::read_dir(path).map_err(|e| source_error(e.to_string()))?;
    Ok(())
}
