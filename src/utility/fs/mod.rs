// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem helpers for backup destinations.
//!
//! ```text
//! ensure_dir()   recursive create, mode 0777 (before umask) on unix
//! path_exists()  async existence probe
//! ```

use std::path::Path;
use tokio::fs;

use crate::error::{BackupResult, FsError};

/// Directory mode requested for created backup directories.
pub const DIR_MODE: u32 = 0o777;

/// Creates `dir` and all missing parents.
///
/// Existing directories are left untouched.
///
/// # Errors
///
/// Returns `FsError::CreateDir` if any component cannot be created.
pub async fn ensure_dir(dir: &Path) -> BackupResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    builder
        .create(dir)
        .await
        .map_err(|source| FsError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
    Ok(())
}

/// Creates the parent directory of `file`, if it has one.
///
/// # Errors
///
/// Returns `FsError::CreateDir` if the parent cannot be created.
pub async fn ensure_parent(file: &Path) -> BackupResult<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).await,
        _ => Ok(()),
    }
}

/// Returns whether anything exists at `path`.
///
/// Errors while probing count as "does not exist".
pub async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}
