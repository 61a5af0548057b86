// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Idempotent diff and bundle capture.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{BackupResult, FsError};
use crate::hg::Mercurial;
use crate::utility::fs::{ensure_parent, path_exists};

/// What a capture call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The artifact was written.
    Written(PathBuf),
    /// Something already exists at the path; nothing was done.
    AlreadyExists(PathBuf),
    /// Dry run: the artifact would have been written here.
    Planned(PathBuf),
}

impl CaptureOutcome {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::AlreadyExists(path) | Self::Planned(path) => path,
        }
    }
}

/// Writes the uncommitted diff of `repo` into `dest` unless `dest` exists.
///
/// `dest` is created before hg runs. A failed diff therefore leaves the file
/// behind and the next run skips it.
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be created or
/// `hg diff` fails.
pub async fn capture_uncommitted_diff(
    hg: &Mercurial,
    repo: &Path,
    dest: &Path,
) -> BackupResult<CaptureOutcome> {
    if let Some(outcome) = precheck(hg, dest).await {
        return Ok(outcome);
    }

    ensure_parent(dest).await?;
    create_marker(dest).await?;

    hg.diff_to(repo, dest).await?;
    Ok(CaptureOutcome::Written(dest.to_path_buf()))
}

/// Writes a bundle of unpushed history into `dest` unless `dest` exists.
///
/// hg removes a partial bundle when it aborts, so the empty marker is put
/// back after a failure. Either way `hg bundle` runs at most once per `dest`.
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be created or
/// `hg bundle` fails.
pub async fn capture_unpushed_bundle(
    hg: &Mercurial,
    repo: &Path,
    dest: &Path,
) -> BackupResult<CaptureOutcome> {
    if let Some(outcome) = precheck(hg, dest).await {
        return Ok(outcome);
    }

    ensure_parent(dest).await?;
    create_marker(dest).await?;

    if let Err(e) = hg.bundle_to(repo, dest).await {
        if !path_exists(dest).await
            && let Err(marker) = create_marker(dest).await
        {
            warn!(path = %dest.display(), error = %marker, "could not restore bundle marker");
        }
        return Err(e);
    }
    Ok(CaptureOutcome::Written(dest.to_path_buf()))
}

/// Creates an empty file at `dest`, truncating anything already there.
async fn create_marker(dest: &Path) -> BackupResult<()> {
    tokio::fs::File::create(dest)
        .await
        .map_err(|source| FsError::IoError {
            path: dest.display().to_string(),
            source,
        })?;
    Ok(())
}

async fn precheck(hg: &Mercurial, dest: &Path) -> Option<CaptureOutcome> {
    if path_exists(dest).await {
        debug!(path = %dest.display(), "already captured");
        return Some(CaptureOutcome::AlreadyExists(dest.to_path_buf()));
    }
    if hg.options().dry_run {
        info!(path = %dest.display(), "dry run, not writing");
        return Some(CaptureOutcome::Planned(dest.to_path_buf()));
    }
    None
}
