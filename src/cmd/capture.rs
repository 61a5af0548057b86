// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-stage commands: `bundle`, `diff`, `mirror`.
//!
//! ```text
//! bundle  outgoing --> none? skip : capture_unpushed_bundle(unpushedCommits/bundle_..hg)
//! diff    identify --> clean? skip : capture_uncommitted_diff(uncommittedDiffs/.._id.patch)
//! mirror  [FILES] or status --> Mirror::mirror(repository, files, uncommittedFiles/)
//! ```
//!
//! The `capture_*` / `mirror_*` helpers are shared with the full `run` pass.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::BackupContext;
use crate::artifact::{
    CaptureOutcome, bundle_file_name, capture_uncommitted_diff, capture_unpushed_bundle,
    diff_file_name,
};
use crate::cli::backup::{CaptureArgs, MirrorArgs};
use crate::error::Result;
use crate::mirror::MirrorOutcome;

/// Why a capture had nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// `hg outgoing` found nothing (or no upstream).
    NothingOutgoing,
    /// `hg identify` returned nothing.
    NoRevision,
    /// The working copy has no uncommitted changes.
    CleanWorkingCopy,
}

impl Skip {
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::NothingOutgoing => "nothing outgoing",
            Self::NoRevision => "no current revision",
            Self::CleanWorkingCopy => "working copy is clean",
        }
    }
}

/// Bundles the newest unpushed commit.
///
/// The bundle goes to `output` when given, otherwise into the unpushed
/// commits directory under its default name.
///
/// # Errors
///
/// Returns an error if the target path cannot be derived or the capture fails.
pub async fn capture_bundle(
    ctx: &BackupContext,
    output: Option<&Path>,
) -> Result<std::result::Result<CaptureOutcome, Skip>> {
    let Some(record) = ctx.hg().newest_unpushed_commit(ctx.repository()).await else {
        return Ok(Err(Skip::NothingOutgoing));
    };

    let dest = match output {
        Some(path) => path.to_path_buf(),
        None => ctx
            .paths()
            .unpushed_commits_dir()?
            .join(bundle_file_name(&record)),
    };
    let outcome = capture_unpushed_bundle(ctx.hg(), ctx.repository(), &dest).await?;
    Ok(Ok(outcome))
}

/// Captures the uncommitted diff on top of the current revision.
///
/// `now` names the file when `output` is absent.
///
/// # Errors
///
/// Returns an error if the target path cannot be derived or the capture fails.
pub async fn capture_diff(
    ctx: &BackupContext,
    output: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<std::result::Result<CaptureOutcome, Skip>> {
    let Some(revision) = ctx.hg().current_revision(ctx.repository()).await else {
        return Ok(Err(Skip::NoRevision));
    };
    if !revision.dirty {
        return Ok(Err(Skip::CleanWorkingCopy));
    }

    let dest = match output {
        Some(path) => path.to_path_buf(),
        None => ctx
            .paths()
            .uncommitted_diffs_dir()?
            .join(diff_file_name(&revision.id, now)),
    };
    let outcome = capture_uncommitted_diff(ctx.hg(), ctx.repository(), &dest).await?;
    Ok(Ok(outcome))
}

/// Mirrors `files`, or the current uncommitted files when `files` is `None`.
///
/// # Errors
///
/// Returns an error if `hg status` or rsync fails.
pub async fn mirror_files(ctx: &BackupContext, files: Option<Vec<String>>) -> Result<MirrorOutcome> {
    let files = match files {
        Some(files) => files,
        None => {
            ctx.hg()
                .list_uncommitted_files(ctx.repository(), ctx.status_filter())
                .await?
        }
    };
    let destination = ctx.paths().uncommitted_files_dir()?;
    Ok(ctx
        .mirror()
        .mirror(ctx.repository(), &files, &destination)
        .await?)
}

fn report(outcome: &CaptureOutcome) {
    match outcome {
        CaptureOutcome::Written(path) => info!(path = %path.display(), "captured"),
        CaptureOutcome::AlreadyExists(path) => {
            info!(path = %path.display(), "already captured, skipping");
        }
        CaptureOutcome::Planned(path) => info!(path = %path.display(), "would capture"),
    }
}

/// Bundles unpushed history.
///
/// # Errors
///
/// Returns an error if the bundle cannot be written.
pub async fn run_bundle_command(args: &CaptureArgs, ctx: &BackupContext) -> Result<()> {
    match capture_bundle(ctx, args.output.as_deref()).await? {
        Ok(outcome) => report(&outcome),
        Err(skip) => info!("no bundle written: {}", skip.reason()),
    }
    Ok(())
}

/// Captures the uncommitted diff.
///
/// # Errors
///
/// Returns an error if the diff cannot be written.
pub async fn run_diff_command(
    args: &CaptureArgs,
    ctx: &BackupContext,
    now: DateTime<Utc>,
) -> Result<()> {
    match capture_diff(ctx, args.output.as_deref(), now).await? {
        Ok(outcome) => report(&outcome),
        Err(skip) => warn!("no diff written: {}", skip.reason()),
    }
    Ok(())
}

/// Mirrors the given files, or the current status list.
///
/// # Errors
///
/// Returns an error if `hg status` or rsync fails.
pub async fn run_mirror_command(args: &MirrorArgs, ctx: &BackupContext) -> Result<()> {
    let files = (!args.files.is_empty()).then(|| args.files.clone());
    if mirror_files(ctx, files).await? == MirrorOutcome::NothingToMirror {
        info!("no uncommitted files, mirror left untouched");
    }
    Ok(())
}
