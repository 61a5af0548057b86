// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The full backup pass.
//!
//! ```text
//! run_backup
//!   1. bundle  outgoing --> unpushedCommits/bundle_<ts>_<id>.hg
//!   2. diff    identify --> uncommittedDiffs/<now>_<id>.patch   (dirty only)
//!   3. mirror  status   --> uncommittedFiles/                   (rsync)
//!
//! Every stage runs even if an earlier one failed.
//! RunReport collects one StageOutcome per stage.
//! ```

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::BackupContext;
use super::capture::{Skip, capture_bundle, capture_diff, mirror_files};
use crate::artifact::CaptureOutcome;
use crate::error::Result;
use crate::mirror::MirrorOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Bundle,
    Diff,
    Mirror,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bundle => "bundle",
            Self::Diff => "diff",
            Self::Mirror => "mirror",
        })
    }
}

/// What one stage of the pass ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Captured { path: PathBuf },
    AlreadyCaptured { path: PathBuf },
    Planned { path: PathBuf },
    Mirrored { files: usize },
    NothingToDo { reason: String },
    Failed { error: String },
}

impl StageOutcome {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn from_capture(outcome: CaptureOutcome) -> Self {
        match outcome {
            CaptureOutcome::Written(path) => Self::Captured { path },
            CaptureOutcome::AlreadyExists(path) => Self::AlreadyCaptured { path },
            CaptureOutcome::Planned(path) => Self::Planned { path },
        }
    }

    fn from_skip(skip: Skip) -> Self {
        Self::NothingToDo {
            reason: skip.reason().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub stages: Vec<(Stage, StageOutcome)>,
}

impl RunReport {
    #[must_use]
    pub fn success(&self) -> bool {
        !self.stages.iter().any(|(_, outcome)| outcome.is_failure())
    }

    #[must_use]
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| outcome)
    }

    #[must_use]
    pub fn failed_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(stage, _)| *stage)
            .collect()
    }

    fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        match &outcome {
            StageOutcome::Failed { error } => error!("{stage} failed: {error}"),
            StageOutcome::NothingToDo { reason } => info!(%stage, "skipped: {reason}"),
            other => info!(%stage, outcome = ?other, "done"),
        }
        self.stages.push((stage, outcome));
    }
}

fn failed(err: &anyhow::Error) -> StageOutcome {
    StageOutcome::Failed {
        error: format!("{err:#}"),
    }
}

fn captured(result: Result<std::result::Result<CaptureOutcome, Skip>>) -> StageOutcome {
    match result {
        Ok(Ok(outcome)) => StageOutcome::from_capture(outcome),
        Ok(Err(skip)) => StageOutcome::from_skip(skip),
        Err(err) => failed(&err),
    }
}

/// Runs bundle, diff and mirror in order; `now` names the diff.
pub async fn run_backup(ctx: &BackupContext, now: DateTime<Utc>) -> RunReport {
    let mut report = RunReport::default();

    let bundle = captured(capture_bundle(ctx, None).await);
    report.record(Stage::Bundle, bundle);

    let diff = captured(capture_diff(ctx, None, now).await);
    report.record(Stage::Diff, diff);

    let mirror = match mirror_files(ctx, None).await {
        Ok(MirrorOutcome::Mirrored { files }) => StageOutcome::Mirrored { files },
        Ok(MirrorOutcome::NothingToMirror) => StageOutcome::NothingToDo {
            reason: "no uncommitted files".to_string(),
        },
        Err(err) => failed(&err),
    };
    report.record(Stage::Mirror, mirror);

    report
}

/// Runs the full pass against the current time.
///
/// # Errors
///
/// Returns an error naming the failed stages if any stage failed.
pub async fn run_backup_command(ctx: &BackupContext) -> Result<()> {
    let report = run_backup(ctx, Utc::now()).await;
    if report.success() {
        return Ok(());
    }
    let names: Vec<String> = report
        .failed_stages()
        .iter()
        .map(ToString::to_string)
        .collect();
    anyhow::bail!("backup incomplete, failed stages: {}", names.join(", "))
}
