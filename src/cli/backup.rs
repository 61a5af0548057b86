// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the backup and query commands.

use clap::Args;
use std::path::PathBuf;

use crate::hg::StatusFilter;

/// Arguments for `status`.
#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    /// Also list files scheduled for removal.
    #[arg(long)]
    pub removed: bool,

    /// Also list tracked files missing from disk.
    #[arg(long)]
    pub deleted: bool,

    /// Print JSON instead of one path per line.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Combines the flags with the configured `[status]` selection.
    #[must_use]
    pub const fn filter(&self, configured: StatusFilter) -> StatusFilter {
        StatusFilter {
            include_removed: self.removed || configured.include_removed,
            include_deleted: self.deleted || configured.include_deleted,
        }
    }
}

/// Arguments for `identify` and `outgoing`.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Print JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `diff` and `bundle`.
#[derive(Debug, Clone, Default, Args)]
pub struct CaptureArgs {
    /// Write to this file instead of the default backup location.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for `mirror`.
#[derive(Debug, Clone, Default, Args)]
pub struct MirrorArgs {
    /// Files relative to the repository. Defaults to the uncommitted files.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}
