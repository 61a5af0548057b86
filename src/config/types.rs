// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections other than `[paths]`.
//!
//! ```text
//! [global]  verbose, dry, output_log_level, file_log_level, log_file
//! [tools]   hg, rsync
//! [status]  include_removed, include_deleted
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::process::runner::RunOptions;
use crate::hg::StatusFilter;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Verbose tool output and debug console logging.
    pub verbose: bool,
    /// Report what would be backed up without writing anything.
    pub dry: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

impl GlobalConfig {
    /// Switches handed to the hg and rsync wrappers.
    #[must_use]
    pub const fn run_options(&self) -> RunOptions {
        RunOptions::new(self.verbose, self.dry)
    }
}

/// External executables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Mercurial executable.
    pub hg: PathBuf,
    /// rsync executable.
    pub rsync: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            hg: PathBuf::from("hg"),
            rsync: PathBuf::from("rsync"),
        }
    }
}

/// Which extra change kinds count as uncommitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// Include files scheduled for removal.
    pub include_removed: bool,
    /// Include tracked files missing from disk.
    pub include_deleted: bool,
}

impl StatusConfig {
    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        StatusFilter {
            include_removed: self.include_removed,
            include_deleted: self.include_deleted,
        }
    }
}
