// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! repository/            working copy being backed up
//! destination/
//!   uncommittedFiles/    mirror of modified and unknown files
//!   uncommittedDiffs/    <iso>_<id>.patch
//!   unpushedCommits/     bundle_<iso>_<id>.hg
//! ```
//!
//! The three backup directories resolve against `destination` when relative
//! or unset.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default mirror directory name.
pub const UNCOMMITTED_FILES_DIR: &str = "uncommittedFiles";
/// Default diff directory name.
pub const UNCOMMITTED_DIFFS_DIR: &str = "uncommittedDiffs";
/// Default bundle directory name.
pub const UNPUSHED_COMMITS_DIR: &str = "unpushedCommits";

/// Source and backup locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Working copy to back up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<PathBuf>,
    /// Backup root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// Mirror target (default: `destination/uncommittedFiles`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncommitted_files: Option<PathBuf>,
    /// Diff directory (default: `destination/uncommittedDiffs`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncommitted_diffs: Option<PathBuf>,
    /// Bundle directory (default: `destination/unpushedCommits`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpushed_commits: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolves the backup directories against `destination`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `destination` is not set.
    pub fn resolve(&mut self) -> Result<()> {
        let destination = self.destination()?.to_path_buf();

        let resolve = |path: &mut Option<PathBuf>, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(destination.join(p.clone()));
            }
            None => {
                *path = Some(destination.join(default));
            }
            _ => {}
        };

        resolve(&mut self.uncommitted_files, UNCOMMITTED_FILES_DIR);
        resolve(&mut self.uncommitted_diffs, UNCOMMITTED_DIFFS_DIR);
        resolve(&mut self.unpushed_commits, UNPUSHED_COMMITS_DIR);

        Ok(())
    }

    /// Get the repository path, returning an error if not set.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `repository` is not set.
    pub fn repository(&self) -> Result<&Path> {
        required(self.repository.as_deref(), "repository")
    }

    /// Get the destination path, returning an error if not set.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `destination` is not set.
    pub fn destination(&self) -> Result<&Path> {
        required(self.destination.as_deref(), "destination")
    }

    /// Mirror target directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if it cannot be derived.
    pub fn uncommitted_files_dir(&self) -> Result<PathBuf> {
        self.backup_dir(self.uncommitted_files.as_deref(), UNCOMMITTED_FILES_DIR)
    }

    /// Diff directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if it cannot be derived.
    pub fn uncommitted_diffs_dir(&self) -> Result<PathBuf> {
        self.backup_dir(self.uncommitted_diffs.as_deref(), UNCOMMITTED_DIFFS_DIR)
    }

    /// Bundle directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if it cannot be derived.
    pub fn unpushed_commits_dir(&self) -> Result<PathBuf> {
        self.backup_dir(self.unpushed_commits.as_deref(), UNPUSHED_COMMITS_DIR)
    }

    fn backup_dir(&self, configured: Option<&Path>, default: &str) -> Result<PathBuf> {
        match configured {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => Ok(self.destination()?.join(path)),
            None => Ok(self.destination()?.join(default)),
        }
    }
}

fn required<'a>(value: Option<&'a Path>, key: &str) -> Result<&'a Path> {
    value.ok_or_else(|| {
        ConfigError::MissingKey {
            section: "paths".to_string(),
            key: key.to_string(),
        }
        .into()
    })
}
