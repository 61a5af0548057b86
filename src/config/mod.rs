// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for srcbackup.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. srcbackup.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. SRCBACKUP_* env vars
//! 5. CLI overrides (-r, -d, --dry, -v)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SRCBACKUP_GLOBAL__DRY=true                → global.dry = true
//! SRCBACKUP_PATHS__REPOSITORY=/src/repo     → paths.repository = "/src/repo"
//! SRCBACKUP_STATUS__INCLUDE_REMOVED=true    → status.include_removed = true
//! ```
//!
//! # Example
//!
//! ```toml
//! [paths]
//! repository = "/home/me/src/project"
//! destination = "/mnt/backup/project"
//!
//! [status]
//! include_deleted = true
//! ```

pub mod loader;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{GlobalConfig, StatusConfig, ToolsConfig};

/// File name of the per-directory configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "srcbackup.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SRCBACKUP";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Source and backup locations.
    pub paths: PathsConfig,
    /// External executables.
    pub tools: ToolsConfig,
    /// `hg status` selection.
    pub status: StatusConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use srcbackup::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("srcbackup.toml")
    ///     .with_env_prefix("SRCBACKUP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.paths.destination.is_some() {
            self.paths.resolve()?;
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`; unset paths show
    /// as empty values.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_tools_options(&mut options);
        self.format_status_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.verbose".into(), self.global.verbose.to_string());
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), fmt_path(self.global.log_file.as_deref()));
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("paths.repository".into(), fmt_path(self.paths.repository.as_deref()));
        options.insert(
            "paths.destination".into(),
            fmt_path(self.paths.destination.as_deref()),
        );
        options.insert(
            "paths.uncommitted_files".into(),
            fmt_path(self.paths.uncommitted_files.as_deref()),
        );
        options.insert(
            "paths.uncommitted_diffs".into(),
            fmt_path(self.paths.uncommitted_diffs.as_deref()),
        );
        options.insert(
            "paths.unpushed_commits".into(),
            fmt_path(self.paths.unpushed_commits.as_deref()),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.hg".into(), self.tools.hg.display().to_string());
        options.insert("tools.rsync".into(), self.tools.rsync.display().to_string());
    }

    fn format_status_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "status.include_removed".into(),
            self.status.include_removed.to_string(),
        );
        options.insert(
            "status.include_deleted".into(),
            self.status.include_deleted.to_string(),
        );
    }
}

fn fmt_path(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}
