// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   run                         run::run_backup_command
//!   status, identify, outgoing  query
//!   diff, bundle, mirror        capture
//!   options, config-files       config
//!
//! BackupContext { hg, mirror, repository, paths, status }
//!   built from Config + CommandRunner
//! ```

pub mod capture;
pub mod config;
pub mod query;
pub mod run;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::config::paths::PathsConfig;
use crate::core::process::runner::{CommandRunner, SystemRunner};
use crate::error::Result;
use crate::hg::{Mercurial, StatusFilter};
use crate::mirror::Mirror;

/// Everything a command needs to talk to hg and rsync.
#[derive(Debug)]
pub struct BackupContext {
    hg: Mercurial,
    mirror: Mirror,
    repository: PathBuf,
    paths: PathsConfig,
    status: StatusFilter,
}

impl BackupContext {
    /// Builds the context from `config`, running tools through `runner`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `paths.repository` is not set.
    pub fn new(config: &Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let repository = config.paths.repository()?.to_path_buf();
        let options = config.global.run_options();

        Ok(Self {
            hg: Mercurial::new(runner.clone(), &config.tools.hg, options),
            mirror: Mirror::new(runner, &config.tools.rsync, options),
            repository,
            paths: config.paths.clone(),
            status: config.status.filter(),
        })
    }

    /// Builds the context with a runner that spawns real processes.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `paths.repository` is not set.
    pub fn system(config: &Config) -> Result<Self> {
        Self::new(config, Arc::new(SystemRunner))
    }

    #[must_use]
    pub const fn hg(&self) -> &Mercurial {
        &self.hg
    }

    #[must_use]
    pub const fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    #[must_use]
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    #[must_use]
    pub const fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    #[must_use]
    pub const fn status_filter(&self) -> StatusFilter {
        self.status
    }
}
