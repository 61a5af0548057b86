// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE         ← Additional config files (can repeat)
//! --repository DIR      ← paths.repository override
//! --destination DIR     ← paths.destination override
//! --dry                 ← No writes, rsync --dry-run
//! --verbose             ← Verbose hg/rsync, debug console log
//! --log-level N         ← Console verbosity (0-6)
//! --file-log-level N    ← File verbosity
//! --set KEY=VAL         ← Direct config override
//!
//! Precedence: CLI flags > --set > env > --config > srcbackup.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Disables loading `srcbackup.toml` from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Working copy to back up.
    #[arg(short = 'r', long = "repository", value_name = "DIR")]
    pub repository: Option<PathBuf>,

    /// Backup root (will contain uncommittedFiles/, uncommittedDiffs/, unpushedCommits/).
    #[arg(short = 'd', long = "destination", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Shows what would be backed up without writing anything.
    #[arg(long)]
    pub dry: bool,

    /// Verbose hg and rsync output; raises the console log level to debug.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'tools.hg=/opt/hg/bin/hg'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,
}

/// A single configuration override from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    Bool(String, bool),
    Int(String, i64),
    Text(String, String),
}

impl Override {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Bool(key, _) | Self::Int(key, _) | Self::Text(key, _) => key,
        }
    }
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    ///
    /// `--set` entries come first so dedicated flags win over them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a `--set` entry without `=`.
    pub fn to_config_overrides(&self) -> Result<Vec<Override>> {
        let mut overrides = Vec::new();

        for option in &self.options {
            let (key, value) = option
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidValue {
                    section: "cli".to_string(),
                    key: "set".to_string(),
                    message: format!("expected KEY=VALUE, got '{option}'"),
                })?;
            overrides.push(Override::Text(
                key.trim().replace('/', "."),
                value.trim().to_string(),
            ));
        }

        if let Some(level) = self.log_level {
            overrides.push(Override::Int(
                "global.output_log_level".into(),
                i64::from(level),
            ));
        }

        if let Some(level) = self.file_log_level {
            overrides.push(Override::Int(
                "global.file_log_level".into(),
                i64::from(level),
            ));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(Override::Text(
                "global.log_file".into(),
                path.display().to_string(),
            ));
        }

        if self.dry {
            overrides.push(Override::Bool("global.dry".into(), true));
        }

        if self.verbose {
            overrides.push(Override::Bool("global.verbose".into(), true));
        }

        if let Some(ref repository) = self.repository {
            overrides.push(Override::Text(
                "paths.repository".into(),
                repository.display().to_string(),
            ));
        }

        if let Some(ref destination) = self.destination {
            overrides.push(Override::Text(
                "paths.destination".into(),
                destination.display().to_string(),
            ));
        }

        Ok(overrides)
    }
}
