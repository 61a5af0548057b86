// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands and config assembly from CLI options.

use crate::cli::global::{GlobalOptions, Override};
use crate::config::loader::ConfigLoader;
use crate::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;

/// Assembles the loader for the given options.
///
/// Order: `srcbackup.toml` (unless disabled), each `--config`, environment,
/// then command-line overrides.
///
/// # Errors
///
/// Returns an error if a command-line override is malformed.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for entry in global.to_config_overrides()? {
        loader = match entry {
            Override::Bool(key, value) => loader.set(&key, value)?,
            Override::Int(key, value) => loader.set(&key, value)?,
            Override::Text(key, value) => loader.set(&key, value)?,
        };
    }
    Ok(loader)
}

/// Loads the effective configuration for the given options.
///
/// # Errors
///
/// Returns an error if any source is missing, malformed or does not match the
/// `Config` structure.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_config_files_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
