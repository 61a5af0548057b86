// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> load_config --> Logging --> Command Dispatch
//!   Run (default) | Status | Identify | Outgoing | Diff | Bundle | Mirror
//!   Options | ConfigFiles | Version
//! ```

use std::process::ExitCode;

use chrono::Utc;
use srcbackup::cli::global::GlobalOptions;
use srcbackup::cli::{self, Command};
use srcbackup::cmd::BackupContext;
use srcbackup::cmd::capture::{run_bundle_command, run_diff_command, run_mirror_command};
use srcbackup::cmd::config::{
    build_config_loader, load_config, run_config_files_command, run_options_command,
};
use srcbackup::cmd::query::{run_identify_command, run_outgoing_command, run_status_command};
use srcbackup::cmd::run::run_backup_command;
use srcbackup::config::Config;
use srcbackup::error::Result;
use srcbackup::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let config = load_config(&cli.global);

    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logging follows the loaded config; the raw CLI values are the fallback
/// when the config itself could not be loaded.
fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    if let Some(config) = config {
        let settings = &config.global;
        return LogConfig::builder()
            .with_console_level(settings.output_log_level.with_verbosity(settings.verbose))
            .with_file_level(settings.file_log_level)
            .maybe_with_log_file(settings.log_file.clone())
            .build();
    }

    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO)
        .with_verbosity(global.verbose);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::TRACE);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.clone())
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: Result<Config>) -> Result<()> {
    match cli.command.as_ref().unwrap_or(&Command::Run) {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::ConfigFiles => {
            let loader = build_config_loader(&cli.global)?;
            run_config_files_command(&loader.format_loaded_files());
            Ok(())
        }
        Command::Options => {
            run_options_command(&config?);
            Ok(())
        }
        command => {
            let ctx = BackupContext::system(&config?)?;
            match command {
                Command::Status(args) => run_status_command(args, &ctx).await,
                Command::Identify(args) => run_identify_command(args, &ctx).await,
                Command::Outgoing(args) => run_outgoing_command(args, &ctx).await,
                Command::Diff(args) => run_diff_command(args, &ctx, Utc::now()).await,
                Command::Bundle(args) => run_bundle_command(args, &ctx).await,
                Command::Mirror(args) => run_mirror_command(args, &ctx).await,
                _ => run_backup_command(&ctx).await,
            }
        }
    }
}
