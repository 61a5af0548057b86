// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for srcbackup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! srcbackup [global options] [command]
//! run                      (default) bundle, diff, mirror
//! status [--removed] [--deleted] [--json]
//! identify [--json]
//! outgoing [--json]
//! diff [--output FILE]
//! bundle [--output FILE]
//! mirror [FILES...]
//! options | config-files | version
//! ```

pub mod backup;
pub mod global;


use crate::cli::backup::{CaptureArgs, MirrorArgs, QueryArgs, StatusArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Backs up uncommitted and unpushed work from a Mercurial working copy.
#[derive(Debug, Parser)]
#[command(
    name = "srcbackup",
    author,
    version,
    about = "Back up uncommitted and unpushed Mercurial work",
    long_about = "srcbackup Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Without a command, srcbackup runs a full pass over the\n\
                  configured repository: it bundles the newest unpushed commit,\n\
                  saves a diff of uncommitted changes and mirrors modified and\n\
                  unknown files into the destination.",
    after_help = "CONFIGURATION:\n\n\
                  srcbackup reads `srcbackup.toml` from the current directory if\n\
                  present, then every file given with --config, then SRCBACKUP_*\n\
                  environment variables (SRCBACKUP_PATHS__REPOSITORY=...), then\n\
                  command-line overrides. Use --no-default-config to skip the\n\
                  file in the current directory."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the full backup pass.
    Run,

    /// Lists uncommitted files.
    Status(StatusArgs),

    /// Shows the current revision and whether the working copy is dirty.
    Identify(QueryArgs),

    /// Shows the newest unpushed commit.
    Outgoing(QueryArgs),

    /// Saves a diff of uncommitted changes.
    Diff(CaptureArgs),

    /// Saves a bundle of unpushed commits.
    Bundle(CaptureArgs),

    /// Mirrors files into the uncommitted files directory.
    Mirror(MirrorArgs),

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files used.
    #[command(name = "config-files")]
    ConfigFiles,

    /// Shows the version.
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
