// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            BackupError (~24 bytes)
//!                    |
//!   +--------+-------+-------+-------+------+
//!   |        |       |       |       |      |
//!   v        v       v       v       v      v
//! Process   Hg    Mirror  Config    Fs     Io
//!   Box     Box    Box     Box      Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Process ExecutableNotFound, SpawnFailed, NonZeroExit, OutputError
//!   Hg      CommandFailed, InvalidPath
//!   Mirror  RuleFile, SyncFailed
//!   Config  MissingKey, InvalidValue
//!   Fs      CreateDir, IoError
//! ```
//!
//! Expected absence (no outgoing change, no revision yet) is never an error:
//! it is an `Option`. Precondition skips are outcome variants of the
//! operations themselves. Only invocation failures travel through here.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BackupError`].
pub type BackupResult<T> = std::result::Result<T, BackupError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BackupError {
    /// External process failed to launch or exited unsuccessfully.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Mercurial query or capture failed.
    #[error("hg error: {0}")]
    Hg(#[from] Box<HgError>),

    /// Selective mirroring failed.
    #[error("mirror error: {0}")]
    Mirror(#[from] Box<MirrorError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BackupError {
                fn from(err: $error) -> Self {
                    BackupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    HgError => Hg,
    MirrorError => Mirror,
    ConfigError => Config,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a code outside its success set.
    #[error("process '{command}' exited with code {code}{}", stderr_suffix(.stderr))]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Failed to read process output or redirect it.
    #[error("failed to handle output of process '{command}': {message}")]
    OutputError { command: String, message: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl ProcessError {
    /// Exit code of the failed process, if it got far enough to have one.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// --- Hg Errors ---

/// Mercurial operation errors.
#[derive(Debug, Error)]
pub enum HgError {
    /// An hg subcommand failed.
    #[error("hg {subcommand} failed for {repository}: {source}")]
    CommandFailed {
        subcommand: &'static str,
        repository: String,
        #[source]
        source: ProcessError,
    },

    /// A path could not be passed to hg.
    #[error("invalid path for hg: {path}")]
    InvalidPath { path: String },
}

// --- Mirror Errors ---

/// Selective mirroring errors.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The temporary include/exclude rule file could not be written.
    #[error("failed to write rule file: {source}")]
    RuleFile {
        #[source]
        source: std::io::Error,
    },

    /// The synchronization tool failed.
    #[error("rsync from {source_root} to {destination} failed: {source}")]
    SyncFailed {
        source_root: String,
        destination: String,
        #[source]
        source: ProcessError,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
