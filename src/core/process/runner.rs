// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and the runner seam.
//!
//! ```text
//! CommandRunner::run(builder)
//!     SystemRunner   --> builder.run()
//!     ScriptedRunner --> canned output (tests)
//!
//! run()
//!   resolved_program() --> ExecutableNotFound
//!          |
//!   build_command()  args, cwd, env, stdio, stdout file
//!          |
//!       spawn()  --> SpawnFailed
//!          |
//!     run_child()  stream stdout/stderr
//!          |
//!     check_exit() --> NonZeroExit (outside success_codes)
//!          |
//!          v
//!    ProcessOutput { exit_code, stdout, stderr }
//! ```

use futures_util::future::BoxFuture;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::{BackupResult, ProcessError};

/// Executes configured processes.
///
/// The backup stages only ever talk to external tools through this trait, so
/// their argument construction and output parsing can be exercised against a
/// scripted runner in tests.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the process cannot be spawned or exits
    /// with a code outside its success set.
    fn run(&self, command: ProcessBuilder) -> BoxFuture<'_, BackupResult<ProcessOutput>>;
}

/// Per-run switches handed to every tool wrapper at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Ask tools for verbose output instead of quiet output.
    pub verbose: bool,
    /// Report what would be written without writing it.
    pub dry_run: bool,
}

impl RunOptions {
    #[must_use]
    pub const fn new(verbose: bool, dry_run: bool) -> Self {
        Self { verbose, dry_run }
    }
}

/// Runner that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: ProcessBuilder) -> BoxFuture<'_, BackupResult<ProcessOutput>> {
        Box::pin(command.run())
    }
}

impl ProcessBuilder {
    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The program is a bare name that is not in PATH.
    /// - The stdout redirection file cannot be opened.
    /// - Spawning the child process fails, for example when the working
    ///   directory does not exist.
    /// - The process exits with a code outside its success set.
    pub async fn run(self) -> BackupResult<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();
        let program = self.resolved_program()?;

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, program = %program.display(), "exec");

        let mut command = self.build_command(&program)?;

        let mut child = command
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &mut child).await?;
        let output = self.check_exit(output)?;

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self, program: &Path) -> BackupResult<Command> {
        let mut command = Command::new(program);

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());

        if let Some(path) = self.stdout_file() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .map_err(|e| ProcessError::OutputError {
                    command: self.command_line(),
                    message: format!("cannot open {} for stdout: {e}", path.display()),
                })?;
            command.stdout(Stdio::from(file));
        } else {
            command.stdout(Self::stdio_from_flags(self.stdout_config()));
        }

        command.stderr(Self::stdio_from_flags(self.stderr_config()));

        command.kill_on_drop(true);

        Ok(command)
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    }
}
