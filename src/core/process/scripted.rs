// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recording [`CommandRunner`] with canned responses.
//!
//! ```text
//! ScriptedRunner::new()
//!   .on("status",   Response::stdout("a/b.txt\nc.txt\n"))
//!   .on("outgoing", Response::exit(1))
//!   .on("rsync",    Response::ok())
//!
//! key = first argument (hg subcommand) or program file stem
//! unmatched commands succeed with empty output
//! ```
//!
//! Every call is recorded. When a command carries `--include-from FILE`, the
//! rule file is read at call time, since the caller removes it afterwards.

use futures_util::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Mutex;

use super::builder::{ProcessBuilder, ProcessOutput};
use super::runner::CommandRunner;
use crate::error::{BackupResult, ProcessError};

/// Canned result for one kind of command.
#[derive(Debug, Clone, Default)]
pub struct Response {
    exit_code: i32,
    stdout: String,
    stderr: String,
    spawn_fails: bool,
    touch_last_arg: bool,
    remove_last_arg: bool,
}

impl Response {
    /// Successful exit with no output.
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    /// Successful exit printing `stdout`.
    #[must_use]
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Exit with `code` and no output.
    #[must_use]
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::default()
        }
    }

    /// The executable cannot be launched at all.
    #[must_use]
    pub fn spawn_failure() -> Self {
        Self {
            spawn_fails: true,
            ..Self::default()
        }
    }

    /// Sets the stderr text reported alongside the exit code.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Creates the file named by the last argument, like `hg bundle FILE` does.
    #[must_use]
    pub const fn touching_last_arg(mut self) -> Self {
        self.touch_last_arg = true;
        self
    }

    /// Deletes the file named by the last argument, like an aborted
    /// `hg bundle FILE` does.
    #[must_use]
    pub const fn removing_last_arg(mut self) -> Self {
        self.remove_last_arg = true;
        self
    }
}

/// One invocation seen by a [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program as configured (not resolved).
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Working directory, if set.
    pub cwd: Option<PathBuf>,
    /// Stdout redirection target, if any.
    pub stdout_file: Option<PathBuf>,
    /// Contents of the `--include-from` rule file at call time.
    pub include_rules: Option<String>,
}

impl RecordedCall {
    /// First argument, which is the subcommand for hg.
    #[must_use]
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Test double implementing [`CommandRunner`].
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: Vec<(String, Response)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response for commands whose key equals `key`.
    ///
    /// The first registration for a key wins.
    #[must_use]
    pub fn on(mut self, key: impl Into<String>, response: Response) -> Self {
        self.responses.push((key.into(), response));
        self
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Calls whose key (subcommand or program stem) equals `key`.
    #[must_use]
    pub fn calls_for(&self, key: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.subcommand() == Some(key) || program_stem(&c.program) == key)
            .collect()
    }

    fn response_for(&self, command: &ProcessBuilder) -> Response {
        let stem = program_stem(&command.program().display().to_string());
        let subcommand = command.args_slice().first().map(String::as_str);
        self.responses
            .iter()
            .find(|(key, _)| subcommand == Some(key.as_str()) || *key == stem)
            .map(|(_, response)| response.clone())
            .unwrap_or_default()
    }

    fn record(&self, command: &ProcessBuilder) {
        let include_rules = command
            .arg_value("--include-from")
            .and_then(|path| std::fs::read_to_string(path).ok());
        let call = RecordedCall {
            program: command.program().display().to_string(),
            args: command.args_slice().to_vec(),
            cwd: command.working_dir().cloned(),
            stdout_file: command.stdout_file().map(std::path::Path::to_path_buf),
            include_rules,
        };
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn execute(&self, command: &ProcessBuilder) -> BackupResult<ProcessOutput> {
        self.record(command);
        let response = self.response_for(command);

        if response.spawn_fails {
            return Err(ProcessError::SpawnFailed {
                command: command.command_line(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "scripted"),
            }
            .into());
        }

        let mut stdout = response.stdout;
        if let Some(path) = command.stdout_file() {
            std::fs::write(path, &stdout)?;
            stdout.clear();
        }
        if response.touch_last_arg
            && response.exit_code == 0
            && let Some(last) = command.args_slice().last()
        {
            std::fs::write(last, b"")?;
        }
        if response.remove_last_arg
            && let Some(last) = command.args_slice().last()
        {
            let _ = std::fs::remove_file(last);
        }

        command.check_exit(ProcessOutput::new(
            response.exit_code,
            stdout,
            response.stderr,
        ))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: ProcessBuilder) -> BoxFuture<'_, BackupResult<ProcessOutput>> {
        let result = self.execute(&command);
        Box::pin(async move { result })
    }
}

fn program_stem(program: &str) -> String {
    std::path::Path::new(program)
        .file_stem()
        .map_or_else(|| program.to_string(), |s| s.to_string_lossy().into_owned())
}
