// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mercurial queries and captures.
//!
//! ```text
//!                 Mercurial { runner, program, options }
//!                               |
//!   list_uncommitted_files  hg status   --no-status --added --modified --unknown
//!   current_revision        hg identify --id            (failure --> None)
//!   newest_unpushed_commit  hg outgoing --limit 1 ...   (failure --> None)
//!   diff_to                 hg diff     > FILE
//!   bundle_to               hg bundle   --type none FILE
//!                               |
//!                  CommandRunner (System / Scripted)
//! ```
//!
//! Every invocation carries `--repository`, runs inside the repository and
//! sets `HGPLAIN=1`, so paths and output are not affected by user
//! configuration.

pub mod revision;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::core::process::runner::{CommandRunner, RunOptions};
use crate::error::{BackupError, BackupResult, HgError};

pub use revision::{RevisionRecord, WorkingRevision};

/// Exit code of `hg outgoing` when every changeset is already upstream.
const NOTHING_OUTGOING: i32 = 1;

/// Which extra change kinds `hg status` should report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFilter {
    /// Also list files scheduled for removal (`hg remove`).
    pub include_removed: bool,
    /// Also list tracked files missing from disk.
    pub include_deleted: bool,
}

/// Handle for running hg against working copies.
pub struct Mercurial {
    runner: Arc<dyn CommandRunner>,
    program: PathBuf,
    options: RunOptions,
}

impl std::fmt::Debug for Mercurial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mercurial")
            .field("program", &self.program)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Mercurial {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        program: impl Into<PathBuf>,
        options: RunOptions,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> RunOptions {
        self.options
    }

    /// Lists files that are added, modified or unknown, relative to `repo`.
    ///
    /// # Errors
    ///
    /// Returns `HgError::CommandFailed` if `hg status` cannot run or exits
    /// non-zero.
    pub async fn list_uncommitted_files(
        &self,
        repo: &Path,
        filter: StatusFilter,
    ) -> BackupResult<Vec<String>> {
        let command = self
            .command("status", repo)?
            .args(["--no-status", "--added", "--modified", "--unknown"])
            .arg(self.verbosity_flag())
            .arg_if(filter.include_removed, "--removed")
            .arg_if(filter.include_deleted, "--deleted")
            .capture_output();

        let output = self.execute("status", repo, command).await?;
        let files = parse_status(output.stdout(), self.options.verbose);
        debug!(repo = %repo.display(), count = files.len(), "uncommitted files");
        Ok(files)
    }

    /// Returns the working copy's base revision and dirty state.
    ///
    /// Any failure yields `None`: an empty or missing repository simply has no
    /// known revision.
    pub async fn current_revision(&self, repo: &Path) -> Option<WorkingRevision> {
        let command = match self.command("identify", repo) {
            Ok(command) => command.arg("--id").capture_output(),
            Err(err) => {
                debug!(error = %err, "identify skipped");
                return None;
            }
        };

        match self.execute("identify", repo, command).await {
            Ok(output) => WorkingRevision::parse(output.stdout()),
            Err(err) => {
                debug!(error = %err, "no current revision");
                None
            }
        }
    }

    /// Returns the most recent committed but unpushed change.
    ///
    /// Nothing outgoing, a missing upstream and any other failure all yield
    /// `None`.
    pub async fn newest_unpushed_commit(&self, repo: &Path) -> Option<RevisionRecord> {
        let command = match self.outgoing_command(repo) {
            Ok(command) => command,
            Err(err) => {
                debug!(error = %err, "outgoing skipped");
                return None;
            }
        };

        match self.execute("outgoing", repo, command).await {
            Ok(output) if output.exit_code() == NOTHING_OUTGOING => {
                debug!(repo = %repo.display(), "nothing outgoing");
                None
            }
            Ok(output) => revision::parse_outgoing(output.stdout()),
            Err(err) => {
                info!(error = %err, "outgoing unavailable, not bundling");
                None
            }
        }
    }

    fn outgoing_command(&self, repo: &Path) -> BackupResult<ProcessBuilder> {
        Ok(self
            .command("outgoing", repo)?
            .args(["--newest-first", "--limit", "1"])
            .arg("--template")
            .arg(revision::OUTGOING_TEMPLATE)
            .arg(self.verbosity_flag())
            .success_codes([0, NOTHING_OUTGOING])
            .capture_output())
    }

    /// Writes the unified diff of uncommitted changes into `file`.
    ///
    /// # Errors
    ///
    /// Returns `HgError::CommandFailed` if `hg diff` fails.
    pub async fn diff_to(&self, repo: &Path, file: &Path) -> BackupResult<()> {
        let command = self
            .command("diff", repo)?
            .stdout_to_file(file)
            .capture_stderr();

        self.execute("diff", repo, command).await?;
        info!(file = %file.display(), "wrote diff");
        Ok(())
    }

    /// Writes an uncompressed bundle of outgoing changesets into `file`.
    ///
    /// # Errors
    ///
    /// Returns `HgError::CommandFailed` if `hg bundle` fails.
    pub async fn bundle_to(&self, repo: &Path, file: &Path) -> BackupResult<()> {
        let command = self
            .command("bundle", repo)?
            .args(["--type", "none"])
            .arg(self.verbosity_flag())
            .arg(file);

        self.execute("bundle", repo, command).await?;
        info!(file = %file.display(), "wrote bundle");
        Ok(())
    }

    const fn verbosity_flag(&self) -> &'static str {
        if self.options.verbose {
            "--verbose"
        } else {
            "--quiet"
        }
    }

    fn command(&self, subcommand: &'static str, repo: &Path) -> BackupResult<ProcessBuilder> {
        if repo.as_os_str().is_empty() {
            return Err(HgError::InvalidPath {
                path: String::new(),
            }
            .into());
        }
        Ok(ProcessBuilder::new(&self.program)
            .arg(subcommand)
            .arg("--repository")
            .arg(repo)
            .cwd(repo)
            .env_var("HGPLAIN", "1")
            .name(format!("hg {subcommand}")))
    }

    async fn execute(
        &self,
        subcommand: &'static str,
        repo: &Path,
        command: ProcessBuilder,
    ) -> BackupResult<ProcessOutput> {
        self.runner
            .run(command)
            .await
            .map_err(|err| command_failed(subcommand, repo, err))
    }
}

/// Attaches the subcommand and repository to a process failure.
fn command_failed(subcommand: &'static str, repo: &Path, err: BackupError) -> BackupError {
    match err {
        BackupError::Process(source) => HgError::CommandFailed {
            subcommand,
            repository: repo.display().to_string(),
            source: *source,
        }
        .into(),
        other => other,
    }
}

/// Extracts file paths from `hg status --no-status` output.
///
/// Blank lines are dropped. In verbose mode hg adds `# ` commentary about
/// unfinished operations, which is dropped as well.
#[must_use]
pub fn parse_status(output: &str, verbose: bool) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !(verbose && line.starts_with("# ")))
        .map(str::to_string)
        .collect()
}
