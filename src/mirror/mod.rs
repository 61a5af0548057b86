// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Selective mirroring of a sparse file list with rsync.
//!
//! ```text
//! ["a/b.txt", "c.txt"]
//!        |
//!  SyncRuleSet::for_files()      None for an empty list (no rsync call)
//!        |
//!  + a/          one directory + file pair per entry, input order
//!  + a/b.txt
//!  + ./
//!  + c.txt
//!  - *           always last
//!        |
//!  NamedTempFile (written, flushed, removed on drop)
//!        |
//!  rsync --archive --verbose --delete --delete-excluded
//!        --include-from RULES SOURCE/ DEST
//! ```
//!
//! rsync evaluates the rules top to bottom and the first match wins. Files
//! present in `DEST` but excluded by the rules are deleted.

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::fmt;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::process::builder::{ProcessBuilder, StreamFlags};
use crate::core::process::runner::{CommandRunner, RunOptions};
use crate::error::{BackupError, BackupResult, MirrorError};
use crate::utility::fs::ensure_dir;

/// One line of an rsync filter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncRule {
    /// Descend into a directory. Rendered with a trailing `/`.
    IncludeDir(String),
    /// Copy exactly this file.
    IncludeFile(String),
    /// Exclude everything not matched earlier.
    ExcludeAll,
}

impl SyncRule {
    /// Directory rule for the directory containing `file`.
    ///
    /// Files at the root of the source tree get `./`.
    #[must_use]
    pub fn containing_dir(file: &str) -> Self {
        let parent = Path::new(file)
            .parent()
            .map(|p| p.to_string_lossy().trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());
        Self::IncludeDir(parent)
    }
}

impl fmt::Display for SyncRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeDir(dir) => write!(f, "+ {}/", escape_pattern(dir)),
            Self::IncludeFile(file) => write!(f, "+ {}", escape_pattern(file)),
            Self::ExcludeAll => f.write_str("- *"),
        }
    }
}

/// Makes a path match only itself in an rsync filter rule.
///
/// rsync switches to wildcard matching when a pattern contains `*`, `?` or
/// `[`, and only then treats `\` as an escape. Plain names are left as is.
#[must_use]
pub fn escape_pattern(path: &str) -> Cow<'_, str> {
    const WILDCARDS: [char; 3] = ['*', '?', '['];
    if !path.contains(WILDCARDS) {
        return Cow::Borrowed(path);
    }
    let mut escaped = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        if c == '\\' || WILDCARDS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Ordered rules ending in [`SyncRule::ExcludeAll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRuleSet {
    rules: Vec<SyncRule>,
}

impl SyncRuleSet {
    /// Builds the rules that select exactly `files`.
    ///
    /// Returns `None` for an empty list: a rule set of only `- *` would make
    /// rsync delete the whole destination.
    #[must_use]
    pub fn for_files(files: &[String]) -> Option<Self> {
        if files.is_empty() {
            return None;
        }
        let mut rules = Vec::with_capacity(files.len() * 2 + 1);
        for file in files {
            rules.push(SyncRule::containing_dir(file));
            rules.push(SyncRule::IncludeFile(file.clone()));
        }
        rules.push(SyncRule::ExcludeAll);
        Some(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[SyncRule] {
        &self.rules
    }

    /// Renders the rules one per line, newline terminated.
    #[must_use]
    pub fn render(&self) -> String {
        self.rules.iter().map(|rule| format!("{rule}\n")).collect()
    }

    /// Writes the rules into a fresh temporary file.
    ///
    /// The file is flushed before returning and removed when dropped.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::RuleFile` if the file cannot be created or
    /// written.
    pub fn write_temp(&self) -> BackupResult<NamedTempFile> {
        let write = || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("srcbackup-rules-")
                .suffix(".txt")
                .tempfile()?;
            file.write_all(self.render().as_bytes())?;
            file.flush()?;
            Ok(file)
        };
        write().map_err(|source| MirrorError::RuleFile { source }.into())
    }
}

/// Result of a [`Mirror::mirror`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The file list was empty; rsync was not invoked.
    NothingToMirror,
    /// rsync ran with a rule set covering `files` entries.
    Mirrored { files: usize },
}

/// rsync wrapper that mirrors sparse file lists.
pub struct Mirror {
    runner: Arc<dyn CommandRunner>,
    program: PathBuf,
    options: RunOptions,
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mirror")
            .field("program", &self.program)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Mirror {
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

    /// Mirrors `files` (relative to `source`) into `destination`.
    ///
    /// Destination entries outside the list are deleted. An empty list is a
    /// no-op that leaves `destination` untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created, the rule file
    /// cannot be written, or rsync fails.
    pub async fn mirror(
        &self,
        source: &Path,
        files: &[String],
        destination: &Path,
    ) -> BackupResult<MirrorOutcome> {
        let Some(rules) = SyncRuleSet::for_files(files) else {
            debug!(source = %source.display(), "nothing to mirror");
            return Ok(MirrorOutcome::NothingToMirror);
        };

        if !self.options.dry_run {
            ensure_dir(destination).await?;
        }

        let rule_file = rules.write_temp()?;
        debug!(rules = %rules.render().trim_end(), "rsync filter");

        let command = ProcessBuilder::new(&self.program)
            .args(["--archive", "--verbose"])
            .arg_if(self.options.dry_run, "--dry-run")
            .args(["--delete", "--delete-excluded", "--include-from"])
            .arg(rule_file.path())
            .arg(source_with_separator(source))
            .arg(destination)
            .stderr_flags(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING)
            .name("rsync");

        let result = self.runner.run(command).await;
        drop(rule_file);

        result.map_err(|err| sync_failed(source, destination, err))?;
        info!(
            files = files.len(),
            destination = %destination.display(),
            dry_run = self.options.dry_run,
            "mirrored uncommitted files"
        );
        Ok(MirrorOutcome::Mirrored { files: files.len() })
    }
}

/// `SOURCE/` so rsync copies the contents rather than the directory itself.
fn source_with_separator(source: &Path) -> String {
    let raw = source.to_string_lossy();
    if raw.ends_with('/') {
        raw.into_owned()
    } else {
        format!("{raw}/")
    }
}

fn sync_failed(source: &Path, destination: &Path, err: BackupError) -> BackupError {
    match err {
        BackupError::Process(process) => MirrorError::SyncFailed {
            source_root: source.display().to_string(),
            destination: destination.display().to_string(),
            source: *process,
        }
        .into(),
        other => other,
    }
}
