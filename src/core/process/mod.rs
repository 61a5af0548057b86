// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and the runner seam.
//!
//! ```text
//! ProcessBuilder::new("hg")
//!   .args() .env_var() .capture_output() .stdout_to_file()
//!       |
//!   CommandRunner::run()
//!       SystemRunner   --> tokio::process::Command, stream stdout/stderr
//!       ScriptedRunner --> canned output, call recording (tests and the
//!                          `testing` feature only)
//!       |
//!   ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
pub mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;
