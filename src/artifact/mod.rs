// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup artifact naming and capture.
//!
//! ```text
//! bundle_file_name(record)  bundle_2024-03-05T13:30:00_3f2a9c1b7d4e.hg
//! diff_file_name(id, now)   2024-03-05T13:30:00.250000_3f2a9c1b7d4e.patch
//!
//! capture_*(dest)
//!   dest exists --> AlreadyExists   (rerun after a capture is a no-op)
//!   dry run     --> Planned
//!   otherwise   --> create parent dirs and an empty dest, run hg --> Written
//!                   (dest stays behind on failure, so hg runs once per name)
//! ```
//!
//! Timestamps are always UTC so the same commit gets the same name on every
//! machine.

pub mod capture;


use chrono::{DateTime, Timelike, Utc};

use crate::hg::RevisionRecord;

pub use capture::{CaptureOutcome, capture_uncommitted_diff, capture_unpushed_bundle};

/// Extension of uncompressed hg bundles.
pub const BUNDLE_EXTENSION: &str = "hg";

/// Extension of captured diffs.
pub const DIFF_EXTENSION: &str = "patch";

/// Number of revision id characters kept in diff names.
pub const DIFF_ID_LEN: usize = 12;

/// Formats `timestamp` as `YYYY-MM-DDTHH:MM:SS[.ffffff]`.
///
/// Microseconds appear only when non-zero. No offset suffix is written.
#[must_use]
pub fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    if timestamp.nanosecond() / 1_000 == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// File name for the bundle of an unpushed commit.
#[must_use]
pub fn bundle_file_name(record: &RevisionRecord) -> String {
    format!(
        "bundle_{}_{}.{BUNDLE_EXTENSION}",
        iso_timestamp(record.timestamp),
        record.id
    )
}

/// File name for a diff taken on top of `revision_id` at `now`.
#[must_use]
pub fn diff_file_name(revision_id: &str, now: DateTime<Utc>) -> String {
    let short: String = revision_id.chars().take(DIFF_ID_LEN).collect();
    format!("{}_{short}.{DIFF_EXTENSION}", iso_timestamp(now))
}
