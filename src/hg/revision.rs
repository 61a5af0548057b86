// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Revision values and the parsers for hg's text output.
//!
//! ```text
//! identify --id   "3f2a9c1b7d4e+"  --> WorkingRevision { id, dirty: true }
//! outgoing        ":NODE:3f2a9c1b7d4e"
//!                 ":DATE:2024-03-05T14:30:00+01:00"
//!                                  --> RevisionRecord { id, timestamp (UTC) }
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Marker hg appends to the identifier of a modified working copy.
pub const DIRTY_MARKER: char = '+';

/// Line prefix carrying the short node in the outgoing template.
pub const NODE_SENTINEL: &str = ":NODE:";

/// Line prefix carrying the commit date in the outgoing template.
pub const DATE_SENTINEL: &str = ":DATE:";

/// Template handed to `hg outgoing`.
///
/// The `\n` is expanded by hg's template engine, not by Rust.
pub const OUTGOING_TEMPLATE: &str = r":NODE:{node|short}\n:DATE:{date|rfc3339date}";

/// Current checkout of a working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingRevision {
    /// Revision identifier without the dirty marker.
    pub id: String,
    /// Whether uncommitted changes exist on top of `id`.
    pub dirty: bool,
}

impl WorkingRevision {
    /// Parses `hg identify --id` output.
    ///
    /// Exactly one trailing [`DIRTY_MARKER`] is stripped. Blank output means
    /// no revision is known.
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let raw = output.trim();
        if raw.is_empty() {
            return None;
        }
        let (id, dirty) = raw
            .strip_suffix(DIRTY_MARKER)
            .map_or((raw, false), |id| (id, true));
        Some(Self {
            id: id.to_string(),
            dirty,
        })
    }
}

/// A revision identifier paired with its commit time in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionRecord {
    /// Short node hash.
    pub id: String,
    /// Commit time normalized to UTC.
    pub timestamp: DateTime<Utc>,
}

impl RevisionRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
        }
    }
}

/// Parses templated `hg outgoing` output.
///
/// Lines are scanned for the two sentinels independently, so their order does
/// not matter and unrelated lines (`comparing with ...`) are ignored. A record
/// needs both a node and a parseable date.
#[must_use]
pub fn parse_outgoing(output: &str) -> Option<RevisionRecord> {
    let mut node = None;
    let mut date = None;

    for line in output.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix(NODE_SENTINEL) {
            node = Some(value.trim());
        } else if let Some(value) = line.strip_prefix(DATE_SENTINEL) {
            date = Some(value.trim());
        }
    }

    let node = node.filter(|n| !n.is_empty())?;
    let Some(raw_date) = date else {
        warn!(node, "outgoing record has no date");
        return None;
    };
    let Some(parsed) = parse_timestamp(raw_date) else {
        warn!(node, date = raw_date, "unrecognized outgoing date");
        return None;
    };

    Some(RevisionRecord::new(node, to_utc(parsed)))
}

/// Parses the date representations hg can emit.
///
/// Accepted forms:
/// - RFC 3339 (`2024-03-05T14:30:00+01:00`)
/// - isodate / isodatesec (`2024-03-05 14:30 +0100`, `2024-03-05 14:30:00 +0100`)
/// - hgdate (`1709645400 -3600`, offset in seconds west of UTC)
/// - ISO without an offset, taken as UTC
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    for format in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M %z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    if let Some(parsed) = parse_hgdate(raw) {
        return Some(parsed);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    None
}

fn parse_hgdate(raw: &str) -> Option<DateTime<FixedOffset>> {
    let (secs, west) = raw.split_once(' ')?;
    let secs: i64 = secs.parse().ok()?;
    let west: i32 = west.trim().parse().ok()?;
    let offset = FixedOffset::west_opt(west)?;
    DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&offset))
}

/// Normalizes a timestamp to UTC by subtracting its offset.
#[must_use]
pub fn to_utc(timestamp: DateTime<FixedOffset>) -> DateTime<Utc> {
    timestamp.with_timezone(&Utc)
}
