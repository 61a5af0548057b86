// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only commands: `status`, `identify`, `outgoing`.
//!
//! ```text
//! status    a/b.txt            ["a/b.txt","c.txt"]
//!           c.txt
//! identify  3f2a9c1b7d4e+      {"id":"3f2a9c1b7d4e","dirty":true}
//! outgoing  3f2a9c1b7d4e 2024-03-05T13:30:00+00:00
//!                              {"id":..,"timestamp":..}
//! ```

use serde::Serialize;

use super::BackupContext;
use crate::artifact::iso_timestamp;
use crate::cli::backup::{QueryArgs, StatusArgs};
use crate::error::Result;
use crate::hg::{RevisionRecord, WorkingRevision};

/// Renders the uncommitted file list.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_status(files: &[String], json: bool) -> Result<String> {
    if json {
        return to_json(&files);
    }
    Ok(files.join("\n"))
}

/// Renders the current revision, `+` marking a dirty working copy.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_identify(revision: Option<&WorkingRevision>, json: bool) -> Result<String> {
    if json {
        return to_json(&revision);
    }
    Ok(revision.map_or_else(String::new, |r| {
        format!("{}{}", r.id, if r.dirty { "+" } else { "" })
    }))
}

/// Renders the newest unpushed commit.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_outgoing(record: Option<&RevisionRecord>, json: bool) -> Result<String> {
    if json {
        return to_json(&record);
    }
    Ok(record.map_or_else(String::new, |r| {
        format!("{} {}", r.id, iso_timestamp(r.timestamp))
    }))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn print_nonempty(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}

/// Prints the uncommitted files of the configured repository.
///
/// # Errors
///
/// Returns an error if `hg status` fails.
pub async fn run_status_command(args: &StatusArgs, ctx: &BackupContext) -> Result<()> {
    let filter = args.filter(ctx.status_filter());
    let files = ctx
        .hg()
        .list_uncommitted_files(ctx.repository(), filter)
        .await?;
    let text = render_status(&files, args.json)?;
    if args.json {
        println!("{text}");
    } else {
        print_nonempty(&text);
    }
    Ok(())
}

/// Prints the current revision.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub async fn run_identify_command(args: &QueryArgs, ctx: &BackupContext) -> Result<()> {
    let revision = ctx.hg().current_revision(ctx.repository()).await;
    let text = render_identify(revision.as_ref(), args.json)?;
    if args.json {
        println!("{text}");
    } else {
        print_nonempty(&text);
    }
    Ok(())
}

/// Prints the newest unpushed commit.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub async fn run_outgoing_command(args: &QueryArgs, ctx: &BackupContext) -> Result<()> {
    let record = ctx.hg().newest_unpushed_commit(ctx.repository()).await;
    let text = render_outgoing(record.as_ref(), args.json)?;
    if args.json {
        println!("{text}");
    } else {
        print_nonempty(&text);
    }
    Ok(())
}
