// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::revision::{WorkingRevision, parse_outgoing, parse_timestamp, to_utc};
use super::{Mercurial, StatusFilter, parse_status};
use crate::core::process::builder::ProcessOutput;
use crate::core::process::runner::RunOptions;
use crate::core::process::scripted::{Response, ScriptedRunner};
use crate::error::{BackupError, HgError};

const REPO: &str = "/src/repo";

fn hg(runner: &Arc<ScriptedRunner>, verbose: bool) -> Mercurial {
    Mercurial::new(runner.clone(), "hg", RunOptions::new(verbose, false))
}

// --- Parsing ---

#[test]
fn test_working_revision_parse() {
    let dirty = WorkingRevision::parse("3f2a9c1b7d4e+\n").expect("dirty id");
    assert_eq!(dirty.id, "3f2a9c1b7d4e");
    assert!(dirty.dirty);

    let clean = WorkingRevision::parse("3f2a9c1b7d4e").expect("clean id");
    assert_eq!(clean.id, "3f2a9c1b7d4e");
    assert!(!clean.dirty);

    // Merge states show two parents; only the final marker is stripped.
    let merge = WorkingRevision::parse("aaa+bbb+").expect("merge id");
    assert_eq!(merge.id, "aaa+bbb");
    assert!(merge.dirty);

    assert!(WorkingRevision::parse("  \n").is_none());
}

#[test]
fn test_parse_status_lines() {
    let output = "a/b.txt\n  c.txt  \n\n";
    insta::assert_debug_snapshot!(parse_status(output, false), @r#"
    [
        "a/b.txt",
        "c.txt",
    ]
    "#);

    assert!(parse_status("", false).is_empty());
    assert!(parse_status("\n", true).is_empty());
}

#[test]
fn test_parse_status_verbose_comments() {
    let output = "a.txt\n# The repository is in an unfinished *merge* state.\n";
    assert_eq!(parse_status(output, true), vec!["a.txt"]);
    assert_eq!(parse_status(output, false).len(), 2);
}

#[test]
fn test_parse_timestamp_forms() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 5, 13, 30, 0).single().expect("valid");

    for raw in [
        "2024-03-05T14:30:00+01:00",
        "2024-03-05 14:30:00 +0100",
        "2024-03-05 14:30 +0100",
        "1709645400 -3600",
        "2024-03-05T13:30:00",
        "2024-03-05 13:30:00",
    ] {
        let parsed = parse_timestamp(raw).unwrap_or_else(|| panic!("{raw} should parse"));
        assert_eq!(to_utc(parsed), expected, "{raw}");
    }

    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("").is_none());
}

#[test]
fn test_to_utc_subtracts_offset() {
    let west = parse_timestamp("2024-01-01T20:00:00-05:00").expect("parse");
    insta::assert_snapshot!(to_utc(west).to_rfc3339(), @"2024-01-02T01:00:00+00:00");

    let utc = parse_timestamp("2024-01-01T20:00:00+00:00").expect("parse");
    insta::assert_snapshot!(to_utc(utc).to_rfc3339(), @"2024-01-01T20:00:00+00:00");
}

#[test]
fn test_parse_outgoing() {
    let record = parse_outgoing(
        "comparing with ssh://hg@example.org/repo\nsearching for changes\n:NODE:3f2a9c1b7d4e\n:DATE:2024-03-05T14:30:00+01:00",
    )
    .expect("record");
    assert_eq!(record.id, "3f2a9c1b7d4e");
    insta::assert_snapshot!(
        serde_json::to_string(&record).expect("serialize"),
        @r#"{"id":"3f2a9c1b7d4e","timestamp":"2024-03-05T13:30:00Z"}"#
    );

    // Order independent.
    let reversed = parse_outgoing(":DATE:2024-03-05T14:30:00+01:00\n:NODE:3f2a9c1b7d4e\n");
    assert_eq!(reversed, Some(record));
}

#[test]
fn test_parse_outgoing_incomplete() {
    assert!(parse_outgoing("").is_none());
    assert!(parse_outgoing("no changes found\n").is_none());
    assert!(parse_outgoing(":NODE:3f2a9c1b7d4e\n").is_none());
    assert!(parse_outgoing(":DATE:2024-03-05T14:30:00+01:00\n").is_none());
    assert!(parse_outgoing(":NODE:3f2a9c1b7d4e\n:DATE:garbage\n").is_none());
}

// --- Invocations ---

#[tokio::test]
async fn test_list_uncommitted_files_args() {
    let runner = Arc::new(ScriptedRunner::new().on("status", Response::stdout("a/b.txt\nc.txt\n")));

    let files = hg(&runner, false)
        .list_uncommitted_files(Path::new(REPO), StatusFilter::default())
        .await
        .expect("status");
    assert_eq!(files, vec!["a/b.txt", "c.txt"]);

    let filter = StatusFilter {
        include_removed: true,
        include_deleted: true,
    };
    hg(&runner, true)
        .list_uncommitted_files(Path::new(REPO), filter)
        .await
        .expect("status");

    let calls = runner.calls_for("status");
    insta::assert_snapshot!(calls[0].args.join(" "), @"status --repository /src/repo --no-status --added --modified --unknown --quiet");
    insta::assert_snapshot!(calls[1].args.join(" "), @"status --repository /src/repo --no-status --added --modified --unknown --verbose --removed --deleted");

    // Paths are reported relative to the repository root.
    assert!(calls.iter().all(|c| c.cwd.as_deref() == Some(Path::new(REPO))));
}

#[tokio::test]
async fn test_list_uncommitted_files_failure() {
    let runner = Arc::new(
        ScriptedRunner::new().on("status", Response::exit(255).with_stderr("abort: no repository found")),
    );

    let err = hg(&runner, false)
        .list_uncommitted_files(Path::new(REPO), StatusFilter::default())
        .await
        .expect_err("status fails");

    let BackupError::Hg(hg_err) = &err else {
        panic!("expected hg error, got {err:?}");
    };
    assert!(matches!(**hg_err, HgError::CommandFailed { subcommand: "status", .. }));
    insta::assert_snapshot!(
        err.to_string(),
        @"hg error: hg status failed for /src/repo: process 'hg status --repository /src/repo --no-status --added --modified --unknown --quiet' exited with code 255: abort: no repository found"
    );
}

#[tokio::test]
async fn test_empty_repository_path_rejected() {
    let runner = Arc::new(ScriptedRunner::new());
    let err = hg(&runner, false)
        .list_uncommitted_files(Path::new(""), StatusFilter::default())
        .await
        .expect_err("empty path");
    assert!(matches!(err, BackupError::Hg(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_current_revision() {
    let runner = Arc::new(ScriptedRunner::new().on("identify", Response::stdout("3f2a9c1b7d4e+\n")));
    let revision = hg(&runner, false)
        .current_revision(Path::new(REPO))
        .await
        .expect("revision");
    assert_eq!(revision.id, "3f2a9c1b7d4e");
    assert!(revision.dirty);

    let call = &runner.calls_for("identify")[0];
    insta::assert_snapshot!(call.args.join(" "), @"identify --repository /src/repo --id");
}

#[tokio::test]
async fn test_current_revision_failure_is_none() {
    let runner = Arc::new(ScriptedRunner::new().on("identify", Response::exit(255)));
    assert!(hg(&runner, false).current_revision(Path::new(REPO)).await.is_none());

    let runner = Arc::new(ScriptedRunner::new().on("hg", Response::spawn_failure()));
    assert!(hg(&runner, false).current_revision(Path::new(REPO)).await.is_none());
}

#[tokio::test]
async fn test_newest_unpushed_commit() {
    let runner = Arc::new(ScriptedRunner::new().on(
        "outgoing",
        Response::stdout(":NODE:3f2a9c1b7d4e\n:DATE:2024-03-05T14:30:00+01:00"),
    ));
    let record = hg(&runner, false)
        .newest_unpushed_commit(Path::new(REPO))
        .await
        .expect("record");
    assert_eq!(record.id, "3f2a9c1b7d4e");

    let call = &runner.calls_for("outgoing")[0];
    insta::assert_snapshot!(
        call.args.join(" "),
        @r"outgoing --repository /src/repo --newest-first --limit 1 --template :NODE:{node|short}\n:DATE:{date|rfc3339date} --quiet"
    );
}

#[tokio::test]
async fn test_newest_unpushed_commit_nothing_outgoing() {
    // hg exits 1 when nothing is outgoing and 255 without a default path.
    for code in [1, 255] {
        let runner = Arc::new(ScriptedRunner::new().on("outgoing", Response::exit(code)));
        assert!(hg(&runner, false).newest_unpushed_commit(Path::new(REPO)).await.is_none());
    }
}

#[test]
fn test_outgoing_accepts_nothing_outgoing_exit() {
    let runner = Arc::new(ScriptedRunner::new());
    let command = hg(&runner, false)
        .outgoing_command(Path::new(REPO))
        .expect("command");

    let nothing = ProcessOutput::new(1, "no changes found\n".into(), String::new());
    assert_eq!(command.check_exit(nothing).expect("exit 1 accepted").exit_code(), 1);

    let aborted = ProcessOutput::new(255, String::new(), "abort: repository default not found".into());
    assert!(command.check_exit(aborted).is_err());
}

#[tokio::test]
async fn test_diff_and_bundle_args() {
    let dir = tempfile::tempdir().expect("tempdir");
    let patch = dir.path().join("x.patch");
    let bundle = dir.path().join("x.hg");
    let runner = Arc::new(
        ScriptedRunner::new()
            .on("diff", Response::stdout("diff -r 3f2a9c1b7d4e c.txt\n"))
            .on("bundle", Response::ok().touching_last_arg()),
    );
    let client = hg(&runner, true);

    client.diff_to(Path::new(REPO), &patch).await.expect("diff");
    client.bundle_to(Path::new(REPO), &bundle).await.expect("bundle");

    let diff_call = &runner.calls_for("diff")[0];
    assert_eq!(diff_call.args, vec!["diff", "--repository", REPO]);
    assert_eq!(diff_call.stdout_file.as_deref(), Some(patch.as_path()));
    assert_eq!(
        std::fs::read_to_string(&patch).expect("patch"),
        "diff -r 3f2a9c1b7d4e c.txt\n"
    );

    let bundle_call = &runner.calls_for("bundle")[0];
    assert_eq!(
        bundle_call.args[..5],
        ["bundle", "--repository", REPO, "--type", "none"]
    );
    assert_eq!(bundle_call.args[5], "--verbose");
    assert!(bundle.exists());
}
