// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{
    Mirror, MirrorOutcome, SyncRule, SyncRuleSet, escape_pattern, source_with_separator,
};
use crate::core::process::runner::RunOptions;
use crate::core::process::scripted::{Response, ScriptedRunner};
use crate::error::{BackupError, MirrorError};

fn files(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn mirror(runner: &Arc<ScriptedRunner>, dry_run: bool) -> Mirror {
    Mirror::new(runner.clone(), "rsync", RunOptions::new(false, dry_run))
}

#[test]
fn test_rule_rendering() {
    assert_eq!(SyncRule::IncludeDir("a".into()).to_string(), "+ a/");
    assert_eq!(SyncRule::IncludeFile("a/b.txt".into()).to_string(), "+ a/b.txt");
    assert_eq!(SyncRule::ExcludeAll.to_string(), "- *");
}

#[test]
fn test_rule_rendering_escapes_wildcards() {
    assert_eq!(
        SyncRule::IncludeFile("a/[draft].txt".into()).to_string(),
        r"+ a/\[draft].txt"
    );
    assert_eq!(
        SyncRule::IncludeDir("what?".into()).to_string(),
        r"+ what\?/"
    );
    assert_eq!(
        SyncRule::IncludeFile(r"odd\name*.txt".into()).to_string(),
        r"+ odd\\name\*.txt"
    );
    // A backslash is literal unless the pattern has wildcards.
    assert_eq!(escape_pattern(r"dir\file.txt"), r"dir\file.txt");
}

#[test]
fn test_rule_set_escapes_bracketed_name() {
    let rules = SyncRuleSet::for_files(&files(&["a/[draft].txt"])).expect("non-empty");
    insta::assert_snapshot!(rules.render(), @r"
    + a/
    + a/\[draft].txt
    - *
    ");
}

#[test]
fn test_containing_dir() {
    assert_eq!(SyncRule::containing_dir("c.txt"), SyncRule::IncludeDir(".".into()));
    assert_eq!(SyncRule::containing_dir("a/b.txt"), SyncRule::IncludeDir("a".into()));
    assert_eq!(
        SyncRule::containing_dir("a/b/c.txt"),
        SyncRule::IncludeDir("a/b".into())
    );
}

#[test]
fn test_rule_set_for_files() {
    let rules = SyncRuleSet::for_files(&files(&["a/b.txt", "c.txt"])).expect("non-empty");
    insta::assert_snapshot!(rules.render(), @r"
    + a/
    + a/b.txt
    + ./
    + c.txt
    - *
    ");
}

#[test]
fn test_rule_set_shape() {
    let input = files(&["z.txt", "src/main.rs", "docs/guide/intro.md", "z.txt"]);
    let rules = SyncRuleSet::for_files(&input).expect("non-empty");
    let rules = rules.rules();

    assert_eq!(rules.len(), input.len() * 2 + 1);
    assert_eq!(rules.last(), Some(&SyncRule::ExcludeAll));
    for (pair, file) in rules.chunks(2).zip(&input) {
        assert!(matches!(pair[0], SyncRule::IncludeDir(_)));
        assert!(pair[0].to_string().ends_with('/'));
        assert_eq!(pair[1], SyncRule::IncludeFile(file.clone()));
    }
}

#[test]
fn test_rule_set_empty() {
    assert!(SyncRuleSet::for_files(&[]).is_none());
}

#[test]
fn test_write_temp_removed_on_drop() {
    let rules = SyncRuleSet::for_files(&files(&["c.txt"])).expect("non-empty");
    let file = rules.write_temp().expect("rule file");
    let path: PathBuf = file.path().to_path_buf();

    assert_eq!(std::fs::read_to_string(&path).expect("read"), "+ ./\n+ c.txt\n- *\n");
    drop(file);
    assert!(!path.exists());
}

#[test]
fn test_source_separator() {
    assert_eq!(source_with_separator(Path::new("/src/repo")), "/src/repo/");
    assert_eq!(source_with_separator(Path::new("/src/repo/")), "/src/repo/");
}

#[tokio::test]
async fn test_mirror_empty_list_is_noop() {
    let dest = tempfile::tempdir().expect("tempdir");
    let keep = dest.path().join("keep.txt");
    std::fs::write(&keep, "old").expect("write");
    let runner = Arc::new(ScriptedRunner::new());

    let outcome = mirror(&runner, false)
        .mirror(Path::new("/src/repo"), &[], dest.path())
        .await
        .expect("no-op");

    assert_eq!(outcome, MirrorOutcome::NothingToMirror);
    assert!(runner.calls().is_empty());
    assert!(keep.exists());
}

#[tokio::test]
async fn test_mirror_invocation() {
    let root = tempfile::tempdir().expect("tempdir");
    let dest = root.path().join("backup/uncommittedFiles");
    let runner = Arc::new(ScriptedRunner::new());

    let outcome = mirror(&runner, false)
        .mirror(Path::new("/src/repo"), &files(&["a/b.txt", "c.txt"]), &dest)
        .await
        .expect("mirror");

    assert_eq!(outcome, MirrorOutcome::Mirrored { files: 2 });
    assert!(dest.is_dir());

    let calls = runner.calls_for("rsync");
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    let rule_path = call.args[5].clone();
    assert_eq!(
        call.args,
        vec![
            "--archive".to_string(),
            "--verbose".into(),
            "--delete".into(),
            "--delete-excluded".into(),
            "--include-from".into(),
            rule_path.clone(),
            "/src/repo/".into(),
            dest.display().to_string(),
        ]
    );
    assert_eq!(
        call.include_rules.as_deref(),
        Some("+ a/\n+ a/b.txt\n+ ./\n+ c.txt\n- *\n")
    );
    assert!(!Path::new(&rule_path).exists());
}

#[tokio::test]
async fn test_mirror_dry_run() {
    let root = tempfile::tempdir().expect("tempdir");
    let dest = root.path().join("not-created");
    let runner = Arc::new(ScriptedRunner::new());

    mirror(&runner, true)
        .mirror(Path::new("/src/repo"), &files(&["c.txt"]), &dest)
        .await
        .expect("dry run");

    let call = &runner.calls_for("rsync")[0];
    assert_eq!(call.args[2], "--dry-run");
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_mirror_failure_removes_rule_file() {
    let root = tempfile::tempdir().expect("tempdir");
    let runner = Arc::new(
        ScriptedRunner::new().on("rsync", Response::exit(23).with_stderr("some files vanished")),
    );

    let err = mirror(&runner, false)
        .mirror(Path::new("/src/repo"), &files(&["c.txt"]), root.path())
        .await
        .expect_err("rsync fails");

    let BackupError::Mirror(inner) = &err else {
        panic!("expected mirror error, got {err:?}");
    };
    assert!(matches!(**inner, MirrorError::SyncFailed { .. }));

    let call = &runner.calls_for("rsync")[0];
    assert!(call.include_rules.is_some());
    assert!(!Path::new(&call.args[5]).exists());
}
