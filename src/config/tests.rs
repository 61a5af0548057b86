// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::loader::ConfigLoader;
use super::paths::PathsConfig;
use super::types::{StatusConfig, ToolsConfig};
use super::Config;
use crate::error::ConfigError;
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(
        serde_json::json!({
            "global.verbose": config.global.verbose,
            "global.dry": config.global.dry,
            "global.output_log_level": config.global.output_log_level.as_u8(),
            "global.file_log_level": config.global.file_log_level.as_u8(),
            "tools.hg": config.tools.hg,
            "tools.rsync": config.tools.rsync,
        }),
        @r"
    global.dry: false
    global.file_log_level: 5
    global.output_log_level: 3
    global.verbose: false
    tools.hg: hg
    tools.rsync: rsync
    "
    );
}

#[test]
fn test_tools_default() {
    let tools = ToolsConfig::default();
    assert_eq!(tools.hg, PathBuf::from("hg"));
    assert_eq!(tools.rsync, PathBuf::from("rsync"));
}

#[test]
fn test_paths_resolve_defaults() {
    let mut paths = PathsConfig {
        destination: Some(PathBuf::from("/backup")),
        ..PathsConfig::default()
    };
    paths.resolve().expect("resolve");

    assert_eq!(paths.uncommitted_files, Some(PathBuf::from("/backup/uncommittedFiles")));
    assert_eq!(paths.uncommitted_diffs, Some(PathBuf::from("/backup/uncommittedDiffs")));
    assert_eq!(paths.unpushed_commits, Some(PathBuf::from("/backup/unpushedCommits")));
}

#[test]
fn test_paths_resolve_relative_and_absolute() {
    let mut paths = PathsConfig {
        destination: Some(PathBuf::from("/backup")),
        uncommitted_files: Some(PathBuf::from("files")),
        unpushed_commits: Some(PathBuf::from("/elsewhere/bundles")),
        ..PathsConfig::default()
    };
    paths.resolve().expect("resolve");

    assert_eq!(paths.uncommitted_files_dir().expect("files"), Path::new("/backup/files"));
    assert_eq!(
        paths.unpushed_commits_dir().expect("bundles"),
        Path::new("/elsewhere/bundles")
    );
}

#[test]
fn test_paths_missing_keys() {
    let paths = PathsConfig::default();

    let err = paths.repository().expect_err("no repository");
    let config_err = err.downcast_ref::<ConfigError>().expect("config error");
    insta::assert_snapshot!(
        config_err.to_string(),
        @"missing required config key 'repository' in section '[paths]'"
    );

    assert!(paths.destination().is_err());
    assert!(paths.uncommitted_diffs_dir().is_err());

    let mut unresolved = PathsConfig::default();
    assert!(unresolved.resolve().is_err());
}

#[test]
fn test_status_filter() {
    let status = StatusConfig {
        include_removed: true,
        include_deleted: false,
    };
    let filter = status.filter();
    assert!(filter.include_removed);
    assert!(!filter.include_deleted);
}

#[test]
fn test_config_parse() {
    let config = Config::parse(
        r#"
[global]
verbose = true
output_log_level = 4
log_file = "logs/srcbackup.log"

[paths]
repository = "/src/repo"
destination = "/backup"

[tools]
hg = "/opt/hg/bin/hg"

[status]
include_deleted = true
"#,
    )
    .expect("parse should succeed");

    assert!(config.global.verbose);
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.log_file, Some(PathBuf::from("logs/srcbackup.log")));
    assert_eq!(config.paths.repository().expect("repo"), Path::new("/src/repo"));
    assert_eq!(
        config.paths.uncommitted_files,
        Some(PathBuf::from("/backup/uncommittedFiles"))
    );
    assert_eq!(config.tools.hg, PathBuf::from("/opt/hg/bin/hg"));
    assert_eq!(config.tools.rsync, PathBuf::from("rsync"));
    assert!(config.status.include_deleted);
    assert!(config.global.run_options().verbose);
}

#[test]
fn test_config_rejects_bad_log_level() {
    assert!(Config::parse("[global]\noutput_log_level = 9").is_err());
}

#[test]
fn test_deny_unknown_fields() {
    assert!(Config::parse("[paths]\nprefix = \"/x\"").is_err());
    assert!(Config::parse("[cmake]\nhost = \"x\"").is_err());
}

#[test]
fn test_format_options() {
    let config = Config::parse(
        r#"
[global]
log_file = "srcbackup.log"

[paths]
repository = "/src/repo"
destination = "/backup"
"#,
    )
    .expect("parse");

    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    global.dry              = false
    global.file_log_level   = 5
    global.log_file         = srcbackup.log
    global.output_log_level = 3
    global.verbose          = false
    paths.destination       = /backup
    paths.repository        = /src/repo
    paths.uncommitted_diffs = /backup/uncommittedDiffs
    paths.uncommitted_files = /backup/uncommittedFiles
    paths.unpushed_commits  = /backup/unpushedCommits
    status.include_deleted  = false
    status.include_removed  = false
    tools.hg                = hg
    tools.rsync             = rsync
    ");
}

#[test]
fn test_config_loader_tracks_files() {
    let loader = ConfigLoader::new()
        .add_toml_str("[global]\ndry = true")
        .add_toml_file_optional("/nonexistent/srcbackup.toml");

    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
    assert_eq!(loader.loaded_files().len(), 1);
}

#[test]
fn test_config_loader_add_toml_file_not_found() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/path/srcbackup.toml")
        .build();
    assert!(result.is_err(), "build should fail for a missing required file");
}

#[test]
fn test_config_loader_with_env_prefix() {
    // SAFETY: the variable names are unique to this test.
    unsafe {
        std::env::set_var("SRCBACKUPUNIT_GLOBAL__DRY", "true");
        std::env::set_var("SRCBACKUPUNIT_STATUS__INCLUDE_REMOVED", "true");
        std::env::set_var("SRCBACKUPUNIT_PATHS__DESTINATION", "/env/backup");
    }

    let config = ConfigLoader::new()
        .add_toml_str("[global]\ndry = false")
        .with_env_prefix("SRCBACKUPUNIT")
        .build()
        .expect("build should succeed");

    assert!(config.global.dry, "env var should override TOML value");
    assert!(config.status.include_removed);
    assert_eq!(
        config.paths.uncommitted_diffs,
        Some(PathBuf::from("/env/backup/uncommittedDiffs"))
    );

    // SAFETY: same as above.
    unsafe {
        std::env::remove_var("SRCBACKUPUNIT_GLOBAL__DRY");
        std::env::remove_var("SRCBACKUPUNIT_STATUS__INCLUDE_REMOVED");
        std::env::remove_var("SRCBACKUPUNIT_PATHS__DESTINATION");
    }
}

#[test]
fn test_config_loader_set_override() {
    let config = ConfigLoader::new()
        .add_toml_str("[global]\ndry = false")
        .set("global.dry", true)
        .expect("set should succeed")
        .set("paths.repository", "/cli/repo")
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert!(config.global.dry, "set override should take effect");
    assert_eq!(config.paths.repository, Some(PathBuf::from("/cli/repo")));
    assert!(config.paths.destination.is_none());
}

#[test]
fn test_config_loader_layered_sources() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(
        file,
        r#"
[global]
dry = false
verbose = true

[paths]
repository = "/file/repo"
"#
    )
    .expect("failed to write");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .add_toml_str(
            r#"
[global]
dry = true

[paths]
destination = "/string/backup"
"#,
        )
        .build()
        .expect("build should succeed");

    assert!(config.global.dry, "string should override file");
    assert!(config.global.verbose, "file value should persist");
    assert_eq!(config.paths.repository, Some(PathBuf::from("/file/repo")));
    assert_eq!(config.paths.destination, Some(PathBuf::from("/string/backup")));
}

#[test]
fn test_config_loader_build_deserialization_error() {
    let result = ConfigLoader::new()
        .add_toml_str("[global]\n dry = \"not a boolean\"")
        .build();

    assert!(result.is_err(), "build should fail with type mismatch");
    let err_str = result.unwrap_err().to_string();
    assert!(
        err_str.contains("dry") || err_str.contains("invalid type"),
        "error should mention the problematic field: {err_str}"
    );
}

#[test]
fn test_config_loader_default_impl() {
    let config1 = ConfigLoader::new().build().expect("build should succeed");
    let config2 = ConfigLoader::default().build().expect("build should succeed");
    assert_eq!(config1, config2);
    assert_eq!(config1, Config::default());
}
