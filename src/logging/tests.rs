// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel, open_log_file};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_verbosity_raises_to_debug() {
    let levels = vec![
        ("info_quiet", LogLevel::INFO.with_verbosity(false).as_u8()),
        ("info_verbose", LogLevel::INFO.with_verbosity(true).as_u8()),
        ("trace_verbose", LogLevel::TRACE.with_verbosity(true).as_u8()),
        ("silent_verbose", LogLevel::SILENT.with_verbosity(true).as_u8()),
    ];
    insta::assert_debug_snapshot!(levels, @r#"
    [
        (
            "info_quiet",
            3,
        ),
        (
            "info_verbose",
            4,
        ),
        (
            "trace_verbose",
            5,
        ),
        (
            "silent_verbose",
            4,
        ),
    ]
    "#);
}

#[test]
fn test_filter_strings() {
    let filters: Vec<&str> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    assert_eq!(
        filters,
        ["off", "error", "warn", "info", "debug", "trace", "trace"]
    );
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
}

#[test]
fn test_log_level_deserialize() {
    let level: LogLevel = serde_json::from_str("4").expect("in range");
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&LogLevel::WARN).expect("serialize"), "2");

    let err = serde_json::from_str::<LogLevel>("9").expect_err("out of range");
    assert!(err.to_string().contains("log level must be 0-6, got 9"), "{err}");
}

#[test]
fn test_log_file_appends_and_creates_parents() {
    use std::io::Write as _;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logs/nightly/srcbackup.log");

    writeln!(open_log_file(&path).expect("first open"), "run 1").expect("write");
    writeln!(open_log_file(&path).expect("second open"), "run 2").expect("write");

    assert_eq!(std::fs::read_to_string(&path).expect("read"), "run 1\nrun 2\n");
}
