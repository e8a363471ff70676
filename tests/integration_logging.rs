// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration test for the logging setup.
//!
//! Lives in its own binary because `init_logging` installs the global
//! subscriber and can only run once per process.

use gls::logging::{LogConfig, init_logging};
use tempfile::TempDir;

#[test]
fn log_file_captures_debug_output() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let log_path = dir.path().join("logs").join("gls.log");

    let config = LogConfig::new(false, Some(log_path.clone()));
    let guard = init_logging(&config).expect("logging should initialize");

    tracing::info!("visible everywhere");
    tracing::debug!("file only");

    // Drop flushes the non-blocking writer.
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).expect("log file should exist");
    assert!(contents.contains("visible everywhere"));
    assert!(contents.contains("file only"));
}
