// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use super::exponential_backoff;
use super::resolve::{encode_path, extract_path};

#[test]
fn test_extract_path_full_url() {
    assert_eq!(
        extract_path("https://gitlab.com/myorg/myteam/myproject"),
        "myorg/myteam/myproject"
    );
}

#[test]
fn test_extract_path_trailing_slash() {
    assert_eq!(extract_path("https://gitlab.com/myorg/proj/"), "myorg/proj");
}

#[test]
fn test_extract_path_settings_subpath() {
    assert_eq!(
        extract_path("https://gitlab.com/myorg/proj/-/settings/repository"),
        "myorg/proj"
    );
    assert_eq!(extract_path("https://gitlab.com/myorg/proj/-"), "myorg/proj");
}

#[test]
fn test_extract_path_git_suffix() {
    assert_eq!(
        extract_path("https://gitlab.com/myorg/proj.git"),
        "myorg/proj"
    );
}

#[test]
fn test_extract_path_bare() {
    assert_eq!(extract_path("myorg/myteam/myproject"), "myorg/myteam/myproject");
    assert_eq!(extract_path("/myorg/proj/"), "myorg/proj");
}

#[test]
fn test_extract_path_custom_host_and_port() {
    assert_eq!(
        extract_path("http://gitlab.example.com:8080/org/proj"),
        "org/proj"
    );
}

#[test]
fn test_encode_path_escapes_slashes() {
    assert_eq!(encode_path("myorg/my-project"), "myorg%2Fmy-project");
    assert_eq!(encode_path("a/b/c"), "a%2Fb%2Fc");
    assert_eq!(encode_path("org/sub.group"), "org%2Fsub.group");
}

#[test]
fn test_exponential_backoff_doubles() {
    assert_eq!(exponential_backoff(0), Duration::from_millis(500));
    assert_eq!(exponential_backoff(1), Duration::from_millis(1000));
    assert_eq!(exponential_backoff(2), Duration::from_millis(2000));
    assert_eq!(exponential_backoff(3), Duration::from_millis(4000));
}
