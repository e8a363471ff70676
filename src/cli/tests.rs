// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Cli, Command, parse_from};
use crate::model::AccessLevel;
use clap::CommandFactory;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn parse_protect_branch_with_defaults() {
    let cli = parse_from([
        "gls",
        "protect-branch",
        "https://gitlab.com/myorg/api",
        "--branch",
        "main",
    ]);
    let Command::ProtectBranch(args) = &cli.command else {
        panic!("expected protect-branch");
    };
    assert_eq!(args.target_url, "https://gitlab.com/myorg/api");
    assert_eq!(args.branch, "main");
    assert_eq!(args.push, AccessLevel::Maintainer);
    assert_eq!(args.merge, AccessLevel::Maintainer);
    assert!(!args.allow_force_push);
    assert!(!args.unprotect);
}

#[test]
fn parse_protect_tag_access_level() {
    let cli = parse_from([
        "gls",
        "protect-tag",
        "https://gitlab.com/myorg",
        "--tag",
        "v1.2.*",
        "--create",
        "no-access",
    ]);
    let Command::ProtectTag(args) = &cli.command else {
        panic!("expected protect-tag");
    };
    assert_eq!(args.create, AccessLevel::NoAccess);
}

#[test]
fn parse_repeatable_settings() {
    let cli = parse_from([
        "gls",
        "project-setting",
        "https://gitlab.com/myorg",
        "--setting",
        "visibility=private",
        "--setting",
        "auto_devops_enabled=false",
    ]);
    let Command::ProjectSetting(args) = &cli.command else {
        panic!("expected project-setting");
    };
    assert_eq!(args.settings.len(), 2);
    assert!(args.to_operation().is_ok());
}

#[test]
fn parse_approval_rule_users() {
    let cli = parse_from([
        "gls",
        "approval-rule",
        "https://gitlab.com/myorg/api",
        "--rule-name",
        "security",
        "--approvals",
        "2",
        "--add-user",
        "alice",
        "--add-user",
        "1042",
        "--remove-user",
        "bob",
    ]);
    let Command::ApprovalRule(args) = &cli.command else {
        panic!("expected approval-rule");
    };
    assert_eq!(args.approvals, Some(2));
    assert_eq!(args.add_users, vec!["alice", "1042"]);
    assert_eq!(args.remove_users, vec!["bob"]);
}

#[test]
fn parse_merge_request_setting_booleans() {
    let cli = parse_from([
        "gls",
        "merge-request-setting",
        "https://gitlab.com/myorg/api",
        "--reset-approvals-on-push",
        "true",
        "--merge-requests-author-approval",
        "false",
    ]);
    let Command::MergeRequestSetting(args) = &cli.command else {
        panic!("expected merge-request-setting");
    };
    assert_eq!(args.reset_approvals_on_push, Some(true));
    assert_eq!(args.author_approval, Some(false));
    assert_eq!(args.approvals_before_merge, None);
}

#[test]
fn parse_global_options() {
    let cli = parse_from([
        "gls",
        "--dry-run",
        "--json",
        "--max-retries",
        "5",
        "--filter",
        "myorg/team-*/*",
        "protect-branch",
        "https://gitlab.com/myorg",
        "--branch",
        "main",
    ]);
    assert!(cli.global.dry_run);
    assert!(cli.global.json);
    assert_eq!(cli.global.max_retries, 5);
    assert_eq!(cli.global.filter.as_deref(), Some("myorg/team-*/*"));
}

#[test]
fn global_url_defaults_to_public_instance() {
    let cli = parse_from([
        "gls",
        "protect-branch",
        "https://gitlab.com/myorg",
        "--branch",
        "main",
    ]);
    if std::env::var_os("GITLAB_URL").is_none() {
        assert_eq!(cli.global.effective_gitlab_url(), "https://gitlab.com");
    }
}
