// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for dry-run purity using wiremock.
//!
//! Under `--dry-run` the operations still read current state, but every
//! mutating verb is suppressed. The mocks pin that with `expect(0)`.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gls::client::GitLabClient;
use gls::model::{AccessLevel, Action};
use gls::op::{Applicable, ApprovalRuleOp, OpContext, ProjectSettingOp, ProtectBranchOp};

fn client(server: &MockServer) -> GitLabClient {
    GitLabClient::new(&server.uri(), "test-token").expect("client should build")
}

async fn forbid_mutations(server: &MockServer) {
    for verb in ["POST", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn dry_run_protect_branch_reports_would_apply() {
    let server = MockServer::start().await;
    forbid_mutations(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/protected_branches/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "main",
            "push_access_levels": [{"access_level": 0}],
            "merge_access_levels": [{"access_level": 0}],
            "allow_force_push": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let op = ProtectBranchOp::new(
        "main".to_string(),
        AccessLevel::Maintainer,
        AccessLevel::Maintainer,
        false,
        false,
    );
    let client = client(&server);
    let ctx = OpContext::new(&client, true);
    let outcome = op.apply_to_project(&ctx, 42, "myorg/api").await;
    assert_eq!(outcome.action, Action::WouldApply);
    assert!(outcome.dry_run);
}

#[tokio::test]
async fn dry_run_unprotect_reports_would_apply() {
    let server = MockServer::start().await;
    forbid_mutations(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/protected_branches/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "main",
            "push_access_levels": [{"access_level": 40}],
        })))
        .mount(&server)
        .await;

    let op = ProtectBranchOp::new(
        "main".to_string(),
        AccessLevel::Maintainer,
        AccessLevel::Maintainer,
        false,
        true,
    );
    let client = client(&server);
    let ctx = OpContext::new(&client, true);
    let outcome = op.apply_to_project(&ctx, 42, "myorg/api").await;
    assert_eq!(outcome.action, Action::WouldApply);
    assert_eq!(outcome.detail, "delete");
    assert!(outcome.dry_run);
}

#[tokio::test]
async fn dry_run_setting_diff_still_reads_current_state() {
    let server = MockServer::start().await;
    forbid_mutations(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 42, "visibility": "public"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let op = ProjectSettingOp::parse(&["visibility=private".to_string()]).unwrap();
    let client = client(&server);
    let ctx = OpContext::new(&client, true);
    let outcome = op.apply_to_project(&ctx, 42, "myorg/api").await;
    assert_eq!(outcome.action, Action::WouldApply);
    assert_eq!(outcome.detail, "changed: visibility");
}

#[tokio::test]
async fn dry_run_already_set_is_not_marked_dry() {
    let server = MockServer::start().await;
    forbid_mutations(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 42, "visibility": "private"})),
        )
        .mount(&server)
        .await;

    let op = ProjectSettingOp::parse(&["visibility=private".to_string()]).unwrap();
    let client = client(&server);
    let ctx = OpContext::new(&client, true);
    let outcome = op.apply_to_project(&ctx, 42, "myorg/api").await;
    assert_eq!(outcome.action, Action::AlreadySet);
    assert!(!outcome.dry_run);
}

#[tokio::test]
async fn dry_run_approval_rule_create_skips_the_post() {
    let server = MockServer::start().await;
    forbid_mutations(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/approval_rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let op = ApprovalRuleOp::new("security".to_string(), Some(2), vec![], vec![], false);
    let client = client(&server);
    let ctx = OpContext::new(&client, true);
    let outcome = op.apply_to_project(&ctx, 42, "myorg/api").await;
    assert_eq!(outcome.action, Action::WouldApply);
    assert!(outcome.dry_run);
}
