// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for recursive group traversal using wiremock.

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gls::client::GitLabClient;
use gls::model::{AccessLevel, Action, Target, TargetKind};
use gls::op::{OpContext, Operation, ProjectSettingOp, ProtectBranchOp};
use gls::recurse::Walker;

fn client(server: &MockServer) -> GitLabClient {
    GitLabClient::new(&server.uri(), "test-token").expect("client should build")
}

fn group_target(id: u64, path: &str) -> Target {
    Target {
        kind: TargetKind::Group,
        id,
        path: path.to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        web_url: format!("https://gitlab.example.com/groups/{path}"),
    }
}

fn subgroup(id: u64, full_path: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": full_path.rsplit('/').next().unwrap(),
        "full_path": full_path,
        "web_url": format!("https://gitlab.example.com/groups/{full_path}"),
    })
}

fn project(id: u64, path_with_namespace: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": path_with_namespace.rsplit('/').next().unwrap(),
        "path_with_namespace": path_with_namespace,
        "web_url": format!("https://gitlab.example.com/{path_with_namespace}"),
    })
}

fn protect_main() -> Operation {
    Operation::ProtectBranch(ProtectBranchOp::new(
        "main".to_string(),
        AccessLevel::Maintainer,
        AccessLevel::Maintainer,
        false,
        false,
    ))
}

/// Mocks that let protect-branch succeed on any project.
async fn mock_protect_success(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v4/projects/\d+/protected_branches/main$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/v4/projects/\d+/protected_branches$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "main"})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn walks_subgroups_depth_first_before_direct_projects() {
    let server = MockServer::start().await;
    mock_protect_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([subgroup(2, "myorg/team")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/2/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([project(10, "myorg/root-proj")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/2/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project(20, "myorg/team/api-gateway"),
            project(21, "myorg/team/web"),
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = OpContext::new(&client, false);
    let walker = Walker::new(protect_main(), None, CancellationToken::new()).unwrap();
    let outcomes = walker.walk(&ctx, &group_target(1, "myorg")).await.unwrap();

    let paths: Vec<&str> = outcomes.iter().map(|o| o.target_path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["myorg/team/api-gateway", "myorg/team/web", "myorg/root-proj"]
    );
    assert!(outcomes.iter().all(|o| o.action == Action::Applied));
}

#[tokio::test]
async fn filter_gates_projects_but_not_group_descent() {
    let server = MockServer::start().await;
    mock_protect_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([subgroup(2, "myorg/team")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/2/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([project(10, "myorg/root-proj")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/2/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project(20, "myorg/team/api-gateway"),
            project(21, "myorg/team/web"),
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = OpContext::new(&client, false);
    let walker = Walker::new(
        protect_main(),
        Some("myorg/team/api-*"),
        CancellationToken::new(),
    )
    .unwrap();
    let outcomes = walker.walk(&ctx, &group_target(1, "myorg")).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].target_path, "myorg/team/api-gateway");
}

#[tokio::test]
async fn listing_failure_is_one_error_outcome_and_siblings_continue() {
    let server = MockServer::start().await;
    mock_protect_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/subgroups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([project(10, "myorg/root-proj")])),
        )
        .mount(&server)
        .await;

    let client = client(&server).with_max_retries(0);
    let ctx = OpContext::new(&client, false);
    let walker = Walker::new(protect_main(), None, CancellationToken::new()).unwrap();
    let outcomes = walker.walk(&ctx, &group_target(1, "myorg")).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].action, Action::Error);
    assert_eq!(outcomes[0].target_kind, TargetKind::Group);
    assert!(outcomes[0].detail.contains("failed to list subgroups"));
    assert_eq!(outcomes[1].action, Action::Applied);
    assert_eq!(outcomes[1].target_path, "myorg/root-proj");
}

#[tokio::test]
async fn a_group_cycle_terminates_the_branch_with_an_error() {
    let server = MockServer::start().await;
    mock_protect_success(&server).await;

    // Group 2 lists group 1 as its own subgroup; the walk must not loop.
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([subgroup(2, "myorg/team")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/2/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([subgroup(1, "myorg")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v4/groups/\d+/projects$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = OpContext::new(&client, false);
    let walker = Walker::new(protect_main(), None, CancellationToken::new()).unwrap();
    let outcomes = walker.walk(&ctx, &group_target(1, "myorg")).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].action, Action::Error);
    assert!(outcomes[0].detail.contains("already visited"));
}

#[tokio::test]
async fn group_capable_operations_apply_to_every_group_unfiltered() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/subgroups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    // Group settings fetch for the apply itself.
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "visibility": "private"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let op = Operation::ProjectSetting(
        ProjectSettingOp::parse(&["visibility=private".to_string()]).unwrap(),
    );
    let client = client(&server);
    let ctx = OpContext::new(&client, false);
    // A filter that matches no project still lets the group apply run.
    let walker = Walker::new(op, Some("nothing/*"), CancellationToken::new()).unwrap();
    let outcomes = walker.walk(&ctx, &group_target(1, "myorg")).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].target_kind, TargetKind::Group);
    assert_eq!(outcomes[0].action, Action::AlreadySet);
}

#[tokio::test]
async fn cancellation_unwinds_the_walk() {
    let server = MockServer::start().await;

    let client = client(&server);
    let ctx = OpContext::new(&client, false);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let walker = Walker::new(protect_main(), None, cancel).unwrap();
    let result = walker.walk(&ctx, &group_target(1, "myorg")).await;
    assert!(matches!(result, Err(gls::error::GlsError::Interrupted)));
}

#[tokio::test]
async fn project_listing_follows_pagination_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-pages", "2")
                .set_body_json(json!([project(10, "myorg/one")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/groups/1/projects"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-total-pages", "2")
                .set_body_json(json!([project(11, "myorg/two")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let projects = client(&server).group_projects(1).await.unwrap();
    let paths: Vec<&str> = projects
        .iter()
        .map(|p| p.path_with_namespace.as_str())
        .collect();
    assert_eq!(paths, vec!["myorg/one", "myorg/two"]);
}
