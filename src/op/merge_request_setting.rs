// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge request approval settings operation.
//!
//! Two API generations cover these knobs. The modern
//! `merge_request_approval_settings` endpoint (13.x+) renamed every field
//! and flipped the polarity of most of them; the legacy `/approvals`
//! endpoint keeps the old names and takes POST rather than PUT. The
//! operation probes the modern endpoint first and falls back to legacy on
//! 404, translating field names and polarity as needed.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Action, Outcome};
use crate::op::{Applicable, OpContext};

/// Legacy field name to (modern field name, polarity inverted).
const FIELD_MAPPING: [(&str, &str, bool); 4] = [
    ("reset_approvals_on_push", "retain_approvals_on_push", true),
    (
        "disable_overriding_approvers_per_merge_request",
        "allow_overrides_to_approver_list_per_merge_request",
        true,
    ),
    (
        "merge_requests_author_approval",
        "allow_author_approval",
        false,
    ),
    (
        "merge_requests_disable_committers_approval",
        "allow_committer_approval",
        true,
    ),
];

/// Configure project merge request approval settings.
#[derive(Debug, Clone, Default)]
pub struct MergeRequestSettingOp {
    approvals_before_merge: Option<u64>,
    reset_approvals_on_push: Option<bool>,
    disable_overriding_approvers: Option<bool>,
    author_approval: Option<bool>,
    disable_committers_approval: Option<bool>,
}

impl MergeRequestSettingOp {
    /// Creates the operation from its parsed parameters.
    #[must_use]
    pub const fn new(
        approvals_before_merge: Option<u64>,
        reset_approvals_on_push: Option<bool>,
        disable_overriding_approvers: Option<bool>,
        author_approval: Option<bool>,
        disable_committers_approval: Option<bool>,
    ) -> Self {
        Self {
            approvals_before_merge,
            reset_approvals_on_push,
            disable_overriding_approvers,
            author_approval,
            disable_committers_approval,
        }
    }

    /// Desired state keyed by the legacy field names.
    fn desired(&self) -> Map<String, Value> {
        let mut desired = Map::new();
        if let Some(approvals) = self.approvals_before_merge {
            desired.insert("approvals_before_merge".to_string(), Value::from(approvals));
        }
        let flags = [
            ("reset_approvals_on_push", self.reset_approvals_on_push),
            (
                "disable_overriding_approvers_per_merge_request",
                self.disable_overriding_approvers,
            ),
            ("merge_requests_author_approval", self.author_approval),
            (
                "merge_requests_disable_committers_approval",
                self.disable_committers_approval,
            ),
        ];
        for (key, flag) in flags {
            if let Some(value) = flag {
                desired.insert(key.to_string(), Value::Bool(value));
            }
        }
        desired
    }

    async fn apply(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        let desired = self.desired();
        if desired.is_empty() {
            return Outcome::project(project_id, project_path, self.name(), Action::Skipped)
                .with_detail("No settings specified");
        }

        match self
            .try_modern_api(ctx, project_id, project_path, &desired)
            .await
        {
            Some(outcome) => outcome,
            None => {
                self.use_legacy_api(ctx, project_id, project_path, &desired)
                    .await
            }
        }
    }

    /// Tries the modern `merge_request_approval_settings` endpoint.
    ///
    /// Returns `None` when the endpoint answers 404, signalling that the
    /// instance predates it and the legacy API should be used instead.
    async fn try_modern_api(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
        project_path: &str,
        desired: &Map<String, Value>,
    ) -> Option<Outcome> {
        let endpoint = format!("/projects/{project_id}/merge_request_approval_settings");

        let current = match ctx.client().get(&endpoint, None).await {
            Ok(current) => current,
            Err(e) if e.is_not_found() => {
                debug!("modern approval settings API not available, falling back to legacy");
                return None;
            }
            Err(e) => {
                return Some(
                    Outcome::project(project_id, project_path, self.name(), Action::Error)
                        .with_detail(format!("failed to get settings: {e}")),
                );
            }
        };

        let mut changes = Map::new();
        for (legacy_key, value) in desired {
            if legacy_key == "approvals_before_merge" {
                debug!("approvals_before_merge not supported in modern API, skipping");
                continue;
            }

            match FIELD_MAPPING
                .iter()
                .find(|(legacy, _, _)| legacy == legacy_key)
            {
                Some((_, modern_key, inverted)) => {
                    let value = if *inverted {
                        Value::Bool(!value.as_bool().unwrap_or(false))
                    } else {
                        value.clone()
                    };
                    if current.get(*modern_key) != Some(&value) {
                        changes.insert((*modern_key).to_string(), value);
                    }
                }
                None => {
                    if current.get(legacy_key) != Some(value) {
                        changes.insert(legacy_key.clone(), value.clone());
                    }
                }
            }
        }

        if changes.is_empty() {
            return Some(
                Outcome::project(project_id, project_path, self.name(), Action::AlreadySet)
                    .with_detail(format!("keys: {}", key_list(desired))),
            );
        }

        let changed_keys = key_list(&changes);

        if !ctx.is_dry_run()
            && let Err(e) = ctx.client().put(&endpoint, &Value::Object(changes)).await
        {
            return Some(
                Outcome::project(project_id, project_path, self.name(), Action::Error)
                    .with_detail(format!("failed to apply: {e}")),
            );
        }

        Some(
            Outcome::project(project_id, project_path, self.name(), ctx.mutation_action())
                .with_detail(format!("changed (modern API): {changed_keys}"))
                .with_dry_run(ctx.is_dry_run()),
        )
    }

    /// Applies via the legacy `/approvals` endpoint (12.x and earlier).
    /// The legacy API mutates with POST, not PUT.
    async fn use_legacy_api(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
        project_path: &str,
        desired: &Map<String, Value>,
    ) -> Outcome {
        let endpoint = format!("/projects/{project_id}/approvals");

        let current = match ctx.client().get(&endpoint, None).await {
            Ok(current) => current,
            Err(e) => {
                return Outcome::project(project_id, project_path, self.name(), Action::Error)
                    .with_detail(format!("failed to get settings: {e}"));
            }
        };

        let changes: Map<String, Value> = desired
            .iter()
            .filter(|(key, value)| current.get(key.as_str()) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if changes.is_empty() {
            return Outcome::project(project_id, project_path, self.name(), Action::AlreadySet)
                .with_detail(format!("keys: {}", key_list(desired)));
        }

        let changed_keys = key_list(&changes);

        if !ctx.is_dry_run()
            && let Err(e) = ctx
                .client()
                .post(&endpoint, &Value::Object(changes))
                .await
        {
            return Outcome::project(project_id, project_path, self.name(), Action::Error)
                .with_detail(format!("failed to apply: {e}"));
        }

        Outcome::project(project_id, project_path, self.name(), ctx.mutation_action())
            .with_detail(format!("changed (legacy API): {changed_keys}"))
            .with_dry_run(ctx.is_dry_run())
    }
}

fn key_list(map: &Map<String, Value>) -> String {
    map.keys().cloned().collect::<Vec<_>>().join(", ")
}

/// Translates a legacy field to its modern counterpart, flipping polarity
/// where the two APIs disagree on what `true` means.
#[cfg(test)]
pub(crate) fn to_modern_field(legacy_key: &str, value: bool) -> Option<(&'static str, bool)> {
    FIELD_MAPPING
        .iter()
        .find(|(legacy, _, _)| *legacy == legacy_key)
        .map(|(_, modern, inverted)| (*modern, if *inverted { !value } else { value }))
}

impl Applicable for MergeRequestSettingOp {
    fn name(&self) -> &'static str {
        "merge-request-setting"
    }

    fn apply_to_project<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        project_id: u64,
        project_path: &'a str,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(self.apply(ctx, project_id, project_path))
    }
}
