// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge request approval rule operation.
//!
//! Rules are identified by name within a project's rule list, not by a
//! stable ID. User references accept a username or numeric ID and are
//! resolved to numeric IDs before comparison, since the remote state stores
//! IDs. Comparison is on approvals-required plus the approver-ID set
//! (order-insensitive).

use std::collections::BTreeSet;

use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tracing::warn;

use crate::model::{Action, Outcome};
use crate::op::{Applicable, OpContext};

/// Manage project-level merge request approval rules.
#[derive(Debug, Clone)]
pub struct ApprovalRuleOp {
    rule_name: String,
    approvals: Option<u64>,
    add_users: Vec<String>,
    remove_users: Vec<String>,
    unprotect: bool,
}

impl ApprovalRuleOp {
    /// Creates the operation from its parsed parameters.
    #[must_use]
    pub const fn new(
        rule_name: String,
        approvals: Option<u64>,
        add_users: Vec<String>,
        remove_users: Vec<String>,
        unprotect: bool,
    ) -> Self {
        Self {
            rule_name,
            approvals,
            add_users,
            remove_users,
            unprotect,
        }
    }

    fn label(&self) -> String {
        format!("approval-rule:{}", self.rule_name)
    }

    /// Finds the rule matching the configured name, if any.
    async fn find_rule(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
    ) -> Result<Option<Value>, crate::error::TransportError> {
        let rules = ctx
            .client()
            .paginate(&format!("/projects/{project_id}/approval_rules"), None)
            .await?;
        Ok(rules
            .into_iter()
            .find(|rule| rule.get("name").and_then(Value::as_str) == Some(&self.rule_name)))
    }

    /// Resolves usernames/IDs to numeric IDs; unresolvable users are
    /// skipped with a warning.
    async fn resolve_users(&self, ctx: &OpContext<'_>, identifiers: &[String]) -> BTreeSet<u64> {
        let mut ids = BTreeSet::new();
        for identifier in identifiers {
            match ctx.client().resolve_user(identifier).await {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => warn!(user = %identifier, error = %e, "could not resolve user"),
            }
        }
        ids
    }

    async fn apply(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        if self.unprotect {
            return self.delete_rule(ctx, project_id, project_path).await;
        }

        let existing = match self.find_rule(ctx, project_id).await {
            Ok(existing) => existing,
            Err(e) => {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        };

        match existing {
            Some(rule) => self.update_rule(ctx, project_id, project_path, &rule).await,
            None => self.create_rule(ctx, project_id, project_path).await,
        }
    }

    async fn create_rule(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
        project_path: &str,
    ) -> Outcome {
        let Some(approvals) = self.approvals else {
            return Outcome::project(project_id, project_path, self.label(), Action::Error)
                .with_detail("--approvals is required when creating a new rule");
        };

        let user_ids = self.resolve_users(ctx, &self.add_users).await;

        if !ctx.is_dry_run() {
            let body = json!({
                "name": self.rule_name,
                "approvals_required": approvals,
                "user_ids": user_ids.iter().copied().collect::<Vec<_>>(),
            });
            if let Err(e) = ctx
                .client()
                .post(&format!("/projects/{project_id}/approval_rules"), &body)
                .await
            {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        Outcome::project(project_id, project_path, self.label(), ctx.mutation_action())
            .with_detail(format!(
                "created with {approvals} approvals, {} users",
                user_ids.len()
            ))
            .with_dry_run(ctx.is_dry_run())
    }

    async fn update_rule(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
        project_path: &str,
        existing: &Value,
    ) -> Outcome {
        let rule_id = existing.get("id").and_then(Value::as_u64).unwrap_or(0);
        let current_approvals = existing
            .get("approvals_required")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let current_user_ids: BTreeSet<u64> = existing
            .get("users")
            .and_then(Value::as_array)
            .map(|users| {
                users
                    .iter()
                    .filter_map(|user| user.get("id").and_then(Value::as_u64))
                    .collect()
            })
            .unwrap_or_default();

        let desired_approvals = self.approvals.unwrap_or(current_approvals);
        let add_ids = self.resolve_users(ctx, &self.add_users).await;
        let remove_ids = self.resolve_users(ctx, &self.remove_users).await;
        let desired_user_ids: BTreeSet<u64> = current_user_ids
            .union(&add_ids)
            .copied()
            .collect::<BTreeSet<_>>()
            .difference(&remove_ids)
            .copied()
            .collect();

        if current_approvals == desired_approvals && current_user_ids == desired_user_ids {
            return Outcome::project(project_id, project_path, self.label(), Action::AlreadySet)
                .with_detail(format!(
                    "approvals={current_approvals}, users={}",
                    current_user_ids.len()
                ));
        }

        if !ctx.is_dry_run() {
            let body = json!({
                "approvals_required": desired_approvals,
                "user_ids": desired_user_ids.iter().copied().collect::<Vec<_>>(),
            });
            if let Err(e) = ctx
                .client()
                .put(
                    &format!("/projects/{project_id}/approval_rules/{rule_id}"),
                    &body,
                )
                .await
            {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        let mut changes = Vec::new();
        if current_approvals != desired_approvals {
            changes.push(format!("approvals: {current_approvals} -> {desired_approvals}"));
        }
        if current_user_ids != desired_user_ids {
            changes.push(format!(
                "users: {} -> {}",
                current_user_ids.len(),
                desired_user_ids.len()
            ));
        }

        Outcome::project(project_id, project_path, self.label(), ctx.mutation_action())
            .with_detail(changes.join("; "))
            .with_dry_run(ctx.is_dry_run())
    }

    async fn delete_rule(
        &self,
        ctx: &OpContext<'_>,
        project_id: u64,
        project_path: &str,
    ) -> Outcome {
        let existing = match self.find_rule(ctx, project_id).await {
            Ok(existing) => existing,
            Err(e) => {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        };

        let Some(rule) = existing else {
            return Outcome::project(project_id, project_path, self.label(), Action::AlreadySet)
                .with_detail("rule does not exist");
        };

        if !ctx.is_dry_run() {
            let rule_id = rule.get("id").and_then(Value::as_u64).unwrap_or(0);
            if let Err(e) = ctx
                .client()
                .delete(&format!("/projects/{project_id}/approval_rules/{rule_id}"))
                .await
            {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        Outcome::project(project_id, project_path, self.label(), ctx.mutation_action())
            .with_detail("deleted approval rule")
            .with_dry_run(ctx.is_dry_run())
    }
}

impl Applicable for ApprovalRuleOp {
    fn name(&self) -> &'static str {
        "approval-rule"
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
