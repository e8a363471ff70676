// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch protection operation.
//!
//! The API offers no partial update for protected branches, so changing an
//! existing protection is delete-then-create (two calls, one `applied`
//! outcome). Not atomic: a crash between the two calls leaves the branch
//! unprotected.

use futures_util::future::BoxFuture;
use serde_json::json;

use crate::client::resolve::encode_path;
use crate::model::{AccessLevel, Action, Outcome};
use crate::op::{Applicable, OpContext, max_access_level};

/// Protect or update protection on a branch.
#[derive(Debug, Clone)]
pub struct ProtectBranchOp {
    branch: String,
    push: AccessLevel,
    merge: AccessLevel,
    allow_force_push: bool,
    unprotect: bool,
}

impl ProtectBranchOp {
    /// Creates the operation from its parsed parameters.
    #[must_use]
    pub const fn new(
        branch: String,
        push: AccessLevel,
        merge: AccessLevel,
        allow_force_push: bool,
        unprotect: bool,
    ) -> Self {
        Self {
            branch,
            push,
            merge,
            allow_force_push,
            unprotect,
        }
    }

    fn label(&self) -> String {
        if self.unprotect {
            format!("unprotect-branch:{}", self.branch)
        } else {
            format!("protect-branch:{}", self.branch)
        }
    }

    async fn apply(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        if self.unprotect {
            return self.remove(ctx, project_id, project_path).await;
        }

        let client = ctx.client();
        let encoded = encode_path(&self.branch);
        let endpoint = format!("/projects/{project_id}/protected_branches/{encoded}");

        // Check current protection state.
        match client.get(&endpoint, None).await {
            Ok(existing) => {
                let current_push = max_access_level(&existing, "push_access_levels");
                let current_merge = max_access_level(&existing, "merge_access_levels");
                let current_force_push = existing
                    .get("allow_force_push")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false);

                if current_push == self.push.as_u64()
                    && current_merge == self.merge.as_u64()
                    && current_force_push == self.allow_force_push
                {
                    return Outcome::project(
                        project_id,
                        project_path,
                        self.label(),
                        Action::AlreadySet,
                    )
                    .with_detail(format!(
                        "push={}, merge={}",
                        self.push.as_str(),
                        self.merge.as_str()
                    ));
                }

                // Protection differs: the change is delete + recreate.
                if !ctx.is_dry_run()
                    && let Err(e) = client.delete(&endpoint).await
                {
                    return Outcome::project(project_id, project_path, self.label(), Action::Error)
                        .with_detail(e.to_string());
                }
            }
            Err(e) if e.is_not_found() => {
                // Not yet protected: plain create.
            }
            Err(e) => {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        if !ctx.is_dry_run() {
            let body = json!({
                "name": self.branch,
                "push_access_level": self.push.as_u64(),
                "merge_access_level": self.merge.as_u64(),
                "allow_force_push": self.allow_force_push,
            });
            if let Err(e) = client
                .post(&format!("/projects/{project_id}/protected_branches"), &body)
                .await
            {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        Outcome::project(project_id, project_path, self.label(), ctx.mutation_action())
            .with_detail(format!(
                "push={}, merge={}, force_push={}",
                self.push.as_str(),
                self.merge.as_str(),
                self.allow_force_push
            ))
            .with_dry_run(ctx.is_dry_run())
    }

    async fn remove(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        let client = ctx.client();
        let encoded = encode_path(&self.branch);
        let endpoint = format!("/projects/{project_id}/protected_branches/{encoded}");

        match client.get(&endpoint, None).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return Outcome::project(project_id, project_path, self.label(), Action::AlreadySet)
                    .with_detail("branch is not protected");
            }
            Err(e) => {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        if ctx.is_dry_run() {
            return Outcome::project(project_id, project_path, self.label(), Action::WouldApply)
                .with_detail("delete")
                .with_dry_run(true);
        }

        if let Err(e) = client.delete(&endpoint).await {
            return Outcome::project(project_id, project_path, self.label(), Action::Error)
                .with_detail(e.to_string());
        }

        Outcome::project(project_id, project_path, self.label(), Action::Applied)
            .with_detail("removed branch protection")
    }
}

impl Applicable for ProtectBranchOp {
    fn name(&self) -> &'static str {
        "protect-branch"
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
