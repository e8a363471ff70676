// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tag protection operation.
//!
//! Same delete-then-create constraint as branch protection: the API has no
//! partial update for protected tags.

use futures_util::future::BoxFuture;
use serde_json::json;

use crate::client::resolve::encode_path;
use crate::model::{AccessLevel, Action, Outcome};
use crate::op::{Applicable, OpContext, max_access_level};

/// Protect or update protection on a tag pattern.
#[derive(Debug, Clone)]
pub struct ProtectTagOp {
    tag: String,
    create: AccessLevel,
    unprotect: bool,
}

impl ProtectTagOp {
    /// Creates the operation from its parsed parameters.
    #[must_use]
    pub const fn new(tag: String, create: AccessLevel, unprotect: bool) -> Self {
        Self {
            tag,
            create,
            unprotect,
        }
    }

    fn label(&self) -> String {
        if self.unprotect {
            format!("unprotect-tag:{}", self.tag)
        } else {
            format!("protect-tag:{}", self.tag)
        }
    }

    async fn apply(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        if self.unprotect {
            return self.remove(ctx, project_id, project_path).await;
        }

        let client = ctx.client();
        let encoded = encode_path(&self.tag);
        let endpoint = format!("/projects/{project_id}/protected_tags/{encoded}");

        match client.get(&endpoint, None).await {
            Ok(existing) => {
                let current_create = max_access_level(&existing, "create_access_levels");
                if current_create == self.create.as_u64() {
                    return Outcome::project(
                        project_id,
                        project_path,
                        self.label(),
                        Action::AlreadySet,
                    )
                    .with_detail(format!("create={}", self.create.as_str()));
                }

                if !ctx.is_dry_run()
                    && let Err(e) = client.delete(&endpoint).await
                {
                    return Outcome::project(project_id, project_path, self.label(), Action::Error)
                        .with_detail(e.to_string());
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        if !ctx.is_dry_run() {
            let body = json!({
                "name": self.tag,
                "create_access_level": self.create.as_u64(),
            });
            if let Err(e) = client
                .post(&format!("/projects/{project_id}/protected_tags"), &body)
                .await
            {
                return Outcome::project(project_id, project_path, self.label(), Action::Error)
                    .with_detail(e.to_string());
            }
        }

        Outcome::project(project_id, project_path, self.label(), ctx.mutation_action())
            .with_detail(format!("create={}", self.create.as_str()))
            .with_dry_run(ctx.is_dry_run())
    }

    async fn remove(&self, ctx: &OpContext<'_>, project_id: u64, project_path: &str) -> Outcome {
        let client = ctx.client();
        let encoded = encode_path(&self.tag);
        let endpoint = format!("/projects/{project_id}/protected_tags/{encoded}");

        match client.get(&endpoint, None).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return Outcome::project(project_id, project_path, self.label(), Action::AlreadySet)
                    .with_detail("tag is not protected");
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
            .with_detail("removed tag protection")
    }
}

impl Applicable for ProtectTagOp {
    fn name(&self) -> &'static str {
        "protect-tag"
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
