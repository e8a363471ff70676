// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive group traversal.
//!
//! ```text
//! Target (project) --> filter? --> apply_to_project --> [Outcome]
//!
//! Target (group)
//!    |-- apply_to_group (when the operation supports it, unfiltered)
//!    |-- subgroups, depth-first (always traversed, never filtered)
//!    `-- direct projects, filter applied per project
//! ```
//!
//! The filter is a glob over the full namespace path and gates which
//! projects receive the operation; groups are always descended into so a
//! pattern like `team/tools/*` can reach projects deep in the tree.
//!
//! Per-node failures (a project listing that errors, a cycle in the group
//! graph) become `error` outcomes and the walk continues with siblings.
//! Only cancellation stops the walk early.

use std::collections::BTreeSet;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wax::{Glob, Program};

use crate::error::{ConfigError, GlsError, GlsResult};
use crate::model::{Action, Outcome, Target, TargetKind};
use crate::op::{Applicable, OpContext, Operation};

/// Walks a resolved target tree and applies one operation to every node.
pub struct Walker {
    operation: Operation,
    filter: Option<Glob<'static>>,
    cancel: CancellationToken,
}

impl Walker {
    /// Creates a walker for `operation`, optionally gated by a project
    /// path glob.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFilter`] when the pattern does not
    /// compile.
    pub fn new(
        operation: Operation,
        filter: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<Self, ConfigError> {
        let filter = filter
            .map(|pattern| {
                Glob::new(pattern)
                    .map(Glob::into_owned)
                    .map_err(|e| ConfigError::InvalidFilter {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;
        Ok(Self {
            operation,
            filter,
            cancel,
        })
    }

    /// Applies the operation across the tree rooted at `target`,
    /// collecting one outcome per visited node.
    ///
    /// # Errors
    ///
    /// Returns [`GlsError::Interrupted`] when cancellation fires between
    /// nodes; outcomes gathered so far are discarded with it.
    pub async fn walk(&self, ctx: &OpContext<'_>, target: &Target) -> GlsResult<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        let mut visited = BTreeSet::new();

        match target.kind {
            TargetKind::Project => {
                if self.matches_filter(&target.path) {
                    outcomes.push(
                        self.operation
                            .apply_to_project(ctx, target.id, &target.path)
                            .await,
                    );
                } else {
                    debug!(project = %target.path, "skipping project (filter)");
                }
            }
            TargetKind::Group => {
                self.visit_group(ctx, target.id, &target.path, &mut visited, &mut outcomes)
                    .await?;
            }
        }

        Ok(outcomes)
    }

    fn visit_group<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        group_id: u64,
        group_path: &'a str,
        visited: &'a mut BTreeSet<u64>,
        outcomes: &'a mut Vec<Outcome>,
    ) -> BoxFuture<'a, GlsResult<()>> {
        Box::pin(async move {
            if self.cancel.is_cancelled() {
                return Err(GlsError::Interrupted);
            }

            // Shared runners can present the same subgroup twice; a repeat
            // visit would loop forever.
            if !visited.insert(group_id) {
                outcomes.push(
                    Outcome::group(group_id, group_path, self.operation.name(), Action::Error)
                        .with_detail("group already visited, terminating branch"),
                );
                return Ok(());
            }

            if self.operation.applies_to_group()
                && let Some(outcome) = self.operation.apply_to_group(ctx, group_id, group_path).await
            {
                outcomes.push(outcome);
            }

            // Subgroups first, depth-first; groups are never filtered.
            match ctx.client().subgroups(group_id).await {
                Ok(subgroups) => {
                    for subgroup in subgroups {
                        self.visit_group(
                            ctx,
                            subgroup.id,
                            &subgroup.full_path,
                            visited,
                            outcomes,
                        )
                        .await?;
                    }
                }
                Err(e) => {
                    outcomes.push(
                        Outcome::group(group_id, group_path, self.operation.name(), Action::Error)
                            .with_detail(format!("failed to list subgroups: {e}")),
                    );
                }
            }

            match ctx.client().group_projects(group_id).await {
                Ok(projects) => {
                    for project in projects {
                        if self.cancel.is_cancelled() {
                            return Err(GlsError::Interrupted);
                        }
                        if !self.matches_filter(&project.path_with_namespace) {
                            debug!(project = %project.path_with_namespace, "skipping project (filter)");
                            continue;
                        }
                        outcomes.push(
                            self.operation
                                .apply_to_project(ctx, project.id, &project.path_with_namespace)
                                .await,
                        );
                    }
                }
                Err(e) => {
                    outcomes.push(
                        Outcome::group(group_id, group_path, self.operation.name(), Action::Error)
                            .with_detail(format!("failed to list projects: {e}")),
                    );
                }
            }

            Ok(())
        })
    }

    /// Whether a project path passes the filter. No filter means all
    /// projects pass.
    fn matches_filter(&self, path: &str) -> bool {
        self.filter.as_ref().is_none_or(|glob| glob.is_match(path))
    }
}
