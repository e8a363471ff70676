// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings operations.
//!
//! # Architecture
//!
//! ```text
//! Operation enum ----> OpContext (client, dry-run flag)
//!      |
//!      v
//!  Applicable trait
//!   apply_to_project / apply_to_group
//!      |
//!      v
//!  fetch current --> diff --> mutate-or-skip --> Outcome
//! ```
//!
//! Operation variants: `ProtectBranch`, `ProtectTag`, `ProjectSetting`,
//! `ApprovalRule`, `MergeRequestSetting`.
//!
//! # The Applicable Pattern
//!
//! All operations implement the [`Applicable`] trait:
//!
//! - [`Applicable::name()`] - operation name as used on the command line
//! - [`Applicable::applies_to_group()`] - whether the operation has meaning
//!   on a group entity itself (default: `false`)
//! - [`Applicable::apply_to_project()`] - the idempotent mutation contract
//! - [`Applicable::apply_to_group()`] - group-level counterpart
//!
//! The [`Operation`] enum implements `Applicable` via the
//! `impl_applicable_for_operation!` macro, which generates a match arm per
//! variant delegating to the inner type. Compile-time dispatch, explicit
//! table, no runtime registration.
//!
//! Every apply returns a completed [`Outcome`]; transport failures are
//! converted to `error` outcomes at this boundary and never propagate to
//! the traversal.

pub mod approval_rule;
pub mod merge_request_setting;
pub mod project_setting;
pub mod protect_branch;
pub mod protect_tag;

#[cfg(test)]
mod tests;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::client::GitLabClient;
use crate::model::{Action, Outcome};

pub use approval_rule::ApprovalRuleOp;
pub use merge_request_setting::MergeRequestSettingOp;
pub use project_setting::ProjectSettingOp;
pub use protect_branch::ProtectBranchOp;
pub use protect_tag::ProtectTagOp;

/// Context provided to operations during application.
pub struct OpContext<'a> {
    client: &'a GitLabClient,
    dry_run: bool,
}

impl<'a> OpContext<'a> {
    /// Creates a new `OpContext`.
    #[must_use]
    pub const fn new(client: &'a GitLabClient, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// The shared transport.
    #[must_use]
    pub const fn client(&self) -> &'a GitLabClient {
        self.client
    }

    /// Whether mutations are suppressed.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// The action to report for a mutation under the current mode.
    #[must_use]
    pub const fn mutation_action(&self) -> Action {
        if self.dry_run {
            Action::WouldApply
        } else {
            Action::Applied
        }
    }
}

/// Trait for settings operations.
///
/// Methods return `BoxFuture` to keep the trait object-safe-free dispatch
/// simple across the enum delegation macro.
pub trait Applicable {
    /// Operation name as used on the command line.
    fn name(&self) -> &'static str;

    /// Whether this operation can be applied to a group entity itself
    /// (as opposed to only its member projects).
    fn applies_to_group(&self) -> bool {
        false
    }

    /// Applies the operation to a single project.
    ///
    /// Always resolves to a completed [`Outcome`]; per-target failures are
    /// reported with [`Action::Error`], never raised.
    fn apply_to_project<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        project_id: u64,
        project_path: &'a str,
    ) -> BoxFuture<'a, Outcome>;

    /// Applies the operation at the group level.
    ///
    /// Only meaningful when [`Applicable::applies_to_group()`] is true;
    /// the default does nothing.
    fn apply_to_group<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        group_id: u64,
        group_path: &'a str,
    ) -> BoxFuture<'a, Option<Outcome>> {
        let _ = (ctx, group_id, group_path);
        Box::pin(async { None })
    }
}

/// A settings operation.
///
/// New operations are added as variants and listed in the
/// `impl_applicable_for_operation!` invocation below.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Protect or update protection on a branch.
    ProtectBranch(ProtectBranchOp),
    /// Protect or update protection on a tag pattern.
    ProtectTag(ProtectTagOp),
    /// Set project or group settings via key=value pairs.
    ProjectSetting(ProjectSettingOp),
    /// Manage project-level merge request approval rules.
    ApprovalRule(ApprovalRuleOp),
    /// Configure project merge request approval settings.
    MergeRequestSetting(MergeRequestSettingOp),
}

/// Macro to implement Applicable for the Operation enum by delegating to
/// the inner types.
macro_rules! impl_applicable_for_operation {
    ($($variant:ident),+ $(,)?) => {
        impl Applicable for Operation {
            fn name(&self) -> &'static str {
                match self {
                    $(Operation::$variant(op) => Applicable::name(op),)+
                }
            }

            fn applies_to_group(&self) -> bool {
                match self {
                    $(Operation::$variant(op) => Applicable::applies_to_group(op),)+
                }
            }

            fn apply_to_project<'a>(
                &'a self,
                ctx: &'a OpContext<'_>,
                project_id: u64,
                project_path: &'a str,
            ) -> BoxFuture<'a, Outcome> {
                match self {
                    $(Operation::$variant(op) => {
                        Applicable::apply_to_project(op, ctx, project_id, project_path)
                    })+
                }
            }

            fn apply_to_group<'a>(
                &'a self,
                ctx: &'a OpContext<'_>,
                group_id: u64,
                group_path: &'a str,
            ) -> BoxFuture<'a, Option<Outcome>> {
                match self {
                    $(Operation::$variant(op) => {
                        Applicable::apply_to_group(op, ctx, group_id, group_path)
                    })+
                }
            }
        }
    };
}

impl_applicable_for_operation!(
    ProtectBranch,
    ProtectTag,
    ProjectSetting,
    ApprovalRule,
    MergeRequestSetting,
);

/// Effective access level from a GitLab `*_access_levels` array: the
/// maximum of the entries, 0 when the array is absent or empty.
#[must_use]
pub(crate) fn max_access_level(state: &Value, key: &str) -> u64 {
    state
        .get(key)
        .and_then(Value::as_array)
        .map(|levels| {
            levels
                .iter()
                .filter_map(|al| al.get("access_level").and_then(Value::as_u64))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}
