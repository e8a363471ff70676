// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the generic setting and merge request setting commands.

use clap::Args;

use crate::error::ConfigError;
use crate::op::{MergeRequestSettingOp, ProjectSettingOp};

/// Arguments for `project-setting`.
#[derive(Debug, Clone, Args)]
pub struct ProjectSettingArgs {
    /// GitLab URL of the target project or group.
    pub target_url: String,

    /// Setting to apply (repeatable).
    /// Example: --setting visibility=private
    #[arg(long = "setting", value_name = "KEY=VALUE", required = true)]
    pub settings: Vec<String>,
}

impl ProjectSettingArgs {
    /// Builds the operation described by these arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed pair.
    pub fn to_operation(&self) -> Result<ProjectSettingOp, ConfigError> {
        ProjectSettingOp::parse(&self.settings)
    }
}

/// Arguments for `merge-request-setting`.
///
/// Every flag is optional; the flag names match the legacy API fields and
/// are translated for the modern endpoint by the operation itself.
#[derive(Debug, Clone, Args)]
pub struct MergeRequestSettingArgs {
    /// GitLab URL of the target project or group.
    pub target_url: String,

    /// Required approvals before merge (deprecated in newer GitLab).
    #[arg(long = "approvals-before-merge", value_name = "N")]
    pub approvals_before_merge: Option<u64>,

    /// Reset approvals when new commits are pushed.
    #[arg(long = "reset-approvals-on-push", value_name = "BOOL")]
    pub reset_approvals_on_push: Option<bool>,

    /// Prevent users from modifying approvers per MR.
    #[arg(long = "disable-overriding-approvers", value_name = "BOOL")]
    pub disable_overriding_approvers: Option<bool>,

    /// Allow MR author to approve their own MR.
    #[arg(long = "merge-requests-author-approval", value_name = "BOOL")]
    pub author_approval: Option<bool>,

    /// Prevent committers from approving MRs they committed to.
    #[arg(long = "merge-requests-disable-committers-approval", value_name = "BOOL")]
    pub disable_committers_approval: Option<bool>,
}

impl MergeRequestSettingArgs {
    /// Builds the operation described by these arguments.
    #[must_use]
    pub fn to_operation(&self) -> MergeRequestSettingOp {
        MergeRequestSettingOp::new(
            self.approvals_before_merge,
            self.reset_approvals_on_push,
            self.disable_overriding_approvers,
            self.author_approval,
            self.disable_committers_approval,
        )
    }
}
