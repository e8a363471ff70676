// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the approval rule command.

use clap::Args;

use crate::op::ApprovalRuleOp;

/// Arguments for `approval-rule`.
#[derive(Debug, Clone, Args)]
pub struct ApprovalRuleArgs {
    /// GitLab URL of the target project or group.
    pub target_url: String,

    /// Name of the approval rule (used to find/create).
    #[arg(long = "rule-name")]
    pub rule_name: String,

    /// Required number of approvals.
    #[arg(long, value_name = "N")]
    pub approvals: Option<u64>,

    /// Add user (username or ID, repeatable).
    #[arg(long = "add-user", value_name = "USER")]
    pub add_users: Vec<String>,

    /// Remove user (username or ID, repeatable).
    #[arg(long = "remove-user", value_name = "USER")]
    pub remove_users: Vec<String>,

    /// Delete the approval rule.
    #[arg(long)]
    pub unprotect: bool,
}

impl ApprovalRuleArgs {
    /// Builds the operation described by these arguments.
    #[must_use]
    pub fn to_operation(&self) -> ApprovalRuleOp {
        ApprovalRuleOp::new(
            self.rule_name.clone(),
            self.approvals,
            self.add_users.clone(),
            self.remove_users.clone(),
            self.unprotect,
        )
    }
}
