// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the branch and tag protection commands.

use clap::Args;

use crate::model::AccessLevel;
use crate::op::{ProtectBranchOp, ProtectTagOp};

/// Arguments for `protect-branch`.
#[derive(Debug, Clone, Args)]
pub struct ProtectBranchArgs {
    /// GitLab URL of the target project or group.
    pub target_url: String,

    /// Branch name or wildcard pattern (e.g., 'release/1.2', 'release/*').
    #[arg(long)]
    pub branch: String,

    /// Allowed to push.
    #[arg(long, value_enum, default_value_t = AccessLevel::Maintainer)]
    pub push: AccessLevel,

    /// Allowed to merge.
    #[arg(long, value_enum, default_value_t = AccessLevel::Maintainer)]
    pub merge: AccessLevel,

    /// Allow force push to the branch.
    #[arg(long = "allow-force-push")]
    pub allow_force_push: bool,

    /// Remove protection instead of applying it.
    #[arg(long)]
    pub unprotect: bool,
}

impl ProtectBranchArgs {
    /// Builds the operation described by these arguments.
    #[must_use]
    pub fn to_operation(&self) -> ProtectBranchOp {
        ProtectBranchOp::new(
            self.branch.clone(),
            self.push,
            self.merge,
            self.allow_force_push,
            self.unprotect,
        )
    }
}

/// Arguments for `protect-tag`.
#[derive(Debug, Clone, Args)]
pub struct ProtectTagArgs {
    /// GitLab URL of the target project or group.
    pub target_url: String,

    /// Tag name or wildcard pattern (e.g., 'v1.2.*', 'release-*').
    #[arg(long)]
    pub tag: String,

    /// Allowed to create.
    #[arg(long, value_enum, default_value_t = AccessLevel::Maintainer)]
    pub create: AccessLevel,

    /// Remove tag protection instead of applying it.
    #[arg(long)]
    pub unprotect: bool,
}

impl ProtectTagArgs {
    /// Builds the operation described by these arguments.
    #[must_use]
    pub fn to_operation(&self) -> ProtectTagOp {
        ProtectTagOp::new(self.tag.clone(), self.create, self.unprotect)
    }
}
