// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gls using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gls [global options] <command> <target-url> [command options]
//! protect-branch --branch B [--push L] [--merge L] [--allow-force-push] [--unprotect]
//! protect-tag --tag T [--create L] [--unprotect]
//! project-setting --setting KEY=VALUE...
//! approval-rule --rule-name N [--approvals K] [--add-user U]... [--remove-user U]... [--unprotect]
//! merge-request-setting [--approvals-before-merge K] [--reset-approvals-on-push BOOL] ...
//! ```

pub mod approval;
pub mod global;
pub mod protect;
pub mod setting;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::approval::ApprovalRuleArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::protect::{ProtectBranchArgs, ProtectTagArgs};
use crate::cli::setting::{MergeRequestSettingArgs, ProjectSettingArgs};
use crate::error::ConfigError;
use crate::op::Operation;

/// GitLab Settings Applier
///
/// Applies settings to GitLab groups and projects, with recursive group
/// traversal.
#[derive(Debug, Parser)]
#[command(
    name = "gls",
    author,
    version,
    about = "Apply settings to GitLab groups and projects, with recursive group traversal",
    long_about = "gls Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  A composable CLI tool for applying settings to GitLab groups\n\
                  and projects. Resolves a GitLab URL to a group or project,\n\
                  then applies the specified operation - recursing into child\n\
                  groups/projects as needed. See `gls <command> --help` for\n\
                  more information about a command.",
    after_help = "ENVIRONMENT:\n\n\
                  GITLAB_TOKEN - GitLab Personal Access Token (required)\n\
                  GITLAB_URL   - GitLab instance URL (default: https://gitlab.com)\n\n\
                  EXAMPLES:\n\n\
                  # Protect a branch on a single project\n\
                  gls protect-branch https://gitlab.com/myorg/myproject \\\n\
                      --branch release/1.2 --push no-access --merge no-access\n\n\
                  # Protect a tag pattern across all projects in a group\n\
                  gls protect-tag https://gitlab.com/myorg --tag 'v1.2.*' --create maintainer"
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands, one per operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Protect or update protection on a branch.
    ProtectBranch(ProtectBranchArgs),

    /// Protect or update protection on a tag pattern.
    ProtectTag(ProtectTagArgs),

    /// Set project or group settings via key=value pairs.
    ProjectSetting(ProjectSettingArgs),

    /// Manage project-level merge request approval rules.
    ApprovalRule(ApprovalRuleArgs),

    /// Configure project merge request approval settings.
    MergeRequestSetting(MergeRequestSettingArgs),
}

impl Command {
    /// The target URL positional of the selected subcommand.
    #[must_use]
    pub fn target_url(&self) -> &str {
        match self {
            Self::ProtectBranch(args) => &args.target_url,
            Self::ProtectTag(args) => &args.target_url,
            Self::ProjectSetting(args) => &args.target_url,
            Self::ApprovalRule(args) => &args.target_url,
            Self::MergeRequestSetting(args) => &args.target_url,
        }
    }

    /// Builds the operation described by the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when operation parameters fail validation
    /// beyond what clap enforces (e.g. a malformed `--setting` pair).
    pub fn to_operation(&self) -> Result<Operation, ConfigError> {
        Ok(match self {
            Self::ProtectBranch(args) => Operation::ProtectBranch(args.to_operation()),
            Self::ProtectTag(args) => Operation::ProtectTag(args.to_operation()),
            Self::ProjectSetting(args) => Operation::ProjectSetting(args.to_operation()?),
            Self::ApprovalRule(args) => Operation::ApprovalRule(args.to_operation()),
            Self::MergeRequestSetting(args) => {
                Operation::MergeRequestSetting(args.to_operation())
            }
        })
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
