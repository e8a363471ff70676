// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core data model.
//!
//! ```text
//! Target      resolved project/group handle (kind, id, path)
//! AccessLevel GitLab numeric levels (no_access=0 .. admin=60)
//! Outcome     one (operation, target) result with an Action
//!
//! Action: applied | already_set | would_apply | skipped | error
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default GitLab instance when neither `--gitlab-url` nor `GITLAB_URL` is set.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// REST API prefix appended to the instance URL.
pub const API_V4: &str = "/api/v4";

/// Page size used for paginated list endpoints.
pub const PER_PAGE: u32 = 100;

/// Default retry budget for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Kind of a resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Project,
    Group,
}

impl TargetKind {
    /// Display name used in report lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Group => "group",
        }
    }
}

/// A resolved GitLab target (project or group).
///
/// Created once per invocation by the resolver and immutable thereafter;
/// traversal creates further targets for discovered subgroups and projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    pub id: u64,
    /// Canonical slash-separated namespace path
    /// (`path_with_namespace` / `full_path`).
    pub path: String,
    pub name: String,
    pub web_url: String,
}

/// GitLab access level for protected branches/tags.
///
/// The numeric values are fixed by the GitLab API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum AccessLevel {
    NoAccess,
    Minimal,
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
    Admin,
}

impl AccessLevel {
    /// Numeric value as used by the API.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        match self {
            Self::NoAccess => 0,
            Self::Minimal => 5,
            Self::Guest => 10,
            Self::Reporter => 20,
            Self::Developer => 30,
            Self::Maintainer => 40,
            Self::Owner => 50,
            Self::Admin => 60,
        }
    }

    /// Name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoAccess => "no_access",
            Self::Minimal => "minimal",
            Self::Guest => "guest",
            Self::Reporter => "reporter",
            Self::Developer => "developer",
            Self::Maintainer => "maintainer",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }
}

/// Classification of one operation application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// A mutation was performed.
    Applied,
    /// Current state already matched; no mutation issued.
    AlreadySet,
    /// Dry-run: a mutation would have been performed.
    WouldApply,
    /// Operation had nothing to do for this target.
    Skipped,
    /// Transport or validation failure for this target.
    Error,
}

impl Action {
    /// Glyph used in human-readable report lines.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Applied => '\u{2713}',    // ✓
            Self::AlreadySet => '\u{b7}',   // ·
            Self::WouldApply => '\u{25cb}', // ○
            Self::Skipped => '\u{2192}',    // →
            Self::Error => '\u{2717}',      // ✗
        }
    }

    /// Snake-case name as emitted in JSON records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AlreadySet => "already_set",
            Self::WouldApply => "would_apply",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

/// Result of applying one operation to one target.
///
/// Exactly one outcome is produced per (operation, target) pair per run.
/// Outcomes are transient: rendered by the reporter and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    #[serde(rename = "target_type")]
    pub target_kind: TargetKind,
    pub target_path: String,
    pub target_id: u64,
    /// Operation name plus any disambiguating sub-key,
    /// e.g. `protect-branch:main`.
    pub operation: String,
    pub action: Action,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl Outcome {
    /// Creates an outcome for a project target.
    #[must_use]
    pub fn project(id: u64, path: &str, operation: impl Into<String>, action: Action) -> Self {
        Self::new(TargetKind::Project, id, path, operation, action)
    }

    /// Creates an outcome for a group target.
    #[must_use]
    pub fn group(id: u64, path: &str, operation: impl Into<String>, action: Action) -> Self {
        Self::new(TargetKind::Group, id, path, operation, action)
    }

    fn new(
        kind: TargetKind,
        id: u64,
        path: &str,
        operation: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            target_kind: kind,
            target_path: path.to_string(),
            target_id: id,
            operation: operation.into(),
            action,
            detail: String::new(),
            dry_run: false,
        }
    }

    /// Attaches a detail string (error message or diff summary).
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Marks this outcome as produced under dry-run.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether this outcome represents a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.action == Action::Error
    }
}
