// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! ```text
//! --gitlab-url URL  ← Instance URL (or GITLAB_URL env)
//! --token TOKEN     ← PAT (or GITLAB_TOKEN env, never logged)
//! --dry-run         ← Suppress mutations, report would_apply
//! --json            ← Line-delimited JSON outcome records
//! --filter GLOB     ← Gate projects by namespace path
//! --max-retries N   ← Transient failure budget
//!
//! Precedence: CLI flags > environment > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogConfig;
use crate::model::{DEFAULT_GITLAB_URL, DEFAULT_MAX_RETRIES};

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Preview changes without applying them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Emit outcomes as line-delimited JSON records.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// GitLab instance URL.
    #[arg(long = "gitlab-url", value_name = "URL", env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// GitLab Personal Access Token.
    #[arg(long, value_name = "TOKEN", env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum retry attempts for transient errors.
    #[arg(long = "max-retries", value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Glob pattern to filter projects by namespace path
    /// (e.g., 'myorg/team-*/*').
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Path to log file (debug level, regardless of --verbose).
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Instance URL to use, falling back to the public default.
    #[must_use]
    pub fn effective_gitlab_url(&self) -> &str {
        self.gitlab_url.as_deref().unwrap_or(DEFAULT_GITLAB_URL)
    }

    /// The access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when neither `--token` nor
    /// `GITLAB_TOKEN` is set.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Converts the options to a logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            verbose: self.verbose,
            log_file: self.log_file.clone(),
        }
    }
}
