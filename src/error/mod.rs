// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              GlsError
//!                 |
//!     +-----------+-----------+--------+
//!     v           v           v        v
//! Resolution  Transport    Config   Io/Other
//!    Box         Box        Box     Box<str>
//!
//! Sub-errors:
//!   Resolution  NotFound (fatal, aborts the run)
//!   Transport   Reqwest, HttpStatus, RetriesExhausted (per-node)
//!   Config      InvalidValue, MissingToken (fatal)
//!
//! Fatal errors abort before traversal; transport errors are
//! caught at the node boundary and become `error` outcomes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GlsError`].
pub type GlsResult<T> = std::result::Result<T, GlsError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum GlsError {
    /// Target could not be classified as a project or group.
    #[error("resolution error: {0}")]
    Resolution(#[from] Box<ResolutionError>),

    /// API request failed after exhausting retries, or was rejected.
    #[error("transport error: {0}")]
    Transport(#[from] Box<TransportError>),

    /// Invocation parameters are structurally invalid.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Run was interrupted (maps to exit code 130).
    #[error("interrupted")]
    Interrupted,

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GlsError {
                fn from(err: $error) -> Self {
                    GlsError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ResolutionError => Resolution,
    TransportError => Transport,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Resolution Errors ---

/// Target resolution errors. Fatal: without a resolved target there is no
/// tree to traverse.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Neither a project nor a group matched the candidate path.
    #[error("could not resolve '{input}' as a project or group")]
    NotFound { input: String },

    /// Resolution lookup itself failed (not a 404).
    #[error("failed to resolve '{input}': {source}")]
    LookupFailed {
        input: String,
        #[source]
        source: TransportError,
    },
}

// --- Transport Errors ---

/// API transport errors. Non-fatal during traversal: caught at the node
/// boundary and converted to an `error` outcome.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error from reqwest (connection, TLS, body decoding).
    #[error("request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Non-success HTTP status from the API.
    #[error("http error {status}: {method} {endpoint}{}", format_body(body))]
    HttpStatus {
        status: u16,
        method: &'static str,
        endpoint: String,
        body: String,
    },

    /// Retryable failures persisted past the configured retry budget.
    #[error(
        "retries exhausted after {attempts} attempts: {method} {endpoint} (last status {last_status})"
    )]
    RetriesExhausted {
        attempts: u32,
        method: &'static str,
        endpoint: String,
        last_status: u16,
    },

    /// Response body was not the expected JSON shape.
    #[error("unexpected response from {endpoint}: {message}")]
    UnexpectedBody { endpoint: String, message: String },

    /// User lookup returned no match.
    #[error("user not found: {0}")]
    UserNotFound(String),
}

impl TransportError {
    /// HTTP status carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RetriesExhausted { last_status, .. } => Some(*last_status),
            _ => None,
        }
    }

    /// Whether this error is a plain 404 (used for resolver fallback and
    /// "not yet protected" detection).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        // Bodies are truncated by the client before they get here.
        format!(" - {body}")
    }
}

// --- Config Errors ---

/// Invocation configuration errors. Fatal: the whole run cannot proceed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid parameter value.
    #[error("invalid value for '{option}': {message}")]
    InvalidValue { option: String, message: String },

    /// Required token is missing.
    #[error("GITLAB_TOKEN is not set (use --token or the environment)")]
    MissingToken,

    /// Filter pattern failed to compile.
    #[error("invalid filter pattern '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },
}
