// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target and user resolution.
//!
//! ```text
//! "https://gitlab.com/org/team/proj/-/settings" --> extract_path
//!                     "org/team/proj"           --> encode_path
//!                     "org%2Fteam%2Fproj"
//!        |
//!        v
//!   GET /projects/:path   (project wins)
//!        | 404
//!        v
//!   GET /groups/:path
//!        | 404
//!        v
//!   ResolutionError::NotFound (fatal)
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

/// Everything except unreserved characters, so `/` in a namespace path
/// becomes `%2F`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

use crate::client::{GitLabClient, GroupInfo, ProjectInfo};
use crate::error::{ResolutionError, TransportError};
use crate::model::{Target, TargetKind};

/// Extracts the namespace path from a GitLab web URL or bare path.
///
/// Strips scheme and host when present, leading/trailing slashes, and
/// trailing decorations (`/-/...`, `/-`, `.git`).
#[must_use]
pub fn extract_path(url_or_path: &str) -> String {
    let mut path = url_or_path.trim();

    // Full URL: drop scheme and host.
    if let Some(rest) = path.split_once("://").map(|(_, rest)| rest) {
        path = rest.split_once('/').map_or("", |(_, p)| p);
    }

    let mut path = path.trim_matches('/').to_string();
    for suffix in ["/-/", "/-", ".git"] {
        if let Some(idx) = path.find(suffix) {
            path.truncate(idx);
        }
    }
    path
}

/// Percent-encodes a namespace path for use as a single URL segment
/// (`/` becomes `%2F`).
#[must_use]
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

impl GitLabClient {
    /// Resolves a GitLab web URL or bare path to a [`Target`].
    ///
    /// A path that could name either a project or a group is disambiguated
    /// by trying project resolution first.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotFound`] when neither lookup matches,
    /// and [`ResolutionError::LookupFailed`] when a lookup fails with
    /// anything other than a 404.
    pub async fn resolve_target(&self, url_or_path: &str) -> Result<Target, ResolutionError> {
        let path = extract_path(url_or_path);
        let encoded = encode_path(&path);

        match self.get(&format!("/projects/{encoded}"), None).await {
            Ok(body) => {
                let proj: ProjectInfo =
                    serde_json::from_value(body).map_err(|e| ResolutionError::LookupFailed {
                        input: url_or_path.to_string(),
                        source: TransportError::UnexpectedBody {
                            endpoint: format!("/projects/{encoded}"),
                            message: e.to_string(),
                        },
                    })?;
                return Ok(Target {
                    kind: TargetKind::Project,
                    id: proj.id,
                    path: proj.path_with_namespace,
                    name: proj.name,
                    web_url: proj.web_url,
                });
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path, "not a project, trying group");
            }
            Err(e) => {
                return Err(ResolutionError::LookupFailed {
                    input: url_or_path.to_string(),
                    source: e,
                });
            }
        }

        match self.get(&format!("/groups/{encoded}"), None).await {
            Ok(body) => {
                let grp: GroupInfo =
                    serde_json::from_value(body).map_err(|e| ResolutionError::LookupFailed {
                        input: url_or_path.to_string(),
                        source: TransportError::UnexpectedBody {
                            endpoint: format!("/groups/{encoded}"),
                            message: e.to_string(),
                        },
                    })?;
                Ok(Target {
                    kind: TargetKind::Group,
                    id: grp.id,
                    path: grp.full_path,
                    name: grp.name,
                    web_url: grp.web_url,
                })
            }
            Err(e) if e.is_not_found() => Err(ResolutionError::NotFound {
                input: url_or_path.to_string(),
            }),
            Err(e) => Err(ResolutionError::LookupFailed {
                input: url_or_path.to_string(),
                source: e,
            }),
        }
    }

    /// Resolves a username or numeric ID string to a numeric user ID.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UserNotFound`] when no user matches the
    /// username, or a transport error from the lookup itself.
    pub async fn resolve_user(&self, identifier: &str) -> Result<u64, TransportError> {
        if let Ok(id) = identifier.parse::<u64>() {
            return Ok(id);
        }

        let query = [("username", identifier.to_string())];
        let body = self.get("/users", Some(&query)).await?;
        body.as_array()
            .and_then(|users| users.first())
            .and_then(|user| user.get("id"))
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| TransportError::UserNotFound(identifier.to_string()))
    }
}
