// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitLab REST API v4 transport.
//!
//! ```text
//! GitLabClient::new(base_url, token)
//!   .with_max_retries(n)
//!        |
//!        v
//!   request(method, endpoint, query, body)
//!        |
//!   retry loop: 429/500/502/503/504 + connection errors
//!        |       backoff = 500ms * 2^attempt
//!        |       Retry-After header wins on 429
//!        v
//!   get / post / put / delete / paginate (x-total-pages)
//! ```
//!
//! One client is constructed per run and passed explicitly to the resolver
//! and operations; retry state is per-request.

pub mod resolve;

#[cfg(test)]
mod tests;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::TransportError;
use crate::model::{API_V4, DEFAULT_MAX_RETRIES, PER_PAGE};

/// Statuses that indicate a transient failure worth retrying.
const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// Base for the exponential backoff (`factor * 2^attempt`).
const RETRY_BACKOFF_FACTOR: Duration = Duration::from_millis(500);

/// Error bodies are truncated to this length in logs and error details.
const BODY_TRUNCATE: usize = 500;

/// Query parameter list passed to requests.
type Query<'a> = &'a [(&'a str, String)];

/// Thin wrapper around the GitLab REST API v4 with retry and pagination.
pub struct GitLabClient {
    http: reqwest::Client,
    api_url: String,
    max_retries: u32,
}

/// Project payload as returned by `/projects` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    pub web_url: String,
}

/// Group payload as returned by `/groups` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfo {
    pub id: u64,
    pub name: String,
    pub full_path: String,
    pub web_url: String,
}

impl GitLabClient {
    /// Creates a client for the given instance URL and private token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters that cannot appear
    /// in an HTTP header, or if the underlying client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self, TransportError> {
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| TransportError::UnexpectedBody {
                endpoint: String::new(),
                message: "token is not a valid header value".to_string(),
            })?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("PRIVATE-TOKEN", token_value);

        let http = reqwest::Client::builder()
            .user_agent(format!("gls/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: format!("{}{API_V4}", base_url.trim_end_matches('/')),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Sets the retry budget for transient failures.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Full URL for an endpoint (test hook).
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_url)
    }

    /// Issues one request with retry on transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RetriesExhausted`] when a retryable status
    /// persists past the budget, [`TransportError::HttpStatus`] for
    /// non-retryable error statuses, and [`TransportError::Reqwest`] for
    /// connection-level failures that outlive the budget.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Result<Response, TransportError> {
        let url = self.endpoint_url(endpoint);
        let method_name = method_label(&method);

        for attempt in 0..=self.max_retries {
            debug!(
                method = method_name,
                url = %url,
                attempt = attempt + 1,
                budget = self.max_retries + 1,
                "api request"
            );

            let mut req = self.http.request(method.clone(), &url);
            if let Some(query) = query {
                req = req.query(query);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            let resp = match req.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if attempt < self.max_retries {
                        let wait = RETRY_BACKOFF_FACTOR * 2u32.pow(attempt);
                        warn!(error = %e, wait_ms = wait.as_millis(), "connection error, retrying");
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Err(TransportError::Reqwest(e));
                }
                Err(e) => return Err(TransportError::Reqwest(e)),
            };

            let status = resp.status();

            if RETRYABLE_STATUS.contains(&status.as_u16()) {
                if attempt < self.max_retries {
                    let wait = backoff_for(&resp, attempt);
                    warn!(
                        status = status.as_u16(),
                        wait_ms = wait.as_millis(),
                        "retryable error, waiting before retry"
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                return Err(TransportError::RetriesExhausted {
                    attempts: self.max_retries + 1,
                    method: method_name,
                    endpoint: endpoint.to_string(),
                    last_status: status.as_u16(),
                });
            }

            if !status.is_success() {
                let body = truncate(&resp.text().await.unwrap_or_default());
                error!(status = status.as_u16(), endpoint, body, "api error");
                return Err(TransportError::HttpStatus {
                    status: status.as_u16(),
                    method: method_name,
                    endpoint: endpoint.to_string(),
                    body,
                });
            }

            return Ok(resp);
        }

        // The loop always returns; this is a safety net for an empty budget.
        Err(TransportError::RetriesExhausted {
            attempts: self.max_retries + 1,
            method: method_name,
            endpoint: endpoint.to_string(),
            last_status: 0,
        })
    }

    /// GET returning the parsed JSON body.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::request`]; additionally fails if the body is not
    /// valid JSON.
    pub async fn get(
        &self,
        endpoint: &str,
        query: Option<Query<'_>>,
    ) -> Result<Value, TransportError> {
        let resp = self.request(Method::GET, endpoint, query, None).await?;
        parse_json(endpoint, resp).await
    }

    /// POST with a JSON body, returning the parsed JSON response.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::request`].
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        let resp = self
            .request(Method::POST, endpoint, None, Some(body))
            .await?;
        parse_json(endpoint, resp).await
    }

    /// PUT with a JSON body, returning the parsed JSON response.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::request`].
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        let resp = self.request(Method::PUT, endpoint, None, Some(body)).await?;
        parse_json(endpoint, resp).await
    }

    /// DELETE; the response body (often empty) is discarded.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::request`].
    pub async fn delete(&self, endpoint: &str) -> Result<(), TransportError> {
        self.request(Method::DELETE, endpoint, None, None).await?;
        Ok(())
    }

    /// Fetches all pages of a paginated list endpoint.
    ///
    /// Follows the `x-total-pages` response header; stops early on an empty
    /// page.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::request`]; additionally fails if a page body is
    /// not a JSON array.
    pub async fn paginate(
        &self,
        endpoint: &str,
        query: Option<Query<'_>>,
    ) -> Result<Vec<Value>, TransportError> {
        let mut results = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut params: Vec<(&str, String)> = vec![
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            if let Some(query) = query {
                params.extend(query.iter().map(|(k, v)| (*k, v.clone())));
            }

            let resp = self
                .request(Method::GET, endpoint, Some(&params), None)
                .await?;

            let total_pages = resp
                .headers()
                .get("x-total-pages")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(page);

            let body = parse_json(endpoint, resp).await?;
            let Value::Array(items) = body else {
                return Err(TransportError::UnexpectedBody {
                    endpoint: endpoint.to_string(),
                    message: "expected a JSON array page".to_string(),
                });
            };

            if items.is_empty() {
                break;
            }
            results.extend(items);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(results)
    }

    /// Lists the direct subgroups of a group.
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::paginate`].
    pub async fn subgroups(&self, group_id: u64) -> Result<Vec<GroupInfo>, TransportError> {
        let endpoint = format!("/groups/{group_id}/subgroups");
        let items = self.paginate(&endpoint, None).await?;
        deserialize_items(&endpoint, items)
    }

    /// Lists the direct member projects of a group (no subgroup projects).
    ///
    /// # Errors
    ///
    /// See [`GitLabClient::paginate`].
    pub async fn group_projects(&self, group_id: u64) -> Result<Vec<ProjectInfo>, TransportError> {
        let endpoint = format!("/groups/{group_id}/projects");
        let query = [("include_subgroups", "false".to_string())];
        let items = self.paginate(&endpoint, Some(&query)).await?;
        deserialize_items(&endpoint, items)
    }
}

/// Backoff for a retryable response: a parseable `Retry-After` header on a
/// 429 wins, otherwise exponential.
fn backoff_for(resp: &Response, attempt: u32) -> Duration {
    if resp.status() == StatusCode::TOO_MANY_REQUESTS
        && let Some(retry_after) = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f64>().ok())
        && retry_after >= 0.0
    {
        return Duration::from_secs_f64(retry_after);
    }
    exponential_backoff(attempt)
}

/// Computed backoff for the given zero-based attempt.
#[must_use]
pub(crate) fn exponential_backoff(attempt: u32) -> Duration {
    RETRY_BACKOFF_FACTOR * 2u32.pow(attempt)
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "OTHER",
    }
}

async fn parse_json(endpoint: &str, resp: Response) -> Result<Value, TransportError> {
    let status = resp.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    resp.json::<Value>()
        .await
        .map_err(|e| TransportError::UnexpectedBody {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}

fn deserialize_items<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    items: Vec<Value>,
) -> Result<Vec<T>, TransportError> {
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| TransportError::UnexpectedBody {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn truncate(body: &str) -> String {
    if body.len() <= BODY_TRUNCATE {
        return body.to_string();
    }
    let mut cut = BODY_TRUNCATE;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body[..cut].to_string()
}
