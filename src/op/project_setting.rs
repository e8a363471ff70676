// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generic project/group settings operation.
//!
//! ```text
//! --setting visibility=private --setting auto_devops_enabled=false
//!        |
//!   coerce: true/yes/1, false/no/0, integer, float, else string
//!        |
//!   GET entity --> diff all keys --> PUT differing keys only
//! ```
//!
//! The single PUT carries only the keys whose current value differs, so a
//! re-run with identical values is `already_set` for the whole batch. One
//! outcome per invocation, not per key.

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::model::{Action, Outcome, TargetKind};
use crate::op::{Applicable, OpContext};

/// Set project or group settings via key=value pairs.
#[derive(Debug, Clone)]
pub struct ProjectSettingOp {
    desired: Vec<(String, Value)>,
}

impl ProjectSettingOp {
    /// Parses repeatable `KEY=VALUE` arguments into typed desired state.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an argument without `=`.
    pub fn parse(settings: &[String]) -> Result<Self, ConfigError> {
        let mut desired = Vec::with_capacity(settings.len());
        for setting in settings {
            let Some((key, value)) = setting.split_once('=') else {
                return Err(ConfigError::InvalidValue {
                    option: "--setting".to_string(),
                    message: format!("{setting} (expected key=value)"),
                });
            };
            desired.push((key.trim().to_string(), coerce_value(value.trim())));
        }
        Ok(Self { desired })
    }

    async fn apply_settings(
        &self,
        ctx: &OpContext<'_>,
        kind: TargetKind,
        entity_id: u64,
        entity_path: &str,
    ) -> Outcome {
        let endpoint = match kind {
            TargetKind::Project => format!("/projects/{entity_id}"),
            TargetKind::Group => format!("/groups/{entity_id}"),
        };
        let outcome = |action| match kind {
            TargetKind::Project => Outcome::project(entity_id, entity_path, self.name(), action),
            TargetKind::Group => Outcome::group(entity_id, entity_path, self.name(), action),
        };

        let current = match ctx.client().get(&endpoint, None).await {
            Ok(current) => current,
            Err(e) => {
                return outcome(Action::Error)
                    .with_detail(format!("failed to get settings: {e}"));
            }
        };

        let changes: Map<String, Value> = self
            .desired
            .iter()
            .filter(|(key, value)| current.get(key) != Some(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if changes.is_empty() {
            return outcome(Action::AlreadySet).with_detail(format!("keys: {}", self.key_list()));
        }

        let changed_keys = changes.keys().cloned().collect::<Vec<_>>().join(", ");

        if !ctx.is_dry_run()
            && let Err(e) = ctx.client().put(&endpoint, &Value::Object(changes)).await
        {
            return outcome(Action::Error).with_detail(format!("failed to apply: {e}"));
        }

        outcome(ctx.mutation_action())
            .with_detail(format!("changed: {changed_keys}"))
            .with_dry_run(ctx.is_dry_run())
    }

    fn key_list(&self) -> String {
        self.desired
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Applicable for ProjectSettingOp {
    fn name(&self) -> &'static str {
        "project-setting"
    }

    fn applies_to_group(&self) -> bool {
        true
    }

    fn apply_to_project<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        project_id: u64,
        project_path: &'a str,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(self.apply_settings(ctx, TargetKind::Project, project_id, project_path))
    }

    fn apply_to_group<'a>(
        &'a self,
        ctx: &'a OpContext<'_>,
        group_id: u64,
        group_path: &'a str,
    ) -> BoxFuture<'a, Option<Outcome>> {
        Box::pin(async move {
            Some(
                self.apply_settings(ctx, TargetKind::Group, group_id, group_path)
                    .await,
            )
        })
    }
}

/// Coerces a raw setting value to the matching JSON type.
///
/// Boolean-looking strings win over numeric ones, so `1` becomes `true`.
#[must_use]
pub(crate) fn coerce_value(value: &str) -> Value {
    let lowered = value.to_ascii_lowercase();
    if matches!(lowered.as_str(), "true" | "yes" | "1") {
        return Value::Bool(true);
    }
    if matches!(lowered.as_str(), "false" | "no" | "0") {
        return Value::Bool(false);
    }
    if let Ok(int) = value.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = value.parse::<f64>() {
        return Value::from(float);
    }
    Value::String(value.to_string())
}
