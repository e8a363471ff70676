// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::{Value, json};

use crate::error::ConfigError;
use crate::op::merge_request_setting::to_modern_field;
use crate::op::project_setting::coerce_value;
use crate::op::{Applicable, Operation, ProjectSettingOp, ProtectBranchOp, max_access_level};

#[test]
fn coerce_value_booleans_win_over_numbers() {
    assert_eq!(coerce_value("true"), Value::Bool(true));
    assert_eq!(coerce_value("YES"), Value::Bool(true));
    assert_eq!(coerce_value("1"), Value::Bool(true));
    assert_eq!(coerce_value("false"), Value::Bool(false));
    assert_eq!(coerce_value("no"), Value::Bool(false));
    assert_eq!(coerce_value("0"), Value::Bool(false));
}

#[test]
fn coerce_value_numbers_and_strings() {
    assert_eq!(coerce_value("42"), Value::from(42));
    assert_eq!(coerce_value("-7"), Value::from(-7));
    assert_eq!(coerce_value("2.5"), Value::from(2.5));
    assert_eq!(coerce_value("private"), Value::String("private".to_string()));
}

#[test]
fn parse_settings_rejects_missing_equals() {
    let err = ProjectSettingOp::parse(&["visibility".to_string()]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    assert!(err.to_string().contains("visibility"));
}

#[test]
fn parse_settings_trims_and_coerces() {
    let op = ProjectSettingOp::parse(&[" visibility = private ".to_string()]);
    assert!(op.is_ok());
}

#[test]
fn max_access_level_takes_the_maximum() {
    let state = json!({
        "push_access_levels": [
            {"access_level": 30},
            {"access_level": 40},
        ],
    });
    assert_eq!(max_access_level(&state, "push_access_levels"), 40);
}

#[test]
fn max_access_level_defaults_to_zero() {
    assert_eq!(max_access_level(&json!({}), "push_access_levels"), 0);
    assert_eq!(
        max_access_level(&json!({"push_access_levels": []}), "push_access_levels"),
        0
    );
}

#[test]
fn modern_field_mapping_inverts_polarity() {
    assert_eq!(
        to_modern_field("reset_approvals_on_push", true),
        Some(("retain_approvals_on_push", false))
    );
    assert_eq!(
        to_modern_field("disable_overriding_approvers_per_merge_request", false),
        Some((
            "allow_overrides_to_approver_list_per_merge_request",
            true
        ))
    );
    assert_eq!(
        to_modern_field("merge_requests_author_approval", true),
        Some(("allow_author_approval", true))
    );
    assert_eq!(
        to_modern_field("merge_requests_disable_committers_approval", true),
        Some(("allow_committer_approval", false))
    );
    assert_eq!(to_modern_field("approvals_before_merge", true), None);
}

#[test]
fn operation_delegates_name_and_group_support() {
    let protect = Operation::ProtectBranch(ProtectBranchOp::new(
        "main".to_string(),
        crate::model::AccessLevel::Maintainer,
        crate::model::AccessLevel::Developer,
        false,
        false,
    ));
    assert_eq!(protect.name(), "protect-branch");
    assert!(!protect.applies_to_group());

    let setting = Operation::ProjectSetting(
        ProjectSettingOp::parse(&["visibility=private".to_string()]).unwrap(),
    );
    assert_eq!(setting.name(), "project-setting");
    assert!(setting.applies_to_group());
}
