// gls: GitLab Settings Applier
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outcome reporting.
//!
//! ```text
//! human:  [DRY-RUN] ✓ [project] myorg/api: protect-branch:main → applied (push=maintainer)
//! json:   {"target_type":"project","target_path":"myorg/api",...}
//! ```
//!
//! One line per outcome, written to stderr in both modes so stdout stays
//! clean for composing pipelines. The JSON form is one serialized
//! [`Outcome`] per line, parseable with standard line-oriented tooling.

use std::io::Write;

use crate::error::{GlsError, GlsResult};
use crate::model::{Action, Outcome};

/// Writes outcome lines in human or JSON form.
pub struct Reporter<W> {
    json: bool,
    writer: W,
}

impl Reporter<std::io::Stderr> {
    /// Creates a reporter writing to stderr.
    #[must_use]
    pub fn stderr(json: bool) -> Self {
        Self::new(json, std::io::stderr())
    }
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter over an arbitrary writer.
    #[must_use]
    pub const fn new(json: bool, writer: W) -> Self {
        Self { json, writer }
    }

    /// Writes one line for `outcome`.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the underlying write fails.
    pub fn emit(&mut self, outcome: &Outcome) -> GlsResult<()> {
        if self.json {
            serde_json::to_writer(&mut self.writer, outcome)
                .map_err(|e| GlsError::Other(e.to_string().into_boxed_str()))?;
            writeln!(self.writer)?;
        } else {
            writeln!(self.writer, "{}", render_human(outcome))?;
        }
        Ok(())
    }

    /// Emits every outcome, then logs the run summary.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    pub fn report(&mut self, outcomes: &[Outcome], dry_run: bool) -> GlsResult<()> {
        for outcome in outcomes {
            self.emit(outcome)?;
        }
        summarize(outcomes, dry_run);
        Ok(())
    }
}

fn render_human(outcome: &Outcome) -> String {
    let prefix = if outcome.dry_run { "[DRY-RUN] " } else { "" };
    let detail = if outcome.detail.is_empty() {
        String::new()
    } else {
        format!(" ({})", outcome.detail)
    };
    format!(
        "{prefix}{} [{}] {}: {} \u{2192} {}{detail}",
        outcome.action.glyph(),
        outcome.target_kind.as_str(),
        outcome.target_path,
        outcome.operation,
        outcome.action.as_str(),
    )
}

/// Logs the aggregate counts for a finished run.
fn summarize(outcomes: &[Outcome], dry_run: bool) {
    let total = outcomes.len();
    let changed = outcomes
        .iter()
        .filter(|o| matches!(o.action, Action::Applied | Action::WouldApply))
        .count();
    let already = outcomes
        .iter()
        .filter(|o| o.action == Action::AlreadySet)
        .count();
    let errors = outcomes.iter().filter(|o| o.is_error()).count();
    let verb = if dry_run { "would change" } else { "changed" };
    tracing::info!("Done: {total} targets, {changed} {verb}, {already} already set, {errors} errors");
}

/// Process exit code for a finished run: 1 when any outcome errored,
/// 0 otherwise.
#[must_use]
pub fn exit_code(outcomes: &[Outcome]) -> u8 {
    u8::from(outcomes.iter().any(Outcome::is_error))
}
