//! Per-request validation (spec §4.7 validation contract): required
//! fields, cap enforcement, and label allow/block filtering. Requests
//! that fail validation are dropped with a diagnostic; the rest of the
//! batch still gets processed.

use std::collections::HashMap;

use aw_model::{SafeOutputEntry, SafeOutputKind, SafeOutputsConfig};
use serde_json::Value;

use crate::request::SafeOutputRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("safe-output kind '{0}' is not configured for this workflow")]
    KindNotConfigured(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{0}' exceeds its maximum length")]
    FieldTooLong(&'static str),
    #[error("cap exceeded: kind '{0}' already emitted its maximum of {1}")]
    CapExceeded(String, u32),
}

/// Accumulates per-kind counts across a batch of requests so the cap
/// check (spec §4.7: "accumulated count across the run must stay at or
/// below `max`") is enforced in request order.
#[derive(Debug, Default)]
pub struct ValidationContext {
    counts: HashMap<SafeOutputKind, u32>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }
}

const MAX_TITLE_LEN: usize = 256;
const MAX_BODY_LEN: usize = 65_536;

fn required_fields(kind: SafeOutputKind) -> &'static [&'static str] {
    match kind {
        SafeOutputKind::CreateIssue => &["title", "body"],
        SafeOutputKind::AddComment => &["body"],
        SafeOutputKind::AddLabels => &["labels"],
        SafeOutputKind::CreatePullRequest => &["title", "body", "branch"],
        SafeOutputKind::CreatePullRequestReviewComment => &["path", "line", "body"],
        SafeOutputKind::UpdateProject => &["project", "fields"],
        SafeOutputKind::CreateProjectStatusUpdate => &["body"],
        SafeOutputKind::CreateDiscussion => &["title", "body", "category"],
        SafeOutputKind::UploadAsset => &["path"],
        SafeOutputKind::DispatchWorkflow => &["workflow_name", "inputs"],
        SafeOutputKind::AssignToAgent => &["issue_or_pr"],
        SafeOutputKind::MissingTool => &["name", "reason"],
    }
}

fn check_required_fields(fields: &Value, kind: SafeOutputKind) -> Result<(), ValidationError> {
    for name in required_fields(kind) {
        match fields.get(name) {
            Some(Value::Null) | None => return Err(ValidationError::MissingField(name)),
            Some(Value::String(s)) if s.trim().is_empty() => return Err(ValidationError::MissingField(name)),
            _ => {}
        }
    }
    if let Some(Value::String(title)) = fields.get("title") {
        if title.len() > MAX_TITLE_LEN {
            return Err(ValidationError::FieldTooLong("title"));
        }
    }
    if let Some(Value::String(body)) = fields.get("body") {
        if body.len() > MAX_BODY_LEN {
            return Err(ValidationError::FieldTooLong("body"));
        }
    }
    Ok(())
}

/// Result of filtering a request's `labels` against an entry's
/// allow/block glob lists (spec §4.7, `add-labels` kind).
pub struct LabelFilterOutcome {
    pub accepted: Vec<String>,
    pub dropped: Vec<(String, &'static str)>,
}

/// Apply `allowed`/`blocked` glob lists to a proposed label set. A label
/// outside a non-empty `allowed` list is dropped silently (no
/// diagnostic: the agent is expected to stay within the declared
/// vocabulary). A label matching a `blocked` glob is dropped with a
/// diagnostic, since it's an explicit policy violation.
pub fn filter_labels(labels: &[String], entry: &SafeOutputEntry) -> LabelFilterOutcome {
    let mut accepted = Vec::new();
    let mut dropped = Vec::new();
    for label in labels {
        if !entry.allowed.is_empty() {
            let matches_allowed = entry
                .allowed
                .iter()
                .any(|pat| glob::Pattern::new(pat).is_ok_and(|p| p.matches(label)));
            if !matches_allowed {
                dropped.push((label.clone(), "not-allowed"));
                continue;
            }
        }
        let matches_blocked = entry
            .blocked
            .iter()
            .any(|pat| glob::Pattern::new(pat).is_ok_and(|p| p.matches(label)));
        if matches_blocked {
            dropped.push((label.clone(), "blocked"));
            continue;
        }
        accepted.push(label.clone());
    }
    LabelFilterOutcome { accepted, dropped }
}

/// Validate one request against its configured entry and the running
/// cap count. On success, bumps the cap counter and returns the
/// (possibly label-filtered) field value.
pub fn validate(
    request: &SafeOutputRequest,
    config: &SafeOutputsConfig,
    ctx: &mut ValidationContext,
) -> Result<Value, ValidationError> {
    let entry = config
        .kind(request.kind)
        .ok_or_else(|| ValidationError::KindNotConfigured(request.kind.wire_type().to_string()))?;

    check_required_fields(&request.fields, request.kind)?;

    let max = entry.effective_max();
    let count = ctx.counts.entry(request.kind).or_insert(0);
    if *count >= max {
        return Err(ValidationError::CapExceeded(request.kind.wire_type().to_string(), max));
    }
    *count += 1;

    let mut fields = request.fields.clone();
    if request.kind == SafeOutputKind::AddLabels {
        if let Some(Value::Array(raw)) = fields.get("labels") {
            let labels: Vec<String> = raw.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
            let outcome = filter_labels(&labels, entry);
            fields["labels"] = Value::Array(outcome.accepted.into_iter().map(Value::String).collect());
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_model::SafeOutputsConfig;

    fn config_with(kind: SafeOutputKind, entry: SafeOutputEntry) -> SafeOutputsConfig {
        let mut config = SafeOutputsConfig::default();
        config.entries.insert(kind, entry);
        config
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let config = config_with(SafeOutputKind::CreateIssue, SafeOutputEntry::default());
        let req = crate::request::parse_line(r#"{"type":"create_issue","title":"t"}"#).unwrap();
        let mut ctx = ValidationContext::new();
        assert!(matches!(validate(&req, &config, &mut ctx), Err(ValidationError::MissingField("body"))));
    }

    #[test]
    fn cap_is_enforced_across_the_batch() {
        let config = config_with(
            SafeOutputKind::CreateIssue,
            SafeOutputEntry {
                max: Some(1),
                ..Default::default()
            },
        );
        let mut ctx = ValidationContext::new();
        let req = crate::request::parse_line(r#"{"type":"create_issue","title":"t","body":"b"}"#).unwrap();
        assert!(validate(&req, &config, &mut ctx).is_ok());
        assert!(matches!(validate(&req, &config, &mut ctx), Err(ValidationError::CapExceeded(_, 1))));
    }

    #[test]
    fn blocked_glob_labels_are_dropped_others_kept() {
        let entry = SafeOutputEntry {
            blocked: vec!["~*".to_string(), "\\**".to_string()],
            max: Some(5),
            ..Default::default()
        };
        let labels = vec![
            "bug".to_string(),
            "~triage".to_string(),
            "*admin".to_string(),
            "enhancement".to_string(),
            "documentation".to_string(),
        ];
        let outcome = filter_labels(&labels, &entry);
        assert_eq!(outcome.accepted, vec!["bug", "enhancement", "documentation"]);
        assert_eq!(outcome.dropped.len(), 2);
    }

    #[test]
    fn non_configured_kind_is_rejected() {
        let config = SafeOutputsConfig::default();
        let req = crate::request::parse_line(r#"{"type":"create_issue","title":"t","body":"b"}"#).unwrap();
        let mut ctx = ValidationContext::new();
        assert!(matches!(validate(&req, &config, &mut ctx), Err(ValidationError::KindNotConfigured(_))));
    }
}
