//! Enumerates the per-output-kind handler jobs a configured `safe-outputs:`
//! block needs (spec §4.7, component C7). Each handler gets the minimum
//! `permissions:` block its kind requires.

use aw_model::{PermissionLevel, SafeOutputKind, SafeOutputsConfig};

/// One planned handler job for a configured safe-output kind.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerJob {
    pub kind: SafeOutputKind,
    pub permissions: Vec<(&'static str, PermissionLevel)>,
    pub max: u32,
}

/// Minimum permissions scope needed to execute `kind`'s side effect
/// (spec §4.7: "scoped permissions derived from the kind").
pub fn permissions_for(kind: SafeOutputKind) -> Vec<(&'static str, PermissionLevel)> {
    use PermissionLevel::Write;
    match kind {
        SafeOutputKind::CreateIssue | SafeOutputKind::AddComment | SafeOutputKind::AddLabels => {
            vec![("issues", Write)]
        }
        SafeOutputKind::CreatePullRequest | SafeOutputKind::CreatePullRequestReviewComment => {
            vec![("pull-requests", Write), ("contents", Write)]
        }
        SafeOutputKind::UpdateProject | SafeOutputKind::CreateProjectStatusUpdate => {
            // Project-scoped token, not a repo permission (spec §4.7) —
            // the job still needs read-only repo access to resolve the
            // issue/PR it's updating.
            vec![]
        }
        SafeOutputKind::CreateDiscussion => vec![("discussions", Write)],
        SafeOutputKind::UploadAsset => vec![("contents", Write)],
        SafeOutputKind::DispatchWorkflow => vec![("actions", Write)],
        SafeOutputKind::AssignToAgent => vec![("issues", Write)],
        SafeOutputKind::MissingTool => vec![],
    }
}

/// Enumerate the handler jobs a configured `safe-outputs:` block needs, in
/// the kind's canonical order (spec §4.7 table order) so planning is
/// deterministic. `missing_tool` never gets a handler job (spec: "diagnostic-only").
pub fn plan_handlers(config: &SafeOutputsConfig) -> Vec<HandlerJob> {
    SafeOutputKind::ALL
        .iter()
        .filter(|kind| !kind.is_diagnostic_only())
        .filter_map(|kind| {
            let entry = config.kind(*kind)?;
            Some(HandlerJob {
                kind: *kind,
                permissions: permissions_for(*kind),
                max: entry.effective_max(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_model::SafeOutputEntry;

    #[test]
    fn plans_one_handler_per_configured_kind() {
        let mut config = SafeOutputsConfig::default();
        config.entries.insert(
            SafeOutputKind::CreateIssue,
            SafeOutputEntry {
                max: Some(3),
                ..Default::default()
            },
        );
        config.entries.insert(SafeOutputKind::MissingTool, SafeOutputEntry::default());

        let handlers = plan_handlers(&config);
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].kind, SafeOutputKind::CreateIssue);
        assert_eq!(handlers[0].max, 3);
    }

    #[test]
    fn create_pull_request_needs_contents_and_pr_write() {
        let perms = permissions_for(SafeOutputKind::CreatePullRequest);
        assert!(perms.contains(&("pull-requests", PermissionLevel::Write)));
        assert!(perms.contains(&("contents", PermissionLevel::Write)));
    }
}
