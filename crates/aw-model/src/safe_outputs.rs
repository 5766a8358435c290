//! The `safe-outputs:` config, as parsed into [`WorkflowData`](crate::WorkflowData)
//! by C4 (spec §3, §4.7). Planning the per-kind handler jobs from this
//! config is `aw-safe-outputs`'s job (C7); this module only owns the
//! closed set of kinds and the config shape each one carries.

use aw_core::OrderedMap;

/// The closed set of safe-output kinds (spec §4.7 table). Each variant
/// carries the kind-specific cap/filter fields; the common `max` lives on
/// every variant via [`SafeOutputEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafeOutputKind {
    CreateIssue,
    AddComment,
    AddLabels,
    CreatePullRequest,
    CreatePullRequestReviewComment,
    UpdateProject,
    CreateProjectStatusUpdate,
    CreateDiscussion,
    UploadAsset,
    DispatchWorkflow,
    AssignToAgent,
    MissingTool,
}

impl SafeOutputKind {
    pub const ALL: &'static [SafeOutputKind] = &[
        SafeOutputKind::CreateIssue,
        SafeOutputKind::AddComment,
        SafeOutputKind::AddLabels,
        SafeOutputKind::CreatePullRequest,
        SafeOutputKind::CreatePullRequestReviewComment,
        SafeOutputKind::UpdateProject,
        SafeOutputKind::CreateProjectStatusUpdate,
        SafeOutputKind::CreateDiscussion,
        SafeOutputKind::UploadAsset,
        SafeOutputKind::DispatchWorkflow,
        SafeOutputKind::AssignToAgent,
        SafeOutputKind::MissingTool,
    ];

    /// The front-matter key (dash-spelled, spec §4.2 schema).
    pub fn front_matter_key(self) -> &'static str {
        match self {
            SafeOutputKind::CreateIssue => "create-issue",
            SafeOutputKind::AddComment => "add-comment",
            SafeOutputKind::AddLabels => "add-labels",
            SafeOutputKind::CreatePullRequest => "create-pull-request",
            SafeOutputKind::CreatePullRequestReviewComment => "create-pull-request-review-comment",
            SafeOutputKind::UpdateProject => "update-project",
            SafeOutputKind::CreateProjectStatusUpdate => "create-project-status-update",
            SafeOutputKind::CreateDiscussion => "create-discussion",
            SafeOutputKind::UploadAsset => "upload-asset",
            SafeOutputKind::DispatchWorkflow => "dispatch-workflow",
            SafeOutputKind::AssignToAgent => "assign-to-agent",
            SafeOutputKind::MissingTool => "missing-tool",
        }
    }

    /// The JSON-Lines `type` tag an agent writes to `GH_AW_SAFE_OUTPUTS`
    /// (spec §4.7: "snake_case_kind").
    pub fn wire_type(self) -> &'static str {
        match self {
            SafeOutputKind::CreateIssue => "create_issue",
            SafeOutputKind::AddComment => "add_comment",
            SafeOutputKind::AddLabels => "add_labels",
            SafeOutputKind::CreatePullRequest => "create_pull_request",
            SafeOutputKind::CreatePullRequestReviewComment => "create_pull_request_review_comment",
            SafeOutputKind::UpdateProject => "update_project",
            SafeOutputKind::CreateProjectStatusUpdate => "create_project_status_update",
            SafeOutputKind::CreateDiscussion => "create_discussion",
            SafeOutputKind::UploadAsset => "upload_asset",
            SafeOutputKind::DispatchWorkflow => "dispatch_workflow",
            SafeOutputKind::AssignToAgent => "assign_to_agent",
            SafeOutputKind::MissingTool => "missing_tool",
        }
    }

    pub fn from_front_matter_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.front_matter_key() == key)
    }

    pub fn from_wire_type(wire: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.wire_type() == wire)
    }

    /// Whether this kind is diagnostic-only (spec §4.7: `missing_tool` has
    /// no cap key and no handler job permissions to scope).
    pub fn is_diagnostic_only(self) -> bool {
        matches!(self, SafeOutputKind::MissingTool)
    }
}

/// One configured safe-output kind's cap + filters (spec §4.7).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SafeOutputEntry {
    pub max: Option<u32>,
    pub title_prefix: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub expires: Option<String>,
    pub hide_older_comments: bool,
    pub target: Option<String>,
    pub allowed: Vec<String>,
    pub blocked: Vec<String>,
    pub reviewers: Vec<String>,
    pub draft: bool,
    pub create_if_missing: bool,
    pub close_older_discussions: bool,
    pub allowed_exts: Vec<String>,
    pub workflows: Vec<String>,
}

impl SafeOutputEntry {
    /// Default allow-list for `upload-asset` (spec §4.7).
    pub const DEFAULT_ALLOWED_EXTS: &'static [&'static str] = &[".png", ".jpg", ".jpeg"];

    /// The effective cap, defaulting per spec's closed-set semantics:
    /// every kind except `missing-tool` requires a bounded `max` (spec §3
    /// invariant); C4 fills in a conservative default of 1 when the user
    /// omits it.
    pub fn effective_max(&self) -> u32 {
        self.max.unwrap_or(1)
    }
}

/// The full `safe-outputs:` config (spec §3, §4.7).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SafeOutputsConfig {
    pub entries: OrderedMap<SafeOutputKind, SafeOutputEntry>,
    /// Staged mode (spec §4.7): emit only a diff preview, omit side-effect
    /// steps.
    pub staged: bool,
}

impl SafeOutputsConfig {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self, kind: SafeOutputKind) -> Option<&SafeOutputEntry> {
        self.entries.get(&kind)
    }

    /// Whether any configured kind needs `contents: write` (asset
    /// branches) — used by C4's default-permissions derivation.
    pub fn needs_contents_write(&self) -> bool {
        self.entries.contains_key(&SafeOutputKind::UploadAsset)
    }

    /// Whether any configured kind needs `issues: write`.
    pub fn needs_issues_write(&self) -> bool {
        self.entries.contains_key(&SafeOutputKind::CreateIssue)
            || self.entries.contains_key(&SafeOutputKind::AddComment)
            || self.entries.contains_key(&SafeOutputKind::AddLabels)
    }

    /// Whether any configured kind needs `pull-requests: write`.
    pub fn needs_pull_requests_write(&self) -> bool {
        self.entries.contains_key(&SafeOutputKind::CreatePullRequest)
            || self
                .entries
                .contains_key(&SafeOutputKind::CreatePullRequestReviewComment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_round_trips_through_front_matter_key() {
        for kind in SafeOutputKind::ALL {
            let key = kind.front_matter_key();
            assert_eq!(SafeOutputKind::from_front_matter_key(key), Some(*kind));
        }
    }

    #[test]
    fn missing_tool_is_diagnostic_only() {
        assert!(SafeOutputKind::MissingTool.is_diagnostic_only());
        assert!(!SafeOutputKind::CreateIssue.is_diagnostic_only());
    }

    #[test]
    fn effective_max_defaults_to_one() {
        let entry = SafeOutputEntry::default();
        assert_eq!(entry.effective_max(), 1);
    }
}
