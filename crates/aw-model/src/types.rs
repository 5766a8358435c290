//! `WorkflowData` (spec §3): the compiler's central value. Built once per
//! source by [`crate::build::build`], consumed only by the lowering passes
//! in `aw-schedule`, `aw-jobs`, `aw-safe-outputs`, and finally `aw-yaml`.

use aw_core::OrderedMap;
use serde_yaml::Value;

/// One entry in `on:` (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub event: EventKind,
    pub types: Vec<String>,
    pub branches: Vec<String>,
    pub paths: Vec<String>,
    /// Label filter (`names:` — the spec's term for issue/PR label
    /// narrowing, not to be confused with the workflow `name:`).
    pub names: Vec<String>,
    pub forks: ForkPolicy,
    pub lock_for_agent: bool,
    pub reaction: Option<String>,
    pub stop_after: Option<String>,
    pub skip_if_match: Option<SkipCondition>,
    pub skip_if_no_match: Option<SkipCondition>,
    pub manual_approval: Option<String>,
    pub inputs: OrderedMap<String, WorkflowDispatchInput>,
    /// The fuzzy schedule expression as written (`Event::Schedule` only),
    /// consumed by C5 and replaced with [`cron`](Self::cron).
    pub raw_schedule: Option<String>,
    /// Raw cron string, set only on `Event::Schedule` after C5 lowering.
    pub cron: Option<String>,
}

impl EventSpec {
    pub fn new(event: EventKind) -> Self {
        Self {
            event,
            types: Vec::new(),
            branches: Vec::new(),
            paths: Vec::new(),
            names: Vec::new(),
            forks: ForkPolicy::default(),
            lock_for_agent: false,
            reaction: None,
            stop_after: None,
            skip_if_match: None,
            skip_if_no_match: None,
            manual_approval: None,
            inputs: OrderedMap::new(),
            raw_schedule: None,
            cron: None,
        }
    }
}

/// The closed set of events a workflow may trigger on (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    IssueComment,
    PullRequestReviewComment,
    Discussion,
    DiscussionComment,
    Schedule,
    WorkflowDispatch,
    WorkflowRun,
    SlashCommand,
    StatusComment,
}

impl EventKind {
    pub const ALL: &'static [EventKind] = &[
        EventKind::Push,
        EventKind::PullRequest,
        EventKind::Issues,
        EventKind::IssueComment,
        EventKind::PullRequestReviewComment,
        EventKind::Discussion,
        EventKind::DiscussionComment,
        EventKind::Schedule,
        EventKind::WorkflowDispatch,
        EventKind::WorkflowRun,
        EventKind::SlashCommand,
        EventKind::StatusComment,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "push" => EventKind::Push,
            "pull_request" => EventKind::PullRequest,
            "issues" => EventKind::Issues,
            "issue_comment" => EventKind::IssueComment,
            "pull_request_review_comment" => EventKind::PullRequestReviewComment,
            "discussion" => EventKind::Discussion,
            "discussion_comment" => EventKind::DiscussionComment,
            "schedule" => EventKind::Schedule,
            "workflow_dispatch" => EventKind::WorkflowDispatch,
            "workflow_run" => EventKind::WorkflowRun,
            "slash_command" => EventKind::SlashCommand,
            "status_comment" => EventKind::StatusComment,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Push => "push",
            EventKind::PullRequest => "pull_request",
            EventKind::Issues => "issues",
            EventKind::IssueComment => "issue_comment",
            EventKind::PullRequestReviewComment => "pull_request_review_comment",
            EventKind::Discussion => "discussion",
            EventKind::DiscussionComment => "discussion_comment",
            EventKind::Schedule => "schedule",
            EventKind::WorkflowDispatch => "workflow_dispatch",
            EventKind::WorkflowRun => "workflow_run",
            EventKind::SlashCommand => "slash_command",
            EventKind::StatusComment => "status_comment",
        }
    }

    /// The GitHub Actions event name this lowers to in the emitted `on:`
    /// block. `slash_command` and `status_comment` are workflow-level
    /// sugar over real GitHub events (spec §4.5).
    pub fn github_event_name(self) -> &'static str {
        match self {
            EventKind::SlashCommand | EventKind::StatusComment => "issue_comment",
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForkPolicy {
    #[default]
    Deny,
    Allow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkipCondition {
    pub query: String,
    pub min: u32,
    pub max: u32,
}

impl SkipCondition {
    pub const DEFAULT_MIN: u32 = 1;
    pub const DEFAULT_MAX: u32 = 1;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDispatchInput {
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<String>,
    pub input_type: String,
}

/// Permissions block (spec §3): either the read-all/write-all/none scalar,
/// or a per-scope mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Permissions {
    ReadAll,
    WriteAll,
    None,
    Scoped(OrderedMap<String, PermissionLevel>),
}

/// The full set of scopes GitHub Actions recognizes in a `permissions:`
/// block, used to expand `read-all` into an explicit per-scope mapping
/// when one scope needs to be escalated past what `read-all` grants.
pub const ALL_PERMISSION_SCOPES: &[&str] = &[
    "actions",
    "checks",
    "contents",
    "deployments",
    "discussions",
    "id-token",
    "issues",
    "packages",
    "pages",
    "pull-requests",
    "repository-projects",
    "security-events",
    "statuses",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLevel {
    Read,
    Write,
    None,
}

impl PermissionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::None => "none",
        }
    }
}

/// Engine tag plus per-engine config (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub id: EngineId,
    pub model: Option<String>,
    pub reasoning_effort: Option<String>,
    pub args: Vec<String>,
    pub steps: Option<Value>,
}

impl Engine {
    pub fn simple(id: EngineId) -> Self {
        Self {
            id,
            model: None,
            reasoning_effort: None,
            args: Vec::new(),
            steps: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineId {
    Claude,
    Codex,
    Copilot,
    CopilotSdk,
    Gemini,
    Openclaw,
    Custom,
}

impl EngineId {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "claude" => EngineId::Claude,
            "codex" => EngineId::Codex,
            "copilot" => EngineId::Copilot,
            "copilot-sdk" => EngineId::CopilotSdk,
            "gemini" => EngineId::Gemini,
            "openclaw" => EngineId::Openclaw,
            "custom" => EngineId::Custom,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineId::Claude => "claude",
            EngineId::Codex => "codex",
            EngineId::Copilot => "copilot",
            EngineId::CopilotSdk => "copilot-sdk",
            EngineId::Gemini => "gemini",
            EngineId::Openclaw => "openclaw",
            EngineId::Custom => "custom",
        }
    }

    /// Default `timeout-minutes` for this engine (spec §4.4: "derived from
    /// engine").
    pub fn default_timeout_minutes(self) -> u32 {
        match self {
            EngineId::Claude | EngineId::Codex | EngineId::Gemini => 20,
            EngineId::Copilot | EngineId::CopilotSdk => 15,
            EngineId::Openclaw | EngineId::Custom => 30,
        }
    }
}

/// A single MCP/tool entry under `tools:` (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub enum ToolConfig {
    /// `bash: true|false` or a list of allowed command globs.
    Bash(BashConfig),
    Edit,
    Github(GithubToolConfig),
    Playwright(PlaywrightConfig),
    CacheMemory { key: Option<String> },
    RepoMemory(RepoMemoryConfig),
    Mcp(McpServerConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BashConfig {
    Enabled(bool),
    Globs(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GithubToolConfig {
    pub toolsets: Vec<String>,
    pub token: Option<String>,
    pub mode: GithubToolMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GithubToolMode {
    #[default]
    Local,
    Docker,
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaywrightConfig {
    pub allowed_domains: Vec<String>,
    pub args: Vec<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepoMemoryConfig {
    pub branch_name: String,
    pub file_glob: Option<String>,
    pub max_file_size: Option<u64>,
}

/// An MCP server's transport (spec §3: "exactly one transport").
#[derive(Debug, Clone, PartialEq)]
pub struct McpServerConfig {
    pub name: String,
    pub transport: McpTransport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum McpTransport {
    Stdio { command: String, args: Vec<String> },
    Container { image: String, args: Vec<String> },
    Http { url: String, headers: OrderedMap<String, String> },
}

/// Egress allow-list (spec §3, §4.4 "localhost is always injected").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkPolicy {
    pub allowed: Vec<String>,
    pub ecosystems: Vec<EcosystemBundle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcosystemBundle {
    Defaults,
    Github,
    Node,
    Python,
    Containers,
}

impl EcosystemBundle {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "defaults" => EcosystemBundle::Defaults,
            "github" => EcosystemBundle::Github,
            "node" => EcosystemBundle::Node,
            "python" => EcosystemBundle::Python,
            "containers" => EcosystemBundle::Containers,
            _ => return None,
        })
    }

    /// Domains this bundle expands to, deterministic and fixed (spec §4.4).
    pub fn domains(self) -> &'static [&'static str] {
        match self {
            EcosystemBundle::Defaults => &["api.github.com", "github.com"],
            EcosystemBundle::Github => &["github.com", "*.github.com", "githubusercontent.com", "*.githubusercontent.com"],
            EcosystemBundle::Node => &["registry.npmjs.org", "*.npmjs.org"],
            EcosystemBundle::Python => &["pypi.org", "*.pypi.org", "files.pythonhosted.org"],
            EcosystemBundle::Containers => &["ghcr.io", "docker.io", "*.docker.io"],
        }
    }
}

pub const LOCALHOST_ALLOWLIST: &[&str] = &["localhost", "localhost:*", "127.0.0.1", "127.0.0.1:*"];

/// A user-authored custom job spliced into the planned graph via `needs`
/// (spec §4.6).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomJob {
    pub id: String,
    pub runs_on: Option<String>,
    pub needs: Vec<String>,
    pub steps: Value,
    pub env: OrderedMap<String, String>,
    pub permissions: Option<Permissions>,
    pub if_condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Concurrency {
    pub group: Option<String>,
    pub cancel_in_progress: bool,
}

/// The compiler's central value (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowData {
    pub name: String,
    pub description: Option<String>,
    pub on: Vec<EventSpec>,
    pub permissions: Permissions,
    pub engine: Engine,
    pub tools: OrderedMap<String, ToolConfig>,
    pub safe_outputs: crate::safe_outputs::SafeOutputsConfig,
    pub network: NetworkPolicy,
    pub steps: Option<Value>,
    pub custom_jobs: Vec<CustomJob>,
    pub concurrency: Concurrency,
    pub timeout_minutes: u32,
    pub runs_on: Value,
    pub env: OrderedMap<String, String>,
    pub strict: bool,
    pub imports: Vec<(String, Option<String>)>,
    /// Path of the source file, used by the fuzzy scheduler for scatter
    /// (spec §4.5, §9 "deterministic on `sha(workflow-file-path)`").
    pub source_path: std::path::PathBuf,
}

impl WorkflowData {
    /// Spec §3 invariant: `lock-for-agent` implies `issues: write`.
    pub fn requires_issues_write(&self) -> bool {
        self.on.iter().any(|e| e.lock_for_agent)
    }
}
