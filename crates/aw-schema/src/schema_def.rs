//! The concrete front-matter header schema (spec §3 `WorkflowData`, §4.2).
//!
//! This models the header shape closely enough to catch the typo classes
//! spec §8 tests for (`permisions`, `engine: coplit`, `timeout_minutes`)
//! while keeping every object schema closed (`additional_properties:
//! false`) except the genuinely free-form maps the spec itself calls out
//! (`env:`, a tool's `with:`-shaped config, arbitrary MCP server entries).

use crate::types::{FieldSchema, ObjectSchema, SchemaType};

const EVENT_NAMES: &[&str] = &[
    "push",
    "pull_request",
    "issues",
    "issue_comment",
    "pull_request_review_comment",
    "discussion",
    "discussion_comment",
    "schedule",
    "workflow_dispatch",
    "workflow_run",
    "slash_command",
    "status_comment",
];

const ENGINE_NAMES: &[&str] = &[
    "claude",
    "codex",
    "copilot",
    "copilot-sdk",
    "gemini",
    "openclaw",
    "custom",
];

const SAFE_OUTPUT_KINDS: &[&str] = &[
    "create-issue",
    "add-comment",
    "add-labels",
    "create-pull-request",
    "create-pull-request-review-comment",
    "update-project",
    "create-project-status-update",
    "create-discussion",
    "upload-asset",
    "dispatch-workflow",
    "assign-to-agent",
    "missing-tool",
];

fn on_schema() -> SchemaType {
    let fields = EVENT_NAMES
        .iter()
        .map(|name| FieldSchema::optional(name, SchemaType::Any))
        .collect();
    SchemaType::Union(vec![
        SchemaType::String, // slash-command / label shorthand, e.g. "/cmd"
        SchemaType::Object(ObjectSchema::strict(fields)),
    ])
}

fn permissions_schema() -> SchemaType {
    SchemaType::Union(vec![
        SchemaType::Enum(vec!["read-all", "write-all", "none"]),
        SchemaType::Object(ObjectSchema::open(Vec::new())),
    ])
}

fn engine_schema() -> SchemaType {
    SchemaType::Union(vec![
        SchemaType::Enum(ENGINE_NAMES.to_vec()),
        SchemaType::Object(ObjectSchema::strict(vec![
            FieldSchema::required("id", SchemaType::Enum(ENGINE_NAMES.to_vec())),
            FieldSchema::optional("model", SchemaType::String),
            FieldSchema::optional("reasoning-effort", SchemaType::String),
            FieldSchema::optional("args", SchemaType::Array(Box::new(SchemaType::String))),
            FieldSchema::optional("steps", SchemaType::Any),
        ])),
    ])
}

fn tool_entry_schema() -> SchemaType {
    // Individual tool configs vary by tool (bash is bool|list, github has
    // toolsets/token/mode, playwright has allowed_domains, MCP entries have
    // a transport). Rather than duplicate the whole per-tool shape here
    // (the WorkflowData builder in aw-model is where each tool's config is
    // actually consumed), accept any shape and let semantic lowering (C4)
    // reject nonsensical combinations.
    SchemaType::Any
}

fn tools_schema() -> SchemaType {
    SchemaType::Object(ObjectSchema::open(vec![
        FieldSchema::optional("bash", tool_entry_schema()),
        FieldSchema::optional("edit", tool_entry_schema()),
        FieldSchema::optional("github", tool_entry_schema()),
        FieldSchema::optional("playwright", tool_entry_schema()),
        FieldSchema::optional("cache-memory", tool_entry_schema()),
        FieldSchema::optional("repo-memory", tool_entry_schema()),
    ]))
}

fn safe_output_kind_schema() -> SchemaType {
    SchemaType::Object(ObjectSchema::open(vec![
        FieldSchema::optional("max", SchemaType::Integer),
        // Still recognized but slated for removal (spec §4.2 "deprecated
        // fields" — detected by description convention, emits a warning
        // rather than an unknown-property error).
        FieldSchema::deprecated("max-count", "max"),
    ]))
}

fn safe_outputs_schema() -> SchemaType {
    let mut fields: Vec<FieldSchema> = SAFE_OUTPUT_KINDS
        .iter()
        .map(|kind| FieldSchema::optional(kind, safe_output_kind_schema()))
        .collect();
    fields.push(FieldSchema::optional("staged", SchemaType::Boolean));
    SchemaType::Object(ObjectSchema::strict(fields))
}

fn network_schema() -> SchemaType {
    SchemaType::Object(ObjectSchema::strict(vec![
        FieldSchema::optional("allowed", SchemaType::Array(Box::new(SchemaType::String))),
        FieldSchema::optional("ecosystems", SchemaType::Array(Box::new(SchemaType::String))),
    ]))
}

/// The schema for a top-level workflow's front-matter header. Import-site
/// headers use [`import_header_schema`] instead (a subset — spec §4.3).
pub fn workflow_header_schema() -> ObjectSchema {
    ObjectSchema::strict(vec![
        FieldSchema::required("name", SchemaType::String),
        FieldSchema::optional("description", SchemaType::String),
        FieldSchema::required("on", on_schema()),
        FieldSchema::optional("permissions", permissions_schema()),
        FieldSchema::optional("engine", engine_schema()),
        FieldSchema::optional("tools", tools_schema()),
        FieldSchema::optional("safe-outputs", safe_outputs_schema()),
        FieldSchema::optional("network", network_schema()),
        FieldSchema::optional("steps", SchemaType::Any),
        FieldSchema::optional("jobs", SchemaType::Any),
        FieldSchema::optional("concurrency", SchemaType::Any),
        FieldSchema::optional("timeout-minutes", SchemaType::Integer),
        FieldSchema::optional("runs-on", SchemaType::Any),
        FieldSchema::optional("env", SchemaType::Object(ObjectSchema::open(Vec::new()))),
        FieldSchema::optional("strict", SchemaType::Boolean),
        FieldSchema::optional("imports", SchemaType::Array(Box::new(SchemaType::String))),
        FieldSchema::optional("stop-after", SchemaType::Any),
        FieldSchema::optional("skip-if-match", SchemaType::Any),
        FieldSchema::optional("skip-if-no-match", SchemaType::Any),
        // Note: old underscore spellings (`timeout_minutes`, `runs_on`,
        // `safe_outputs`) are *not* listed here at all — spec §4.2 says
        // fields removed outright from the schema should surface as plain
        // unknown-property errors with a rename suggestion, which the
        // closest-match machinery already produces unprompted (distance 1
        // from their dash-spelled replacements).
    ])
}

/// Subset schema used when validating an imported fragment's own header
/// (spec §4.3): forbids top-level-only fields like `on:`, `permissions:`,
/// `jobs:`, since those only make sense on the entry-point workflow.
pub fn import_header_schema() -> ObjectSchema {
    ObjectSchema::strict(vec![
        FieldSchema::optional("description", SchemaType::String),
        FieldSchema::optional("tools", tools_schema()),
        FieldSchema::optional("safe-outputs", safe_outputs_schema()),
        FieldSchema::optional("network", network_schema()),
        FieldSchema::optional("steps", SchemaType::Any),
        FieldSchema::optional("env", SchemaType::Object(ObjectSchema::open(Vec::new()))),
        FieldSchema::optional("mcp-servers", SchemaType::Object(ObjectSchema::open(Vec::new()))),
    ])
}
