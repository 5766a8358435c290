//! Builds the `.lock.yml` YAML tree from a [`WorkflowData`] and its
//! planned [`JobPlan`] (spec §4.8, component C8), then serializes it with
//! the deterministic key ordering and text-level fixups the format needs.

use aw_jobs::{JobGraph, JobKind, JobPlan};
use aw_model::{BashConfig, GithubToolMode, LOCALHOST_ALLOWLIST, McpTransport, NetworkPolicy, Permissions, ToolConfig, WorkflowData};
use serde_yaml::{Mapping, Value};

use crate::banner::{ImportRecord, PromptComponent, render_banner};
use crate::ordering::{JOB_ORDER, STEP_ORDER, TOP_LEVEL_ORDER, reorder};
use crate::postprocess::postprocess;

fn str_value(s: impl Into<String>) -> Value {
    Value::String(s.into())
}

fn step(name: &str, run: impl Into<String>) -> Value {
    let mut m = Mapping::new();
    m.insert(str_value("name"), str_value(name));
    m.insert(str_value("run"), str_value(run));
    Value::Mapping(reorder(m, STEP_ORDER))
}

fn step_with_env(name: &str, run: impl Into<String>, env: Mapping) -> Value {
    let mut m = Mapping::new();
    m.insert(str_value("name"), str_value(name));
    m.insert(str_value("run"), str_value(run));
    if !env.is_empty() {
        m.insert(str_value("env"), Value::Mapping(env));
    }
    Value::Mapping(reorder(m, STEP_ORDER))
}

fn uses_step(name: &str, uses: impl Into<String>) -> Value {
    let mut m = Mapping::new();
    m.insert(str_value("name"), str_value(name));
    m.insert(str_value("uses"), str_value(uses));
    Value::Mapping(reorder(m, STEP_ORDER))
}

fn uses_step_with(name: &str, uses: impl Into<String>, with: Mapping) -> Value {
    let mut m = Mapping::new();
    m.insert(str_value("name"), str_value(name));
    m.insert(str_value("uses"), str_value(uses));
    m.insert(str_value("with"), Value::Mapping(with));
    Value::Mapping(reorder(m, STEP_ORDER))
}

fn artifact_with(name: &str, path: &str) -> Mapping {
    let mut m = Mapping::new();
    m.insert(str_value("name"), str_value(name));
    m.insert(str_value("path"), str_value(path));
    m
}

/// A compact, JSON-shaped rendering of a `serde_yaml::Value`, used only
/// to pack structured config (tool lists, MCP transports) into a single
/// env-var string. Not a general-purpose encoder: strings are escaped
/// with Rust's own `Debug` formatting, which agrees with JSON for the
/// ASCII text this module ever feeds it.
fn value_to_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Sequence(seq) => format!("[{}]", seq.iter().map(value_to_json).collect::<Vec<_>>().join(",")),
        Value::Mapping(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}:{}", value_to_json(k), value_to_json(v)))
                .collect::<Vec<_>>()
                .join(",")
        ),
        Value::Tagged(tagged) => value_to_json(&tagged.value),
    }
}

/// Summarize `tools:` into a `Value` tree suitable for [`value_to_json`],
/// carrying every field the config actually has (spec §3 tools schema).
fn tools_summary(tools: &aw_core::OrderedMap<String, ToolConfig>) -> Value {
    let mut map = Mapping::new();
    for (name, config) in tools {
        let entry = match config {
            ToolConfig::Bash(BashConfig::Enabled(enabled)) => Value::Bool(*enabled),
            ToolConfig::Bash(BashConfig::Globs(globs)) => Value::Sequence(globs.iter().cloned().map(str_value).collect()),
            ToolConfig::Edit => Value::Bool(true),
            ToolConfig::Github(github) => {
                let mut m = Mapping::new();
                m.insert(
                    str_value("toolsets"),
                    Value::Sequence(github.toolsets.iter().cloned().map(str_value).collect()),
                );
                m.insert(
                    str_value("mode"),
                    str_value(match github.mode {
                        GithubToolMode::Local => "local",
                        GithubToolMode::Docker => "docker",
                        GithubToolMode::Remote => "remote",
                    }),
                );
                Value::Mapping(m)
            }
            ToolConfig::Playwright(playwright) => {
                let mut m = Mapping::new();
                m.insert(
                    str_value("allowed_domains"),
                    Value::Sequence(playwright.allowed_domains.iter().cloned().map(str_value).collect()),
                );
                if let Some(version) = &playwright.version {
                    m.insert(str_value("version"), str_value(version.clone()));
                }
                Value::Mapping(m)
            }
            ToolConfig::CacheMemory { key } => {
                let mut m = Mapping::new();
                if let Some(key) = key {
                    m.insert(str_value("key"), str_value(key.clone()));
                }
                Value::Mapping(m)
            }
            ToolConfig::RepoMemory(repo_memory) => {
                let mut m = Mapping::new();
                m.insert(str_value("branch-name"), str_value(repo_memory.branch_name.clone()));
                if let Some(glob) = &repo_memory.file_glob {
                    m.insert(str_value("file-glob"), str_value(glob.clone()));
                }
                Value::Mapping(m)
            }
            ToolConfig::Mcp(mcp) => {
                let mut m = Mapping::new();
                m.insert(str_value("transport"), mcp_transport_summary(&mcp.transport));
                Value::Mapping(m)
            }
        };
        map.insert(str_value(name.clone()), entry);
    }
    Value::Mapping(map)
}

fn mcp_transport_summary(transport: &McpTransport) -> Value {
    match transport {
        McpTransport::Stdio { command, .. } => str_value(format!("stdio:{command}")),
        McpTransport::Container { image, .. } => str_value(format!("container:{image}")),
        McpTransport::Http { url, .. } => str_value(format!("http:{url}")),
    }
}

/// The egress allow-list actually in effect: the always-on localhost
/// allowlist, the fixed domains of every declared ecosystem bundle, then
/// the user's own `allowed` entries (spec §4.4).
fn network_allowed_domains(network: &NetworkPolicy) -> Vec<String> {
    let mut domains: Vec<String> = LOCALHOST_ALLOWLIST.iter().map(|s| s.to_string()).collect();
    for bundle in &network.ecosystems {
        for domain in bundle.domains() {
            if !domains.iter().any(|existing| existing == domain) {
                domains.push((*domain).to_string());
            }
        }
    }
    for domain in &network.allowed {
        if !domains.contains(domain) {
            domains.push(domain.clone());
        }
    }
    domains
}

fn build_on(data: &WorkflowData) -> Value {
    let mut on = Mapping::new();
    for event in &data.on {
        let key = str_value(event.event.github_event_name());
        let mut body = Mapping::new();
        if !event.types.is_empty() {
            body.insert(
                str_value("types"),
                Value::Sequence(event.types.iter().cloned().map(str_value).collect()),
            );
        }
        if !event.branches.is_empty() {
            body.insert(
                str_value("branches"),
                Value::Sequence(event.branches.iter().cloned().map(str_value).collect()),
            );
        }
        if !event.paths.is_empty() {
            body.insert(
                str_value("paths"),
                Value::Sequence(event.paths.iter().cloned().map(str_value).collect()),
            );
        }
        if let Some(cron) = &event.cron {
            body.insert(
                str_value("schedule"),
                Value::Sequence(vec![{
                    let mut m = Mapping::new();
                    m.insert(str_value("cron"), str_value(cron.clone()));
                    Value::Mapping(m)
                }]),
            );
        }
        if !event.inputs.is_empty() {
            let mut inputs = Mapping::new();
            for (name, input) in &event.inputs {
                let mut m = Mapping::new();
                if let Some(description) = &input.description {
                    m.insert(str_value("description"), str_value(description.clone()));
                }
                m.insert(str_value("required"), Value::Bool(input.required));
                m.insert(str_value("type"), str_value(input.input_type.clone()));
                if let Some(default) = &input.default {
                    m.insert(str_value("default"), str_value(default.clone()));
                }
                inputs.insert(str_value(name.clone()), Value::Mapping(m));
            }
            body.insert(str_value("inputs"), Value::Mapping(inputs));
        }
        let merged = match on.get(&key) {
            Some(Value::Mapping(existing)) => {
                let mut merged = existing.clone();
                for (k, v) in body {
                    merged.insert(k, v);
                }
                Value::Mapping(merged)
            }
            _ => Value::Mapping(body),
        };
        on.insert(key, merged);
    }
    Value::Mapping(on)
}

fn build_permissions(permissions: &Permissions) -> Value {
    match permissions {
        Permissions::ReadAll => str_value("read-all"),
        Permissions::WriteAll => str_value("write-all"),
        Permissions::None => Value::Mapping(Mapping::new()),
        Permissions::Scoped(scopes) => {
            let mut m = Mapping::new();
            for (scope, level) in scopes {
                m.insert(str_value(scope.clone()), str_value(level.as_str()));
            }
            Value::Mapping(m)
        }
    }
}

/// Steps that run the chosen engine with its resolved tools/MCP servers
/// and publish the artifacts downstream jobs consume (spec §4.6). The
/// engine invocation itself stays an opaque placeholder — action scripts
/// that run at workflow execution time are out of scope — but the
/// engine/tools/network configuration now actually reaches the job via
/// `env:`, and a user's literal `steps:` override (top-level or nested
/// under `engine:`) replaces the synthesized steps entirely.
fn agent_steps(data: &WorkflowData, lock_for_agent: bool) -> Vec<Value> {
    if let Some(Value::Sequence(raw)) = data.steps.as_ref().or(data.engine.steps.as_ref()) {
        return raw.clone();
    }

    let mut env = Mapping::new();
    env.insert(str_value("GH_AW_ENGINE"), str_value(data.engine.id.as_str()));
    if let Some(model) = &data.engine.model {
        env.insert(str_value("GH_AW_ENGINE_MODEL"), str_value(model.clone()));
    }
    if let Some(effort) = &data.engine.reasoning_effort {
        env.insert(str_value("GH_AW_ENGINE_REASONING_EFFORT"), str_value(effort.clone()));
    }
    if !data.engine.args.is_empty() {
        env.insert(str_value("GH_AW_ENGINE_ARGS"), str_value(data.engine.args.join(" ")));
    }
    if !data.tools.is_empty() {
        env.insert(str_value("GH_AW_TOOLS"), str_value(value_to_json(&tools_summary(&data.tools))));
    }
    let allowed_domains = network_allowed_domains(&data.network);
    env.insert(str_value("GH_AW_NETWORK_ALLOWED"), str_value(allowed_domains.join(",")));

    let mut steps = vec![uses_step("Check out repository", "actions/checkout@v4")];
    if lock_for_agent {
        steps.push(step("Acquire agent lock", "gh api graphql -f query=@lock.graphql"));
    }
    steps.push(step_with_env("Run agent", "true", env));
    steps.push(uses_step_with(
        "Upload agent output",
        "actions/upload-artifact@v4",
        artifact_with("agent-output", "/tmp/gh-aw/agent-output/"),
    ));
    steps.push(uses_step_with(
        "Upload safe output",
        "actions/upload-artifact@v4",
        artifact_with("safe-output", "/tmp/gh-aw/safe-output/"),
    ));
    if !data.safe_outputs.is_empty() {
        steps.push(uses_step_with(
            "Upload agent memory",
            "actions/upload-artifact@v4",
            artifact_with("agent-memory", "/tmp/gh-aw/agent-memory/"),
        ));
    }
    steps
}

fn build_job(graph: &JobGraph, id: usize, lock_for_agent: bool, data: &WorkflowData) -> Value {
    let node = graph.job(id);
    let mut job = Mapping::new();
    job.insert(str_value("name"), str_value(node.name.clone()));

    let custom = match &node.kind {
        JobKind::Custom => data.custom_jobs.iter().find(|c| c.id == node.name),
        _ => None,
    };

    let runs_on = custom
        .and_then(|c| c.runs_on.as_ref())
        .map(|r| str_value(r.clone()))
        .unwrap_or_else(|| data.runs_on.clone());
    job.insert(str_value("runs-on"), runs_on);

    if let Some(permissions) = custom.and_then(|c| c.permissions.as_ref()) {
        job.insert(str_value("permissions"), build_permissions(permissions));
    } else if !node.permissions.is_empty() {
        let mut perms = Mapping::new();
        for (scope, level) in &node.permissions {
            perms.insert(str_value(*scope), str_value(level.as_str()));
        }
        job.insert(str_value("permissions"), Value::Mapping(perms));
    }

    let if_condition = custom.and_then(|c| c.if_condition.clone()).or_else(|| node.if_condition.clone());
    if let Some(cond) = if_condition {
        job.insert(str_value("if"), str_value(cond));
    }

    let needs = graph.needs(id);
    if !needs.is_empty() {
        let names: Vec<Value> = needs.iter().map(|&n| str_value(graph.job(n).name.clone())).collect();
        job.insert(
            str_value("needs"),
            if names.len() == 1 {
                names.into_iter().next().unwrap()
            } else {
                Value::Sequence(names)
            },
        );
    }

    if let Some(custom) = custom {
        if !custom.env.is_empty() {
            let mut env = Mapping::new();
            for (k, v) in &custom.env {
                env.insert(str_value(k.clone()), str_value(v.clone()));
            }
            job.insert(str_value("env"), Value::Mapping(env));
        }
    }

    let steps = match &node.kind {
        JobKind::Activation => vec![step("Evaluate activation guard", "true")],
        JobKind::Agent => agent_steps(data, lock_for_agent),
        JobKind::Detection => vec![
            uses_step_with(
                "Download agent output",
                "actions/download-artifact@v4",
                artifact_with("agent-output", "/tmp/gh-aw/agent-output/"),
            ),
            step("Extract safe-output requests", "true"),
        ],
        JobKind::SafeOutput(kind) => {
            let mut env = Mapping::new();
            if let Some(entry) = data.safe_outputs.kind(*kind) {
                env.insert(str_value("GH_AW_SAFE_OUTPUT_MAX"), Value::Number(entry.effective_max().into()));
                if !entry.allowed.is_empty() {
                    env.insert(str_value("GH_AW_SAFE_OUTPUT_ALLOWED"), str_value(entry.allowed.join(",")));
                }
                if !entry.blocked.is_empty() {
                    env.insert(str_value("GH_AW_SAFE_OUTPUT_BLOCKED"), str_value(entry.blocked.join(",")));
                }
            }
            vec![
                uses_step_with(
                    "Download safe output",
                    "actions/download-artifact@v4",
                    artifact_with("safe-output", "/tmp/gh-aw/safe-output/"),
                ),
                step_with_env("Handle safe output", format!("echo handling {}", kind.wire_type()), env),
            ]
        }
        JobKind::Conclusion if lock_for_agent => vec![
            step("Summarize run", "true"),
            step("Release agent lock", "gh api graphql -f query=@unlock.graphql"),
        ],
        JobKind::Conclusion => vec![step("Summarize run", "true")],
        JobKind::Custom => match custom.map(|c| &c.steps) {
            Some(Value::Sequence(seq)) if !seq.is_empty() => seq.clone(),
            _ => vec![step("Run custom job", "true")],
        },
    };
    if !steps.is_empty() {
        job.insert(str_value("steps"), Value::Sequence(steps));
    }

    Value::Mapping(reorder(job, JOB_ORDER))
}

/// Everything the emitter needs beyond what `WorkflowData`/`JobPlan`
/// already carry: the banner's provenance fields.
#[derive(Debug, Clone, Default)]
pub struct EmitContext {
    pub frontmatter_source: String,
    pub imports: Vec<ImportRecord>,
    pub prompt_components: Vec<PromptComponent>,
    pub creator_prompt: String,
}

pub fn emit(data: &WorkflowData, plan: &JobPlan, ctx: &EmitContext) -> String {
    let mut root = Mapping::new();
    root.insert(str_value("name"), str_value(data.name.clone()));
    root.insert(str_value("on"), build_on(data));
    root.insert(str_value("permissions"), build_permissions(&data.permissions));

    if !data.env.is_empty() {
        let mut env = Mapping::new();
        for (k, v) in &data.env {
            env.insert(str_value(k.clone()), str_value(v.clone()));
        }
        root.insert(str_value("env"), Value::Mapping(env));
    }

    if let Some(group) = &data.concurrency.group {
        let mut c = Mapping::new();
        c.insert(str_value("group"), str_value(group.clone()));
        c.insert(str_value("cancel-in-progress"), Value::Bool(data.concurrency.cancel_in_progress));
        root.insert(str_value("concurrency"), Value::Mapping(c));
    }

    let mut jobs = Mapping::new();
    for (id, node) in plan.graph.nodes().iter().enumerate() {
        jobs.insert(str_value(node.name.clone()), build_job(&plan.graph, id, plan.lock_for_agent, data));
    }
    root.insert(str_value("jobs"), Value::Mapping(jobs));

    let ordered = reorder(root, TOP_LEVEL_ORDER);
    let body = serde_yaml::to_string(&Value::Mapping(ordered)).unwrap_or_default();
    let banner = render_banner(&ctx.frontmatter_source, &ctx.imports, &ctx.prompt_components, &ctx.creator_prompt);
    postprocess(format!("{banner}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_model::{Concurrency, Engine, EngineId, EventKind, EventSpec};
    use std::path::PathBuf;

    fn sample_data() -> WorkflowData {
        WorkflowData {
            name: "nightly-digest".to_string(),
            description: None,
            on: vec![EventSpec::new(EventKind::WorkflowDispatch)],
            permissions: Permissions::ReadAll,
            engine: Engine::simple(EngineId::Claude),
            tools: Default::default(),
            safe_outputs: Default::default(),
            network: Default::default(),
            steps: None,
            custom_jobs: Vec::new(),
            concurrency: Concurrency {
                group: Some("nightly-digest-workflow_dispatch".to_string()),
                cancel_in_progress: false,
            },
            timeout_minutes: 20,
            runs_on: Value::String("ubuntu-latest".to_string()),
            env: Default::default(),
            strict: false,
            imports: Vec::new(),
            source_path: PathBuf::from(".github/workflows/nightly-digest.md"),
        }
    }

    #[test]
    fn emits_on_unquoted_and_permissions_as_read_all() {
        let data = sample_data();
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext {
            frontmatter_source: "---\nname: nightly-digest\n---\n".to_string(),
            ..Default::default()
        };
        let yaml = emit(&data, &plan, &ctx);
        assert!(yaml.contains("\non:\n"));
        assert!(!yaml.contains("\"on\":"));
        assert!(!yaml.contains("'on':"));
        assert!(yaml.contains("permissions: read-all"));
        assert!(yaml.contains("jobs:"));
        assert!(yaml.starts_with("# frontmatter-hash:"));
    }

    #[test]
    fn determinism_same_input_same_output() {
        let data = sample_data();
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext {
            frontmatter_source: "---\nname: nightly-digest\n---\n".to_string(),
            ..Default::default()
        };
        let a = emit(&data, &plan, &ctx);
        let b = emit(&data, &plan, &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn lock_for_agent_adds_lock_and_unlock_steps() {
        let mut data = sample_data();
        data.on[0].lock_for_agent = true;
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext::default();
        let yaml = emit(&data, &plan, &ctx);
        assert!(yaml.contains("Acquire agent lock"));
        assert!(yaml.contains("Release agent lock"));
    }

    #[test]
    fn agent_job_threads_engine_tools_and_network_into_env() {
        let mut data = sample_data();
        data.engine.model = Some("claude-sonnet".to_string());
        data.tools.insert("bash".to_string(), ToolConfig::Bash(BashConfig::Enabled(true)));
        data.network.allowed = vec!["example.com".to_string()];
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext::default();
        let yaml = emit(&data, &plan, &ctx);

        assert!(yaml.contains("GH_AW_ENGINE: claude"));
        assert!(yaml.contains("GH_AW_ENGINE_MODEL: claude-sonnet"));
        assert!(yaml.contains("GH_AW_TOOLS:"));
        assert!(yaml.contains("bash"));
        assert!(yaml.contains("GH_AW_NETWORK_ALLOWED:"));
        assert!(yaml.contains("localhost"));
        assert!(yaml.contains("example.com"));
        assert!(yaml.contains("actions/checkout@v4"));
        assert!(yaml.contains("actions/upload-artifact@v4"));
    }

    #[test]
    fn custom_job_emits_its_own_steps_env_and_permissions() {
        use aw_model::CustomJob;

        let mut data = sample_data();
        let mut env = aw_core::OrderedMap::new();
        env.insert("STAGE".to_string(), "prod".to_string());
        data.custom_jobs.push(CustomJob {
            id: "notify".to_string(),
            runs_on: Some("ubuntu-22.04".to_string()),
            needs: vec!["agent".to_string()],
            steps: Value::Sequence(vec![step("Ping webhook", "curl -f https://example.com")]),
            env,
            permissions: Some(Permissions::None),
            if_condition: None,
        });
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext::default();
        let yaml = emit(&data, &plan, &ctx);

        assert!(yaml.contains("ubuntu-22.04"));
        assert!(yaml.contains("Ping webhook"));
        assert!(yaml.contains("STAGE: prod"));
        assert!(!yaml.contains("steps: []"));
    }

    #[test]
    fn safe_output_job_carries_its_cap_and_label_filters() {
        use aw_model::{SafeOutputEntry, SafeOutputKind};

        let mut data = sample_data();
        data.safe_outputs.entries.insert(
            SafeOutputKind::CreateIssue,
            SafeOutputEntry {
                max: Some(3),
                allowed: vec!["bug".to_string()],
                blocked: vec!["wontfix".to_string()],
                ..Default::default()
            },
        );
        let plan = aw_jobs::plan(&data).unwrap();
        let ctx = EmitContext::default();
        let yaml = emit(&data, &plan, &ctx);

        assert!(yaml.contains("GH_AW_SAFE_OUTPUT_MAX: 3"));
        assert!(yaml.contains("GH_AW_SAFE_OUTPUT_ALLOWED: bug"));
        assert!(yaml.contains("GH_AW_SAFE_OUTPUT_BLOCKED: wontfix"));
        assert!(yaml.contains("actions/download-artifact@v4"));
    }
}
