//! The workflow model builder (spec §4.4, component C4): normalizes the
//! merged (header, resolved-imports) pair into a [`WorkflowData`] value.
//! This is the only pass that knows about default values.

use std::path::{Path, PathBuf};

use aw_core::diag::{Diagnostic, Diagnostics};
use aw_core::OrderedMap;
use serde_yaml::Value;

use crate::error::SemanticError;
use crate::safe_outputs::{SafeOutputEntry, SafeOutputKind, SafeOutputsConfig};
use crate::types::*;

const DEFAULT_RUNS_ON: &str = "ubuntu-latest";

/// Build a [`WorkflowData`] from a merged header (spec §4.4). Returns
/// `None` only if a fatal `SemanticError` diagnostic was pushed; malformed
/// shapes fall back to permissive defaults wherever the spec doesn't
/// mandate a hard failure, since C2 (schema validation) already rejected
/// anything structurally wrong by the time this runs.
pub fn build(
    header: &Value,
    resolved_imports: &[(String, Option<String>)],
    source_path: &Path,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Option<WorkflowData> {
    let map = header.as_mapping();

    let name = map
        .and_then(|m| get_str(m, "name"))
        .unwrap_or_else(|| source_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default());
    let description = map.and_then(|m| get_str(m, "description"));

    let on = build_on(map.and_then(|m| m.get("on")), diagnostics)?;
    if on.is_empty() {
        diagnostics.push(Diagnostic::error("semantic-error", SemanticError::EmptyOn.to_string()));
        return None;
    }

    let tools = build_tools(map.and_then(|m| m.get("tools")), diagnostics);
    let safe_outputs = build_safe_outputs(map.and_then(|m| m.get("safe-outputs")), diagnostics);
    let engine = build_engine(map.and_then(|m| m.get("engine")), diagnostics);
    let network = build_network(map.and_then(|m| m.get("network")));

    let lock_for_agent = on.iter().any(|e| e.lock_for_agent);
    let permissions = build_permissions(
        map.and_then(|m| m.get("permissions")),
        lock_for_agent,
        &tools,
        &safe_outputs,
        diagnostics,
    )?;

    let timeout_minutes = map
        .and_then(|m| get_int(m, "timeout-minutes"))
        .map(|n| n as u32)
        .unwrap_or_else(|| engine.id.default_timeout_minutes());

    let runs_on = map
        .and_then(|m| m.get("runs-on"))
        .cloned()
        .unwrap_or_else(|| Value::String(DEFAULT_RUNS_ON.to_string()));

    let env = map
        .and_then(|m| m.get("env"))
        .and_then(Value::as_mapping)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| Some((k.as_str()?.to_string(), scalar_to_string(v))))
                .collect()
        })
        .unwrap_or_default();

    let concurrency = build_concurrency(map.and_then(|m| m.get("concurrency")), &name, &on);
    let custom_jobs = build_custom_jobs(map.and_then(|m| m.get("jobs")));

    let strict_flag = map.and_then(|m| get_bool(m, "strict")).unwrap_or(strict);
    let steps = map.and_then(|m| m.get("steps")).cloned();

    Some(WorkflowData {
        name,
        description,
        on,
        permissions,
        engine,
        tools,
        safe_outputs,
        network,
        steps,
        custom_jobs,
        concurrency,
        timeout_minutes,
        runs_on,
        env,
        strict: strict_flag,
        imports: resolved_imports.to_vec(),
        source_path: source_path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// on:
// ---------------------------------------------------------------------------

fn build_on(value: Option<&Value>, diagnostics: &mut Diagnostics) -> Option<Vec<EventSpec>> {
    match value {
        None => Some(Vec::new()),
        Some(Value::String(shorthand)) => build_on_shorthand(shorthand, diagnostics),
        Some(Value::Mapping(map)) => {
            let mut specs = Vec::new();
            for (key, body) in map.iter() {
                let Some(key_str) = key.as_str() else { continue };
                let Some(kind) = EventKind::from_str(key_str) else {
                    diagnostics.push(Diagnostic::error(
                        "semantic-error",
                        SemanticError::UnknownEvent(key_str.to_string()).to_string(),
                    ));
                    return None;
                };
                specs.push(build_event_spec(kind, body));
            }
            Some(specs)
        }
        Some(_) => Some(Vec::new()),
    }
}

/// Slash-command (`on: /cmd`) and label-shorthand (`on: issue labeled bug`)
/// expansion (spec §4.5).
fn build_on_shorthand(raw: &str, diagnostics: &mut Diagnostics) -> Option<Vec<EventSpec>> {
    if let Some(kind) = EventKind::from_str(raw) {
        return Some(vec![EventSpec::new(kind)]);
    }

    if let Some(cmd) = raw.strip_prefix('/') {
        let mut slash = EventSpec::new(EventKind::SlashCommand);
        slash.types = vec![cmd.to_string()];
        let dispatch = EventSpec::new(EventKind::WorkflowDispatch);
        return Some(vec![slash, dispatch]);
    }

    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() >= 3 && words[0].eq_ignore_ascii_case("issue") && words[1].eq_ignore_ascii_case("labeled") {
        let label = words[2..].join(" ");
        let mut spec = EventSpec::new(EventKind::Issues);
        spec.types = vec!["labeled".to_string()];
        spec.names = vec![label];
        return Some(vec![spec]);
    }

    diagnostics.push(Diagnostic::error(
        "semantic-error",
        format!("unrecognized 'on:' shorthand '{raw}'"),
    ));
    None
}

fn build_event_spec(kind: EventKind, body: &Value) -> EventSpec {
    let mut spec = EventSpec::new(kind);
    let Some(map) = body.as_mapping() else {
        if kind == EventKind::Schedule {
            if let Some(raw) = body.as_str() {
                spec.raw_schedule = Some(raw.to_string());
            }
        }
        return spec;
    };

    spec.types = get_str_seq(map, "types");
    spec.branches = get_str_seq(map, "branches");
    spec.paths = get_str_seq(map, "paths");
    spec.names = get_str_seq(map, "names");
    spec.forks = if get_bool(map, "forks").unwrap_or(false) {
        ForkPolicy::Allow
    } else {
        ForkPolicy::Deny
    };
    spec.lock_for_agent = get_bool(map, "lock-for-agent").unwrap_or(false);
    spec.reaction = get_str(map, "reaction");
    spec.stop_after = get_str(map, "stop-after");
    spec.manual_approval = get_str(map, "manual-approval");
    spec.skip_if_match = build_skip_condition(map.get("skip-if-match"));
    spec.skip_if_no_match = build_skip_condition(map.get("skip-if-no-match"));
    spec.raw_schedule = get_str(map, "schedule");
    spec.inputs = build_workflow_dispatch_inputs(map.get("inputs"));
    spec
}

fn build_skip_condition(value: Option<&Value>) -> Option<SkipCondition> {
    match value {
        Some(Value::String(query)) => Some(SkipCondition {
            query: query.clone(),
            min: SkipCondition::DEFAULT_MIN,
            max: SkipCondition::DEFAULT_MAX,
        }),
        Some(Value::Mapping(map)) => {
            let query = get_str(map, "query").unwrap_or_default();
            let min = get_int(map, "min").map(|n| n as u32).unwrap_or(SkipCondition::DEFAULT_MIN);
            let max = get_int(map, "max").map(|n| n as u32).unwrap_or(SkipCondition::DEFAULT_MAX);
            Some(SkipCondition { query, min, max })
        }
        _ => None,
    }
}

fn build_workflow_dispatch_inputs(value: Option<&Value>) -> OrderedMap<String, WorkflowDispatchInput> {
    let mut inputs = OrderedMap::new();
    let Some(map) = value.and_then(Value::as_mapping) else {
        return inputs;
    };
    for (key, body) in map.iter() {
        let Some(name) = key.as_str() else { continue };
        let body_map = body.as_mapping();
        let input = WorkflowDispatchInput {
            description: body_map.and_then(|m| get_str(m, "description")),
            required: body_map.and_then(|m| get_bool(m, "required")).unwrap_or(false),
            default: body_map.and_then(|m| get_str(m, "default")),
            input_type: body_map
                .and_then(|m| get_str(m, "type"))
                .unwrap_or_else(|| "string".to_string()),
        };
        inputs.insert(name.to_string(), input);
    }
    inputs
}

// ---------------------------------------------------------------------------
// permissions:
// ---------------------------------------------------------------------------

fn build_permissions(
    value: Option<&Value>,
    lock_for_agent: bool,
    tools: &OrderedMap<String, ToolConfig>,
    safe_outputs: &SafeOutputsConfig,
    diagnostics: &mut Diagnostics,
) -> Option<Permissions> {
    let mut permissions = match value {
        Some(Value::String(s)) => match s.as_str() {
            "read-all" => Permissions::ReadAll,
            "write-all" => Permissions::WriteAll,
            "none" => Permissions::None,
            other => {
                diagnostics.push(Diagnostic::error(
                    "semantic-error",
                    format!("unknown permissions value '{other}'"),
                ));
                return None;
            }
        },
        Some(Value::Mapping(map)) => {
            let mut scoped = OrderedMap::new();
            for (key, level) in map.iter() {
                let Some(key) = key.as_str() else { continue };
                let level = match level.as_str() {
                    Some("read") => PermissionLevel::Read,
                    Some("write") => PermissionLevel::Write,
                    Some("none") => PermissionLevel::None,
                    _ => PermissionLevel::None,
                };
                scoped.insert(key.to_string(), level);
            }
            Permissions::Scoped(scoped)
        }
        _ => default_permissions(tools, safe_outputs),
    };

    if lock_for_agent {
        permissions = match permissions {
            Permissions::Scoped(mut scoped) => {
                match scoped.get("issues") {
                    Some(PermissionLevel::None) => {
                        diagnostics.push(Diagnostic::error(
                            "semantic-error",
                            SemanticError::LockForAgentPermissionConflict.to_string(),
                        ));
                        return None;
                    }
                    _ => {
                        scoped.insert("issues".to_string(), PermissionLevel::Write);
                    }
                }
                Permissions::Scoped(scoped)
            }
            Permissions::None => {
                diagnostics.push(Diagnostic::error(
                    "semantic-error",
                    SemanticError::LockForAgentPermissionConflict.to_string(),
                ));
                return None;
            }
            // `write-all` already grants write on every scope, including
            // `issues`; nothing to escalate.
            Permissions::WriteAll => Permissions::WriteAll,
            // `read-all` grants read only, so `issues: write` still has to
            // be added explicitly — GitHub Actions has no syntax for
            // "read-all plus one write scope", so this expands into the
            // full scope list with `issues` escalated to write.
            Permissions::ReadAll => {
                let mut scoped = OrderedMap::new();
                for scope in ALL_PERMISSION_SCOPES {
                    scoped.insert((*scope).to_string(), PermissionLevel::Read);
                }
                scoped.insert("issues".to_string(), PermissionLevel::Write);
                Permissions::Scoped(scoped)
            }
        };
    }

    Some(permissions)
}

/// Spec §4.4: `read-all` if no write-requiring safe-output/tool is
/// enabled, otherwise the minimum scoped set necessary.
fn default_permissions(tools: &OrderedMap<String, ToolConfig>, safe_outputs: &SafeOutputsConfig) -> Permissions {
    let mut scoped: OrderedMap<String, PermissionLevel> = OrderedMap::new();
    if safe_outputs.needs_issues_write() {
        scoped.insert("issues".to_string(), PermissionLevel::Write);
    }
    if safe_outputs.needs_pull_requests_write() {
        scoped.insert("pull-requests".to_string(), PermissionLevel::Write);
    }
    if safe_outputs.needs_contents_write() {
        scoped.insert("contents".to_string(), PermissionLevel::Write);
    }
    if tools.contains_key("edit") {
        scoped.insert("contents".to_string(), PermissionLevel::Write);
    }

    if scoped.is_empty() {
        Permissions::ReadAll
    } else {
        scoped.insert("contents".to_string(), scoped.get("contents").copied().unwrap_or(PermissionLevel::Read));
        Permissions::Scoped(scoped)
    }
}

// ---------------------------------------------------------------------------
// engine:
// ---------------------------------------------------------------------------

fn build_engine(value: Option<&Value>, diagnostics: &mut Diagnostics) -> Engine {
    match value {
        Some(Value::String(s)) => match EngineId::from_str(s) {
            Some(id) => Engine::simple(id),
            None => {
                diagnostics.push(Diagnostic::error(
                    "semantic-error",
                    SemanticError::UnknownEngine(s.clone()).to_string(),
                ));
                Engine::simple(EngineId::Claude)
            }
        },
        Some(Value::Mapping(map)) => {
            let id = get_str(map, "id")
                .and_then(|s| EngineId::from_str(&s))
                .unwrap_or(EngineId::Claude);
            Engine {
                id,
                model: get_str(map, "model"),
                reasoning_effort: get_str(map, "reasoning-effort"),
                args: get_str_seq(map, "args"),
                steps: map.get("steps").cloned(),
            }
        }
        _ => Engine::simple(EngineId::Claude),
    }
}

// ---------------------------------------------------------------------------
// tools:
// ---------------------------------------------------------------------------

fn build_tools(value: Option<&Value>, diagnostics: &mut Diagnostics) -> OrderedMap<String, ToolConfig> {
    let mut tools = OrderedMap::new();
    let Some(map) = value.and_then(Value::as_mapping) else {
        return tools;
    };

    for (key, body) in map.iter() {
        let Some(name) = key.as_str() else { continue };
        let config = match name {
            "bash" => ToolConfig::Bash(match body {
                Value::Bool(b) => BashConfig::Enabled(*b),
                Value::Sequence(_) => BashConfig::Globs(sequence_to_strings(body)),
                _ => BashConfig::Enabled(true),
            }),
            "edit" => ToolConfig::Edit,
            "github" => {
                let map = body.as_mapping();
                ToolConfig::Github(GithubToolConfig {
                    toolsets: map.map(|m| get_str_seq(m, "toolsets")).unwrap_or_default(),
                    token: map.and_then(|m| get_str(m, "token")),
                    mode: match map.and_then(|m| get_str(m, "mode")).as_deref() {
                        Some("docker") => GithubToolMode::Docker,
                        Some("remote") => GithubToolMode::Remote,
                        _ => GithubToolMode::Local,
                    },
                })
            }
            "playwright" => {
                let map = body.as_mapping();
                let mut allowed_domains = map.map(|m| get_str_seq(m, "allowed_domains")).unwrap_or_default();
                if !allowed_domains.is_empty() {
                    inject_localhost(&mut allowed_domains);
                }
                ToolConfig::Playwright(PlaywrightConfig {
                    allowed_domains,
                    args: map.map(|m| get_str_seq(m, "args")).unwrap_or_default(),
                    version: map.and_then(|m| get_str(m, "version")),
                })
            }
            "cache-memory" => ToolConfig::CacheMemory {
                key: body.as_mapping().and_then(|m| get_str(m, "key")),
            },
            "repo-memory" => {
                let map = body.as_mapping();
                ToolConfig::RepoMemory(RepoMemoryConfig {
                    branch_name: map
                        .and_then(|m| get_str(m, "branch-name"))
                        .unwrap_or_else(|| "aw-memory".to_string()),
                    file_glob: map.and_then(|m| get_str(m, "file-glob")),
                    max_file_size: map.and_then(|m| get_int(m, "max-file-size")).map(|n| n as u64),
                })
            }
            other => match build_mcp_transport(other, body, diagnostics) {
                Some(transport) => ToolConfig::Mcp(McpServerConfig {
                    name: other.to_string(),
                    transport,
                }),
                None => continue,
            },
        };
        tools.insert(name.to_string(), config);
    }
    tools
}

fn build_mcp_transport(name: &str, body: &Value, diagnostics: &mut Diagnostics) -> Option<McpTransport> {
    let map = body.as_mapping()?;
    let has_command = map.contains_key("command");
    let has_url = map.contains_key("url");
    let has_container = map.contains_key("container");

    let transport_count = [has_command, has_url, has_container].iter().filter(|v| **v).count();
    if transport_count > 1 {
        diagnostics.push(Diagnostic::error(
            "semantic-error",
            SemanticError::MultipleTransports(name.to_string()).to_string(),
        ));
        return None;
    }
    if transport_count == 0 {
        diagnostics.push(Diagnostic::error(
            "semantic-error",
            SemanticError::MissingTransport(name.to_string()).to_string(),
        ));
        return None;
    }

    if has_url {
        let headers = map
            .get("headers")
            .and_then(Value::as_mapping)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        return Some(McpTransport::Http {
            url: get_str(map, "url").unwrap_or_default(),
            headers,
        });
    }
    if has_container {
        return Some(McpTransport::Container {
            image: get_str(map, "container").unwrap_or_default(),
            args: get_str_seq(map, "args"),
        });
    }
    Some(McpTransport::Stdio {
        command: get_str(map, "command").unwrap_or_default(),
        args: get_str_seq(map, "args"),
    })
}

fn inject_localhost(domains: &mut Vec<String>) {
    for host in LOCALHOST_ALLOWLIST {
        if !domains.iter().any(|d| d == host) {
            domains.push((*host).to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// safe-outputs:
// ---------------------------------------------------------------------------

fn build_safe_outputs(value: Option<&Value>, diagnostics: &mut Diagnostics) -> SafeOutputsConfig {
    let mut config = SafeOutputsConfig::default();
    let Some(map) = value.and_then(Value::as_mapping) else {
        return config;
    };

    config.staged = get_bool(map, "staged").unwrap_or(false);

    for (key, body) in map.iter() {
        let Some(key_str) = key.as_str() else { continue };
        if key_str == "staged" {
            continue;
        }
        let Some(kind) = SafeOutputKind::from_front_matter_key(key_str) else {
            diagnostics.push(Diagnostic::error(
                "semantic-error",
                SemanticError::UnknownSafeOutputKind(key_str.to_string()).to_string(),
            ));
            continue;
        };
        let entry = build_safe_output_entry(body);
        config.entries.insert(kind, entry);
    }
    config
}

fn build_safe_output_entry(body: &Value) -> SafeOutputEntry {
    let Some(map) = body.as_mapping() else {
        return SafeOutputEntry::default();
    };
    SafeOutputEntry {
        max: get_int(map, "max")
            .or_else(|| get_int(map, "max-count"))
            .map(|n| n as u32),
        title_prefix: get_str(map, "title-prefix"),
        labels: get_str_seq(map, "labels"),
        assignees: get_str_seq(map, "assignees"),
        expires: get_str(map, "expires"),
        hide_older_comments: get_bool(map, "hide-older-comments").unwrap_or(false),
        target: get_str(map, "target"),
        allowed: get_str_seq(map, "allowed"),
        blocked: get_str_seq(map, "blocked"),
        reviewers: get_str_seq(map, "reviewers"),
        draft: get_bool(map, "draft").unwrap_or(false),
        create_if_missing: get_bool(map, "create_if_missing").unwrap_or(false),
        close_older_discussions: get_bool(map, "close-older-discussions").unwrap_or(false),
        allowed_exts: {
            let exts = get_str_seq(map, "allowed-exts");
            if exts.is_empty() {
                SafeOutputEntry::DEFAULT_ALLOWED_EXTS.iter().map(|s| s.to_string()).collect()
            } else {
                exts
            }
        },
        workflows: get_str_seq(map, "workflows"),
    }
}

// ---------------------------------------------------------------------------
// network:
// ---------------------------------------------------------------------------

fn build_network(value: Option<&Value>) -> NetworkPolicy {
    let Some(map) = value.and_then(Value::as_mapping) else {
        return NetworkPolicy::default();
    };
    NetworkPolicy {
        allowed: get_str_seq(map, "allowed"),
        ecosystems: get_str_seq(map, "ecosystems")
            .iter()
            .filter_map(|s| EcosystemBundle::from_str(s))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// concurrency: / jobs:
// ---------------------------------------------------------------------------

fn build_concurrency(value: Option<&Value>, workflow_name: &str, on: &[EventSpec]) -> Concurrency {
    if let Some(map) = value.and_then(Value::as_mapping) {
        return Concurrency {
            group: get_str(map, "group"),
            cancel_in_progress: get_bool(map, "cancel-in-progress").unwrap_or(false),
        };
    }
    // Default group: "workflow-name + event-stability-key" (spec §4.6),
    // never cancel-in-progress by default.
    let stability_key = on.first().map(|e| e.event.as_str()).unwrap_or("default");
    Concurrency {
        group: Some(format!("{workflow_name}-{stability_key}")),
        cancel_in_progress: false,
    }
}

fn build_custom_jobs(value: Option<&Value>) -> Vec<CustomJob> {
    let Some(map) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, body)| {
            let id = key.as_str()?.to_string();
            let job_map = body.as_mapping();
            Some(CustomJob {
                id,
                runs_on: job_map.and_then(|m| get_str(m, "runs-on")),
                needs: job_map.map(|m| get_str_seq(m, "needs")).unwrap_or_default(),
                steps: job_map.and_then(|m| m.get("steps")).cloned().unwrap_or(Value::Null),
                env: job_map
                    .and_then(|m| m.get("env"))
                    .and_then(Value::as_mapping)
                    .map(|m| {
                        m.iter()
                            .filter_map(|(k, v)| Some((k.as_str()?.to_string(), scalar_to_string(v))))
                            .collect()
                    })
                    .unwrap_or_default(),
                permissions: None,
                if_condition: job_map.and_then(|m| get_str(m, "if")),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Value scalar helpers
// ---------------------------------------------------------------------------

fn get_str(map: &serde_yaml::Mapping, key: &str) -> Option<String> {
    map.get(Value::String(key.to_string()))?.as_str().map(str::to_string)
}

fn get_int(map: &serde_yaml::Mapping, key: &str) -> Option<i64> {
    map.get(Value::String(key.to_string()))?.as_i64()
}

fn get_bool(map: &serde_yaml::Mapping, key: &str) -> Option<bool> {
    map.get(Value::String(key.to_string()))?.as_bool()
}

fn get_str_seq(map: &serde_yaml::Mapping, key: &str) -> Vec<String> {
    map.get(Value::String(key.to_string()))
        .map(sequence_to_strings)
        .unwrap_or_default()
}

fn sequence_to_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Unused outside tests, but kept so callers without a source path handy
/// can still build (e.g. `aw lint` against stdin).
#[allow(dead_code)]
fn default_source_path() -> PathBuf {
    PathBuf::from("<stdin>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn minimal_dispatch_workflow() {
        let header = parse("name: Test\non: workflow_dispatch\npermissions: read-all\nengine: copilot\n");
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        assert_eq!(data.name, "Test");
        assert_eq!(data.on.len(), 1);
        assert_eq!(data.on[0].event, EventKind::WorkflowDispatch);
        assert_eq!(data.permissions, Permissions::ReadAll);
        assert_eq!(data.engine.id, EngineId::Copilot);
        assert!(diags.is_empty());
    }

    #[test]
    fn lock_for_agent_forces_issues_write() {
        let header = parse(
            "name: Test\non:\n  issues:\n    lock-for-agent: true\nengine: claude\n",
        );
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        match data.permissions {
            Permissions::Scoped(map) => assert_eq!(map.get("issues"), Some(&PermissionLevel::Write)),
            other => panic!("expected scoped permissions, got {other:?}"),
        }
    }

    #[test]
    fn lock_for_agent_escalates_explicit_read_all() {
        let header = parse(
            "name: Test\non:\n  issues:\n    lock-for-agent: true\npermissions: read-all\nengine: claude\n",
        );
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        match data.permissions {
            Permissions::Scoped(map) => {
                assert_eq!(map.get("issues"), Some(&PermissionLevel::Write));
                assert_eq!(map.get("contents"), Some(&PermissionLevel::Read));
            }
            other => panic!("expected scoped permissions, got {other:?}"),
        }
    }

    #[test]
    fn lock_for_agent_conflicts_with_explicit_none() {
        let header = parse(
            "name: Test\non:\n  issues:\n    lock-for-agent: true\npermissions:\n  issues: none\n",
        );
        let mut diags = Diagnostics::new(false);
        assert!(build(&header, &[], Path::new("wf.md"), false, &mut diags).is_none());
        assert!(diags.has_fatal());
    }

    #[test]
    fn slash_command_shorthand_expands_to_pair() {
        let header = parse("name: Test\non: /plan\n");
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        assert_eq!(data.on.len(), 2);
        assert!(data.on.iter().any(|e| e.event == EventKind::SlashCommand));
        assert!(data.on.iter().any(|e| e.event == EventKind::WorkflowDispatch));
    }

    #[test]
    fn label_shorthand_expands_types_and_names() {
        let header = parse("name: Test\non: issue labeled bug\n");
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        assert_eq!(data.on.len(), 1);
        assert_eq!(data.on[0].types, vec!["labeled".to_string()]);
        assert_eq!(data.on[0].names, vec!["bug".to_string()]);
    }

    #[test]
    fn mcp_tool_with_two_transports_is_rejected() {
        let header = parse(
            "name: Test\non: workflow_dispatch\ntools:\n  mytool:\n    command: foo\n    url: http://x\n",
        );
        let mut diags = Diagnostics::new(false);
        assert!(build(&header, &[], Path::new("wf.md"), false, &mut diags).is_none());
        assert!(diags.has_fatal());
    }

    #[test]
    fn playwright_allowlist_gets_localhost_injected() {
        let header = parse(
            "name: Test\non: workflow_dispatch\ntools:\n  playwright:\n    allowed_domains: [example.com]\n",
        );
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        let Some(ToolConfig::Playwright(cfg)) = data.tools.get("playwright") else {
            panic!("expected playwright tool");
        };
        assert!(cfg.allowed_domains.contains(&"localhost".to_string()));
        assert!(cfg.allowed_domains.contains(&"127.0.0.1".to_string()));
    }

    #[test]
    fn default_permissions_is_read_all_without_writes() {
        let header = parse("name: Test\non: workflow_dispatch\n");
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        assert_eq!(data.permissions, Permissions::ReadAll);
    }

    #[test]
    fn default_permissions_scoped_when_safe_outputs_need_writes() {
        let header = parse(
            "name: Test\non: workflow_dispatch\nsafe-outputs:\n  create-issue:\n    max: 3\n",
        );
        let mut diags = Diagnostics::new(false);
        let data = build(&header, &[], Path::new("wf.md"), false, &mut diags).unwrap();
        match data.permissions {
            Permissions::Scoped(map) => assert_eq!(map.get("issues"), Some(&PermissionLevel::Write)),
            other => panic!("expected scoped, got {other:?}"),
        }
    }
}
