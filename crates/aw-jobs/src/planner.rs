//! Builds the canonical job topology (spec §4.6, component C6):
//! `activation -> agent -> detection -> safe_outputs.<kind>* -> conclusion`,
//! with user-defined custom jobs spliced in via `needs`.

use aw_model::{EventKind, ForkPolicy, WorkflowData};
use aw_safe_outputs::plan_handlers;

use crate::error::JobsError;
use crate::graph::{JobGraph, JobKind, JobNode};

pub const ACTIVATION: &str = "activation";
pub const AGENT: &str = "agent";
pub const DETECTION: &str = "detection";
pub const CONCLUSION: &str = "conclusion";

pub fn safe_output_job_name(kind: aw_model::SafeOutputKind) -> String {
    format!("safe_outputs.{}", kind.wire_type())
}

/// The planned graph plus whether the agent job needs a `lock-for-agent`
/// GraphQL lock/unlock wrap (spec §4.6: "inserts a GraphQL lock step
/// around the agent job with an unconditional unlock in `conclusion`").
#[derive(Debug, Clone, PartialEq)]
pub struct JobPlan {
    pub graph: JobGraph,
    pub lock_for_agent: bool,
}

/// Whether the guard job is worth emitting at all. The activation job is
/// optional (spec §4.6): skip it when nothing it would check is present.
fn needs_activation(data: &WorkflowData) -> bool {
    data.on.iter().any(|event| {
        event.stop_after.is_some()
            || event.skip_if_match.is_some()
            || event.skip_if_no_match.is_some()
            || event.manual_approval.is_some()
            || event.forks == ForkPolicy::Allow
            || matches!(
                event.event,
                EventKind::SlashCommand
                    | EventKind::IssueComment
                    | EventKind::Issues
                    | EventKind::Discussion
                    | EventKind::DiscussionComment
                    | EventKind::PullRequestReviewComment
                    | EventKind::StatusComment
            )
    })
}

pub fn plan(data: &WorkflowData) -> Result<JobPlan, JobsError> {
    let mut graph = JobGraph::new();

    let activation_id = needs_activation(data).then(|| {
        graph.add_job(JobNode {
            name: ACTIVATION.to_string(),
            kind: JobKind::Activation,
            permissions: Vec::new(),
            if_condition: None,
            always: false,
        })
    });

    let agent_id = graph.add_job(JobNode {
        name: AGENT.to_string(),
        kind: JobKind::Agent,
        permissions: Vec::new(),
        if_condition: None,
        always: false,
    });
    if let Some(act) = activation_id {
        graph.add_dependency(act, agent_id);
    }

    let detection_id = graph.add_job(JobNode {
        name: DETECTION.to_string(),
        kind: JobKind::Detection,
        permissions: Vec::new(),
        if_condition: None,
        always: false,
    });
    graph.add_dependency(agent_id, detection_id);

    let handlers = plan_handlers(&data.safe_outputs);
    let mut safe_output_ids = Vec::with_capacity(handlers.len());
    for handler in &handlers {
        let id = graph.add_job(JobNode {
            name: safe_output_job_name(handler.kind),
            kind: JobKind::SafeOutput(handler.kind),
            permissions: handler.permissions.clone(),
            if_condition: None,
            always: false,
        });
        graph.add_dependency(detection_id, id);
        safe_output_ids.push(id);
    }

    let conclusion_id = graph.add_job(JobNode {
        name: CONCLUSION.to_string(),
        kind: JobKind::Conclusion,
        permissions: Vec::new(),
        if_condition: Some("always()".to_string()),
        always: true,
    });
    graph.add_dependency(agent_id, conclusion_id);
    graph.add_dependency(detection_id, conclusion_id);
    for id in &safe_output_ids {
        graph.add_dependency(*id, conclusion_id);
    }

    for custom in &data.custom_jobs {
        if graph.find_by_name(&custom.id).is_some() {
            return Err(JobsError::DuplicateJobName(custom.id.clone()));
        }
        graph.add_job(JobNode {
            name: custom.id.clone(),
            kind: JobKind::Custom,
            permissions: Vec::new(),
            if_condition: custom.if_condition.clone(),
            always: false,
        });
    }
    for custom in &data.custom_jobs {
        let to = graph.find_by_name(&custom.id).expect("just inserted");
        for needed in &custom.needs {
            let from = graph
                .find_by_name(needed)
                .ok_or_else(|| JobsError::UnknownNeed(custom.id.clone(), needed.clone()))?;
            graph.add_dependency(from, to);
        }
    }

    graph.topological_order()?;
    graph.check_conclusion_terminal()?;

    let lock_for_agent = data.on.iter().any(|e| e.lock_for_agent);
    Ok(JobPlan { graph, lock_for_agent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_model::{CustomJob, Engine, EngineId, EventSpec, Permissions};
    use std::path::PathBuf;

    fn sample_data() -> WorkflowData {
        WorkflowData {
            name: "test".to_string(),
            description: None,
            on: vec![EventSpec::new(EventKind::WorkflowDispatch)],
            permissions: Permissions::ReadAll,
            engine: Engine::simple(EngineId::Claude),
            tools: Default::default(),
            safe_outputs: Default::default(),
            network: Default::default(),
            steps: None,
            custom_jobs: Vec::new(),
            concurrency: Default::default(),
            timeout_minutes: 20,
            runs_on: serde_yaml::Value::String("ubuntu-latest".to_string()),
            env: Default::default(),
            strict: false,
            imports: Vec::new(),
            source_path: PathBuf::from(".github/workflows/test.md"),
        }
    }

    #[test]
    fn minimal_workflow_skips_activation() {
        let data = sample_data();
        let plan = plan(&data).unwrap();
        assert!(plan.graph.find_by_name(ACTIVATION).is_none());
        assert!(plan.graph.find_by_name(AGENT).is_some());
        assert!(plan.graph.find_by_name(CONCLUSION).is_some());
        assert!(!plan.lock_for_agent);
    }

    #[test]
    fn lock_for_agent_event_adds_activation_and_lock_flag() {
        let mut data = sample_data();
        data.on[0].lock_for_agent = true;
        data.on[0].stop_after = Some("+1d".to_string());
        let plan = plan(&data).unwrap();
        assert!(plan.graph.find_by_name(ACTIVATION).is_some());
        assert!(plan.lock_for_agent);
    }

    #[test]
    fn safe_output_kinds_each_get_a_handler_job() {
        let mut data = sample_data();
        data.safe_outputs.entries.insert(
            aw_model::SafeOutputKind::CreateIssue,
            aw_model::SafeOutputEntry::default(),
        );
        let plan = plan(&data).unwrap();
        let job_name = safe_output_job_name(aw_model::SafeOutputKind::CreateIssue);
        let id = plan.graph.find_by_name(&job_name).unwrap();
        let detection_id = plan.graph.find_by_name(DETECTION).unwrap();
        assert!(plan.graph.needs(id).contains(&detection_id));
    }

    #[test]
    fn custom_job_needing_conclusion_is_rejected() {
        let mut data = sample_data();
        data.custom_jobs.push(CustomJob {
            id: "notify".to_string(),
            runs_on: None,
            needs: vec![CONCLUSION.to_string()],
            steps: serde_yaml::Value::Null,
            env: Default::default(),
            permissions: None,
            if_condition: None,
        });
        assert!(matches!(plan(&data), Err(JobsError::ConclusionNotTerminal(_))));
    }

    #[test]
    fn custom_job_with_unknown_need_is_rejected() {
        let mut data = sample_data();
        data.custom_jobs.push(CustomJob {
            id: "notify".to_string(),
            runs_on: None,
            needs: vec!["does-not-exist".to_string()],
            steps: serde_yaml::Value::Null,
            env: Default::default(),
            permissions: None,
            if_condition: None,
        });
        assert!(matches!(plan(&data), Err(JobsError::UnknownNeed(_, _))));
    }

    #[test]
    fn custom_job_spliced_after_agent_is_accepted() {
        let mut data = sample_data();
        data.custom_jobs.push(CustomJob {
            id: "post-process".to_string(),
            runs_on: None,
            needs: vec![AGENT.to_string()],
            steps: serde_yaml::Value::Null,
            env: Default::default(),
            permissions: None,
            if_condition: None,
        });
        let plan = plan(&data).unwrap();
        let id = plan.graph.find_by_name("post-process").unwrap();
        let agent_id = plan.graph.find_by_name(AGENT).unwrap();
        assert!(plan.graph.needs(id).contains(&agent_id));
    }
}
