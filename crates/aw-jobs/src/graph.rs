//! Arena-indexed job graph with Kahn's-algorithm topological sort and
//! cycle detection, in the style of a dependency DAG walked by stable
//! integer id rather than by pointer.

use std::collections::VecDeque;

use aw_model::PermissionLevel;

use crate::error::JobsError;

/// What kind of job a node represents (spec §4.6 canonical topology).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Activation,
    Agent,
    Detection,
    SafeOutput(aw_model::SafeOutputKind),
    Conclusion,
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobNode {
    pub name: String,
    pub kind: JobKind,
    pub permissions: Vec<(&'static str, PermissionLevel)>,
    pub if_condition: Option<String>,
    pub always: bool,
}

/// A stable index into [`JobGraph`]'s node arena.
pub type JobId = usize;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobGraph {
    nodes: Vec<JobNode>,
    /// Outgoing edges: `edges[from]` lists jobs that need `from`.
    edges: Vec<Vec<JobId>>,
    /// Incoming edges: `incoming[to]` lists jobs `to` needs.
    incoming: Vec<Vec<JobId>>,
}

impl JobGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&mut self, node: JobNode) -> JobId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.edges.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Record that `to` needs `from` (an edge `from -> to`).
    pub fn add_dependency(&mut self, from: JobId, to: JobId) {
        self.edges[from].push(to);
        self.incoming[to].push(from);
    }

    pub fn job(&self, id: JobId) -> &JobNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[JobNode] {
        &self.nodes
    }

    pub fn needs(&self, id: JobId) -> &[JobId] {
        &self.incoming[id]
    }

    pub fn find_by_name(&self, name: &str) -> Option<JobId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Kahn's algorithm: returns the set of job names still carrying
    /// in-degree after the BFS frontier drains, i.e. the jobs on (or
    /// feeding) a cycle.
    pub fn cycle_names(&self) -> Option<Vec<String>> {
        let mut indegree: Vec<usize> = self.incoming.iter().map(Vec::len).collect();
        let mut queue: VecDeque<JobId> = indegree
            .iter()
            .enumerate()
            .filter_map(|(i, d)| (*d == 0).then_some(i))
            .collect();
        let mut visited = 0usize;

        while let Some(node) = queue.pop_front() {
            visited += 1;
            for &next in &self.edges[node] {
                indegree[next] = indegree[next].saturating_sub(1);
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if visited == self.nodes.len() {
            None
        } else {
            Some(
                indegree
                    .iter()
                    .enumerate()
                    .filter_map(|(i, d)| (*d > 0).then_some(self.nodes[i].name.clone()))
                    .collect(),
            )
        }
    }

    /// A topological execution order (by id), or the cycle as an error.
    pub fn topological_order(&self) -> Result<Vec<JobId>, JobsError> {
        let mut indegree: Vec<usize> = self.incoming.iter().map(Vec::len).collect();
        let mut queue: VecDeque<JobId> = indegree
            .iter()
            .enumerate()
            .filter_map(|(i, d)| (*d == 0).then_some(i))
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &next in &self.edges[node] {
                indegree[next] = indegree[next].saturating_sub(1);
                if indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            let cycle = self.cycle_names().unwrap_or_default();
            Err(JobsError::CycleDetected(cycle))
        }
    }

    /// Spec §4.6: "the planner verifies ... `conclusion` remains
    /// terminal" — no job may declare `needs: conclusion`.
    pub fn check_conclusion_terminal(&self) -> Result<(), JobsError> {
        let Some(conclusion_id) = self.nodes.iter().position(|n| n.kind == JobKind::Conclusion) else {
            return Ok(());
        };
        if let Some(&dependent) = self.edges[conclusion_id].first() {
            return Err(JobsError::ConclusionNotTerminal(self.nodes[dependent].name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, kind: JobKind) -> JobNode {
        JobNode {
            name: name.to_string(),
            kind,
            permissions: Vec::new(),
            if_condition: None,
            always: false,
        }
    }

    #[test]
    fn linear_chain_sorts_in_order() {
        let mut g = JobGraph::new();
        let a = g.add_job(node("a", JobKind::Activation));
        let b = g.add_job(node("b", JobKind::Agent));
        let c = g.add_job(node("c", JobKind::Detection));
        g.add_dependency(a, b);
        g.add_dependency(b, c);
        let order = g.topological_order().unwrap();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut g = JobGraph::new();
        let a = g.add_job(node("a", JobKind::Custom));
        let b = g.add_job(node("b", JobKind::Custom));
        g.add_dependency(a, b);
        g.add_dependency(b, a);
        assert!(g.topological_order().is_err());
        let cycle = g.cycle_names().unwrap();
        assert_eq!(cycle.len(), 2);
    }

    #[test]
    fn conclusion_with_no_dependents_is_terminal() {
        let mut g = JobGraph::new();
        let a = g.add_job(node("agent", JobKind::Agent));
        let c = g.add_job(node("conclusion", JobKind::Conclusion));
        g.add_dependency(a, c);
        assert!(g.check_conclusion_terminal().is_ok());
    }

    #[test]
    fn job_depending_on_conclusion_is_rejected() {
        let mut g = JobGraph::new();
        let c = g.add_job(node("conclusion", JobKind::Conclusion));
        let custom = g.add_job(node("notify", JobKind::Custom));
        g.add_dependency(c, custom);
        assert!(matches!(g.check_conclusion_terminal(), Err(JobsError::ConclusionNotTerminal(_))));
    }

    proptest::proptest! {
        /// For any DAG built by only ever adding edges from a lower-indexed
        /// node to a higher-indexed one (guaranteed acyclic), the
        /// topological order places every `needs` dependency before its
        /// dependent.
        #[test]
        fn topological_order_respects_every_dependency(edges in proptest::collection::vec((0usize..8, 0usize..8), 0..16)) {
            let mut g = JobGraph::new();
            for i in 0..8 {
                g.add_job(node(&format!("job{i}"), JobKind::Custom));
            }
            for (from, to) in edges {
                if from < to {
                    g.add_dependency(from, to);
                }
            }
            let order = g.topological_order().unwrap();
            let position: std::collections::HashMap<JobId, usize> =
                order.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
            for to in 0..8 {
                for &from in g.needs(to) {
                    proptest::prop_assert!(position[&from] < position[&to]);
                }
            }
        }
    }
}
