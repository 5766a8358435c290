#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum JobsError {
    #[error("job '{0}' declares 'needs: {1}' but no job with that name exists")]
    UnknownNeed(String, String),
    #[error("dependency cycle detected among jobs: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),
    #[error("'conclusion' must be terminal but job '{0}' depends on it")]
    ConclusionNotTerminal(String),
    #[error("duplicate job name '{0}'")]
    DuplicateJobName(String),
}
