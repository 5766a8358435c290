//! Semantic errors raised while lowering a merged header into
//! [`WorkflowData`](crate::WorkflowData) (spec §4.4, §7 `SemanticError`).

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("unknown event type '{0}' in 'on:'")]
    UnknownEvent(String),

    #[error("tool '{0}' declares more than one transport (stdio/http/container); exactly one is required")]
    MultipleTransports(String),

    #[error("tool '{0}' declares no transport (stdio/http/container)")]
    MissingTransport(String),

    #[error("'lock-for-agent' requires 'issues: write' but permissions explicitly set 'issues: none'")]
    LockForAgentPermissionConflict,

    #[error("unknown engine '{0}'")]
    UnknownEngine(String),

    #[error("unknown safe-output kind '{0}'")]
    UnknownSafeOutputKind(String),

    #[error("'on:' must declare at least one event")]
    EmptyOn,
}
