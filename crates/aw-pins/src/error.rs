#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("cannot parse action reference '{0}'")]
    InvalidReference(String),
    #[error(
        "action '{0}' is not in the lock file and pin updates were not requested; run `aw pin-update` to add it"
    )]
    PinMissing(String),
    #[error("{0} not found while resolving '{1}'")]
    NotFound(String, String),
    #[error("transport error resolving '{1}': {0}")]
    Transport(String, String),
    #[error("failed to read lock file {0}: {1}")]
    LockFileRead(String, String),
    #[error("failed to write lock file {0}: {1}")]
    LockFileWrite(String, String),
}
