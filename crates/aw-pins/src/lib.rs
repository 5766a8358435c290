//! Action pin manager (spec §4.9, component C9): maps each `uses:`
//! reference to a pinned 40-hex commit SHA via a lock file.

mod error;
mod lockfile;
mod pin;
mod reference;
mod resolver;
mod rewrite;

pub use error::PinError;
pub use lockfile::{ActionsLock, PinEntry};
pub use pin::pin_action;
pub use reference::{ActionRef, is_already_pinned, parse_action_ref};
pub use resolver::{CommitResolver, GithubCommitResolver};
pub use rewrite::pin_yaml_uses;
