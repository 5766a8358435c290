//! Import resolver (spec §4.3, component C3): classifies `imports:`
//! entries, fetches local and remote fragments (cached), detects cycles,
//! and merges headers/bodies into the importing document.

pub mod cache;
pub mod fetch;
pub mod merge;
pub mod resolver;
pub mod spec;

pub use cache::ImportCache;
pub use fetch::{FetchError, GithubRemoteFetcher, RemoteFetcher, RemoteFragment};
pub use merge::ImportFragment;
pub use resolver::{ImportResolver, ResolvedImports};
pub use spec::{ImportSpec, ImportSpecError, parse_import};
