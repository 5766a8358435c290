//! Workflow model builder (spec §4.4, component C4): normalizes a merged
//! (header, body) document into the compiler's central [`WorkflowData`]
//! value.

mod build;
mod error;
pub mod safe_outputs;
mod types;

pub use build::build;
pub use error::SemanticError;
pub use safe_outputs::{SafeOutputEntry, SafeOutputKind, SafeOutputsConfig};
pub use types::*;
