//! Front-matter extraction (spec §4.1, component C1).
//!
//! Splits a workflow source document into its YAML header and Markdown
//! body, preserving enough position information for the schema validator
//! (C2) to render file/line/column diagnostics against the *original* file,
//! not just the extracted header text.

mod error;
mod extract;
pub mod macros;

pub use error::ParseError;
pub use extract::{SourceDocument, extract};
