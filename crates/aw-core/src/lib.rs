//! Shared diagnostic, ordered-map, and hashing primitives used throughout
//! the agentic workflow compiler pipeline (front-matter through emission).

pub mod diag;
pub mod env;
pub mod hash;

pub use diag::{Diagnostic, Diagnostics, Position, Severity, Suggestion};
pub use hash::content_hash16;

/// Insertion-order-preserving map, used everywhere a language-default
/// unordered map would otherwise break the compiler's determinism
/// guarantee (spec §5, §9 "ordered mappings everywhere").
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V>;
