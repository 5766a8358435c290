//! Deterministic map key ordering (spec §4.8): an explicit priority list
//! first, any remaining keys alphabetical after it. Array order is
//! always preserved from the input.

use serde_yaml::{Mapping, Value};

pub const TOP_LEVEL_ORDER: &[&str] = &["name", "on", "permissions", "env", "defaults", "concurrency", "jobs"];
pub const JOB_ORDER: &[&str] = &[
    "name",
    "runs-on",
    "permissions",
    "environment",
    "if",
    "needs",
    "env",
    "outputs",
    "steps",
];
pub const STEP_ORDER: &[&str] = &["name", "id", "if", "uses", "run", "with", "env"];

/// Reorder `mapping`'s keys: entries named in `priority` come first, in
/// `priority`'s order; everything else follows, sorted alphabetically by
/// key.
pub fn reorder(mapping: Mapping, priority: &[&str]) -> Mapping {
    let mut ordered = Mapping::new();
    for key in priority {
        let value_key = Value::String(key.to_string());
        if let Some((_, value)) = mapping.get_key_value(&value_key) {
            ordered.insert(value_key, value.clone());
        }
    }
    let mut remainder: Vec<(String, Value)> = mapping
        .into_iter()
        .filter_map(|(k, v)| match k {
            Value::String(s) if !priority.contains(&s.as_str()) => Some((s, v)),
            _ => None,
        })
        .collect();
    remainder.sort_by(|a, b| a.0.cmp(&b.0));
    for (k, v) in remainder {
        ordered.insert(Value::String(k), v);
    }
    ordered
}
