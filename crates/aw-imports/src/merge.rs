//! Header and body merging across an importing document and its resolved
//! imports (spec §4.3 step 4-5).
//!
//! Merge rule: the importing document's keys win over the imported;
//! scalar fields are overridden, mappings are deep-merged, sequences
//! concatenate with de-duplication; conflicting single-valued keys in two
//! *sibling* imports (neither of which is the importer) raise a merge
//! warning, promoted to an error in strict mode.

use aw_core::diag::{Diagnostic, Diagnostics};
use serde_yaml::Value;

/// One resolved import fragment, ready to be merged into the importer.
pub struct ImportFragment {
    /// Dotted identity (spec §4.3's "import chain"), used in diagnostics.
    pub identity: String,
    pub header: Value,
    pub body: String,
}

/// Merge the importer's own header with all of its resolved imports, in
/// import-declaration order. Imports merge into each other first
/// (sibling-vs-sibling conflicts are reported against the import identity,
/// not the importer), then the importer's header is merged on top, always
/// winning.
pub fn merge_headers(
    importer_header: &Value,
    imports: &[ImportFragment],
    diagnostics: &mut Diagnostics,
) -> Value {
    let mut merged = Value::Mapping(serde_yaml::Mapping::new());
    for fragment in imports {
        merged = merge_value(&merged, &fragment.header, &fragment.identity, true, diagnostics);
    }
    // The importer's own header always wins over its imports (spec §4.3
    // step 4) — that's the normal, expected case, not a conflict between
    // two equally-ranked sources, so it never raises a merge warning.
    merge_value(&merged, importer_header, "<this file>", false, diagnostics)
}

/// Concatenate the importer body with every imported body, each preceded
/// by a marker comment naming the import (spec §4.3 step 5).
pub fn merge_bodies(importer_body: &str, imports: &[ImportFragment]) -> String {
    let mut out = importer_body.to_string();
    for fragment in imports {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("<!-- imported from {} -->\n", fragment.identity));
        out.push_str(&fragment.body);
    }
    out
}

/// Deep-merge `incoming` on top of `base`: `incoming`'s scalars win,
/// mappings merge key by key, sequences concatenate with de-duplication.
/// `incoming_label` identifies the side doing the overriding, for
/// diagnostics. `warn_on_conflict` gates the `merge-conflict` diagnostic:
/// it fires for sibling-import-vs-sibling-import disagreements, never for
/// the importer overriding an import, since that's the spec-sanctioned
/// default (spec §4.3 step 4: "the importing document's keys win").
fn merge_value(
    base: &Value,
    incoming: &Value,
    incoming_label: &str,
    warn_on_conflict: bool,
    diagnostics: &mut Diagnostics,
) -> Value {
    match (base, incoming) {
        (Value::Mapping(base_map), Value::Mapping(incoming_map)) => {
            let mut result = base_map.clone();
            for (key, incoming_value) in incoming_map.iter() {
                match result.get(key) {
                    Some(existing) if existing != incoming_value => {
                        let merged = merge_value(existing, incoming_value, incoming_label, warn_on_conflict, diagnostics);
                        if warn_on_conflict
                            && !matches!(existing, Value::Mapping(_))
                            && !matches!(existing, Value::Sequence(_))
                        {
                            let key_name = key.as_str().unwrap_or("<non-string key>");
                            diagnostics.push(Diagnostic::warning(
                                "merge-conflict",
                                format!(
                                    "'{key_name}' is set differently by {incoming_label} than by an earlier import; the later value wins"
                                ),
                            ));
                        }
                        result.insert(key.clone(), merged);
                    }
                    Some(_) => {}
                    None => {
                        result.insert(key.clone(), incoming_value.clone());
                    }
                }
            }
            Value::Mapping(result)
        }
        (Value::Sequence(base_seq), Value::Sequence(incoming_seq)) => {
            let mut result = base_seq.clone();
            for item in incoming_seq {
                if !result.contains(item) {
                    result.push(item.clone());
                }
            }
            Value::Sequence(result)
        }
        (Value::Null, _) => incoming.clone(),
        (_, Value::Null) => base.clone(),
        _ => incoming.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, Value)]) -> Value {
        let mut m = serde_yaml::Mapping::new();
        for (k, v) in pairs {
            m.insert(Value::String((*k).to_string()), v.clone());
        }
        Value::Mapping(m)
    }

    #[test]
    fn importer_scalar_overrides_import() {
        let importer = mapping(&[("description", Value::String("mine".to_string()))]);
        let fragment = ImportFragment {
            identity: "shared/setup.md".to_string(),
            header: mapping(&[("description", Value::String("theirs".to_string()))]),
            body: String::new(),
        };
        let mut diags = Diagnostics::new(false);
        let merged = merge_headers(&importer, &[fragment], &mut diags);
        assert_eq!(
            merged.as_mapping().unwrap().get("description").unwrap().as_str(),
            Some("mine")
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn importer_override_in_strict_mode_does_not_become_fatal() {
        let importer = mapping(&[("timeout-minutes", Value::Number(10.into()))]);
        let fragment = ImportFragment {
            identity: "shared/setup.md".to_string(),
            header: mapping(&[("timeout-minutes", Value::Number(5.into()))]),
            body: String::new(),
        };
        let mut diags = Diagnostics::new(true);
        let merged = merge_headers(&importer, &[fragment], &mut diags);
        assert_eq!(
            merged.as_mapping().unwrap().get("timeout-minutes").unwrap().as_i64(),
            Some(10)
        );
        assert!(diags.is_empty());
        assert!(!diags.has_fatal());
    }

    #[test]
    fn sequences_concatenate_and_dedup() {
        let importer = mapping(&[(
            "tags",
            Value::Sequence(vec![Value::String("a".to_string()), Value::String("b".to_string())]),
        )]);
        let fragment = ImportFragment {
            identity: "shared/tags.md".to_string(),
            header: mapping(&[(
                "tags",
                Value::Sequence(vec![Value::String("b".to_string()), Value::String("c".to_string())]),
            )]),
            body: String::new(),
        };
        let mut diags = Diagnostics::new(false);
        let merged = merge_headers(&importer, &[fragment], &mut diags);
        let tags = merged.as_mapping().unwrap().get("tags").unwrap().as_sequence().unwrap();
        let strings: Vec<&str> = tags.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(strings, vec!["b", "c", "a"]);
    }

    #[test]
    fn sibling_scalar_conflict_warns() {
        let importer = mapping(&[]);
        let first = ImportFragment {
            identity: "shared/one.md".to_string(),
            header: mapping(&[("timeout-minutes", Value::Number(5.into()))]),
            body: String::new(),
        };
        let second = ImportFragment {
            identity: "shared/two.md".to_string(),
            header: mapping(&[("timeout-minutes", Value::Number(10.into()))]),
            body: String::new(),
        };
        let mut diags = Diagnostics::new(false);
        let merged = merge_headers(&importer, &[first, second], &mut diags);
        assert!(!diags.is_empty());
        assert!(!diags.has_fatal());
        assert_eq!(
            merged.as_mapping().unwrap().get("timeout-minutes").unwrap().as_i64(),
            Some(10)
        );
    }

    #[test]
    fn strict_mode_promotes_merge_conflict() {
        let importer = mapping(&[]);
        let first = ImportFragment {
            identity: "shared/one.md".to_string(),
            header: mapping(&[("timeout-minutes", Value::Number(5.into()))]),
            body: String::new(),
        };
        let second = ImportFragment {
            identity: "shared/two.md".to_string(),
            header: mapping(&[("timeout-minutes", Value::Number(10.into()))]),
            body: String::new(),
        };
        let mut diags = Diagnostics::new(true);
        merge_headers(&importer, &[first, second], &mut diags);
        assert!(diags.has_fatal());
    }

    #[test]
    fn bodies_concatenate_with_marker_comments() {
        let fragment = ImportFragment {
            identity: "shared/setup.md".to_string(),
            header: Value::Null,
            body: "setup body\n".to_string(),
        };
        let merged = merge_bodies("main body\n", &[fragment]);
        assert!(merged.contains("main body"));
        assert!(merged.contains("<!-- imported from shared/setup.md -->"));
        assert!(merged.contains("setup body"));
    }
}
