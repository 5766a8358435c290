//! Schema validator + diagnostic engine (spec §4.2, component C2).
//!
//! Validates a parsed front-matter header against a schema that forbids
//! unknown properties everywhere, producing Rust-style diagnostics with
//! file/line/column, source snippet, and typo/example-value suggestions.

mod schema_def;
mod suggest;
mod types;
mod validate;

pub use schema_def::{import_header_schema, workflow_header_schema};
pub use types::{FieldSchema, ObjectSchema, SchemaType};

use aw_core::diag::Diagnostics;
use aw_frontmatter::SourceDocument;
use std::path::Path;

/// Validate a top-level workflow document's header (spec §4.2).
pub fn validate_workflow(
    document: &SourceDocument,
    file: Option<&Path>,
    strict: bool,
) -> Diagnostics {
    tracing::debug!(file = ?file, strict, "validating workflow header");
    let mut diagnostics = Diagnostics::new(strict);
    validate::validate(
        &document.header,
        &workflow_header_schema(),
        &document.header_text,
        document.header_line_offset,
        file,
        &mut diagnostics,
    );
    tracing::debug!(count = diagnostics.len(), "schema validation complete");
    diagnostics
}

/// Validate an imported fragment's header against the import subset schema
/// (spec §4.3: "must pass a *subset* schema that forbids top-level-only
/// fields like `on:` at import sites").
pub fn validate_import(
    document: &SourceDocument,
    file: Option<&Path>,
    strict: bool,
) -> Diagnostics {
    tracing::debug!(file = ?file, strict, "validating import header");
    let mut diagnostics = Diagnostics::new(strict);
    validate::validate(
        &document.header,
        &import_header_schema(),
        &document.header_text,
        document.header_line_offset,
        file,
        &mut diagnostics,
    );
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str) -> SourceDocument {
        aw_frontmatter::extract(source).unwrap()
    }

    #[test]
    fn typo_permisions_suggests_permissions() {
        let document = doc("---\nname: demo\non: workflow_dispatch\npermisions: write-all\n---\nbody\n");
        let diags = validate_workflow(&document, None, false);
        let rendered: Vec<String> = diags.iter().map(|d| d.render()).collect();
        let joined = rendered.join("\n");
        assert!(joined.contains("unknown property 'permisions'"));
        assert!(joined.contains("Did you mean 'permissions'?"));
    }

    #[test]
    fn enum_typo_engine_coplit() {
        let document = doc("---\nname: demo\non: workflow_dispatch\nengine: coplit\n---\nbody\n");
        let diags = validate_workflow(&document, None, false);
        let joined: String = diags.iter().map(|d| d.render()).collect::<Vec<_>>().join("\n");
        assert!(joined.contains("must be one of"));
        assert!(joined.contains("Did you mean 'copilot'?"));
    }

    #[test]
    fn deprecated_timeout_minutes_suggests_rename() {
        let document = doc("---\nname: demo\non: workflow_dispatch\ntimeout_minutes: 10\n---\nbody\n");
        let diags = validate_workflow(&document, None, false);
        let joined: String = diags.iter().map(|d| d.render()).collect::<Vec<_>>().join("\n");
        assert!(joined.contains("timeout-minutes"));
    }

    #[test]
    fn minimal_valid_header_has_no_diagnostics() {
        let document = doc("---\nname: demo\non: workflow_dispatch\npermissions: read-all\nengine: copilot\n---\nbody\n");
        let diags = validate_workflow(&document, None, false);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags.iter().map(|d| d.render()).collect::<Vec<_>>());
    }

    #[test]
    fn strict_mode_promotes_deprecated_warning_to_fatal() {
        let source = "---\nname: demo\non: workflow_dispatch\nsafe-outputs:\n  create-issue:\n    max-count: 3\n---\nbody\n";
        let document = doc(source);

        let lenient = validate_workflow(&document, None, false);
        assert!(!lenient.has_fatal(), "deprecated field alone shouldn't be fatal outside strict mode");

        let strict = validate_workflow(&document, None, true);
        assert!(strict.has_fatal(), "strict mode must promote the deprecated-field warning");
    }

    #[test]
    fn import_header_rejects_on_key() {
        let document = doc("---\non: push\n---\nbody\n");
        let diags = validate_import(&document, None, false);
        assert!(!diags.is_empty());
    }
}
