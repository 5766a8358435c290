//! The recursive validator (spec §4.2). Walks a parsed YAML header against
//! an [`ObjectSchema`] tree and accumulates [`Diagnostic`]s: unknown
//! property, type mismatch, enum violation, deprecated field, and
//! required-missing.

use std::path::Path;

use aw_core::diag::{Diagnostic, Diagnostics, Position, Severity, Suggestion};
use serde_yaml::Value;

use crate::suggest::{closest_matches, example_value, fallback_field_list, render_example};
use crate::types::{FieldSchema, ObjectSchema, SchemaType};

/// Carries the bits every recursive call needs but that never change
/// mid-walk: the raw header text for line lookups, the line offset back
/// into the original file, the file path for diagnostics, and the
/// diagnostics sink itself.
struct Ctx<'a> {
    header_text: &'a str,
    line_offset: usize,
    file: Option<&'a Path>,
    diagnostics: &'a mut Diagnostics,
}

/// Validate `value` (expected to be a mapping at the root) against
/// `schema`. `header_text` and `line_offset` back best-effort line lookups:
/// `serde_yaml::Value` carries no per-node span once parsed, so positions
/// are found by searching for `key:` textually — adequate for pointing at
/// the right line, not a precise parser.
pub fn validate(
    value: &Value,
    schema: &ObjectSchema,
    header_text: &str,
    line_offset: usize,
    file: Option<&Path>,
    diagnostics: &mut Diagnostics,
) {
    let mut ctx = Ctx {
        header_text,
        line_offset,
        file,
        diagnostics,
    };
    validate_object(value, schema, "", &mut ctx);
}

fn validate_object(value: &Value, schema: &ObjectSchema, path: &str, ctx: &mut Ctx) {
    let mapping = match value.as_mapping() {
        Some(m) => m,
        None => {
            if value.is_null() && schema.fields.iter().all(|f| !f.required) {
                return;
            }
            push_error(
                ctx,
                path,
                "type-mismatch",
                format!(
                    "expected an object at '{}', found {}",
                    display_path(path),
                    kind_of(value)
                ),
                Vec::new(),
            );
            return;
        }
    };

    for (key_value, field_value) in mapping.iter() {
        let Some(key) = key_value.as_str() else {
            continue;
        };
        match schema.field(key) {
            Some(field) if field.deprecated_in_favor_of.is_some() => {
                let replacement = field.deprecated_in_favor_of.unwrap();
                push_diag(
                    ctx,
                    Severity::Warning,
                    &join(path, key),
                    "deprecated-field",
                    format!("'{key}' is deprecated. Use '{replacement}' instead."),
                    vec![Suggestion::Hint(format!("rename to '{replacement}'"))],
                );
            }
            Some(field) => {
                let field_path = join(path, field.name);
                validate_type(&field.schema, field_value, &field_path, ctx);
            }
            None if schema.additional_properties => {}
            None => {
                let accepted = schema.accepted_names();
                let matches = closest_matches(key, &accepted);
                let suggestions: Vec<Suggestion> = if matches.is_empty() {
                    let fallback = fallback_field_list(schema);
                    vec![Suggestion::Hint(format!(
                        "valid fields here: {}",
                        fallback.join(", ")
                    ))]
                } else {
                    matches
                        .into_iter()
                        .map(|m| Suggestion::DidYouMean(m.to_string()))
                        .collect()
                };
                push_error(
                    ctx,
                    &join(path, key),
                    "unknown-property",
                    format!("unknown property '{key}'"),
                    suggestions,
                );
            }
        }
    }

    for field in &schema.fields {
        if field.required && mapping.get(Value::String(field.name.to_string())).is_none() {
            push_error(
                ctx,
                path,
                "required-missing",
                format!("missing required property '{}'", field.name),
                Vec::new(),
            );
        }
    }
}

fn validate_type(schema: &SchemaType, value: &Value, path: &str, ctx: &mut Ctx) {
    match schema {
        SchemaType::Any => {}
        SchemaType::String => {
            if value.as_str().is_none() {
                type_mismatch(schema, value, path, ctx);
            }
        }
        SchemaType::Integer => {
            if value.as_i64().is_none() {
                type_mismatch(schema, value, path, ctx);
            }
        }
        SchemaType::Boolean => {
            if value.as_bool().is_none() {
                type_mismatch(schema, value, path, ctx);
            }
        }
        SchemaType::Enum(allowed) => {
            let Some(typed) = value.as_str() else {
                type_mismatch(schema, value, path, ctx);
                return;
            };
            if !allowed.contains(&typed) {
                let suggestion = closest_matches(typed, allowed).into_iter().next();
                let allowed_list = allowed
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut suggestions = Vec::new();
                if let Some(s) = suggestion {
                    suggestions.push(Suggestion::DidYouMean(s.to_string()));
                }
                push_error(
                    ctx,
                    path,
                    "enum-violation",
                    format!("value must be one of {allowed_list}, found '{typed}'"),
                    suggestions,
                );
            }
        }
        SchemaType::Array(inner) => {
            let Some(seq) = value.as_sequence() else {
                type_mismatch(schema, value, path, ctx);
                return;
            };
            for (i, item) in seq.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                validate_type(inner, item, &item_path, ctx);
            }
        }
        SchemaType::Object(obj) => {
            validate_object(value, obj, path, ctx);
        }
        SchemaType::Union(alternatives) => {
            let clean = alternatives.iter().any(|alt| {
                let mut scratch = Diagnostics::new(false);
                let mut scratch_ctx = Ctx {
                    header_text: ctx.header_text,
                    line_offset: ctx.line_offset,
                    file: ctx.file,
                    diagnostics: &mut scratch,
                };
                validate_type(alt, value, path, &mut scratch_ctx);
                scratch.is_empty()
            });
            if !clean {
                if let Some(first) = alternatives.first() {
                    validate_type(first, value, path, ctx);
                }
            }
        }
    }
}

fn type_mismatch(schema: &SchemaType, value: &Value, path: &str, ctx: &mut Ctx) {
    let example = render_example(&example_value(schema));
    push_error(
        ctx,
        path,
        "type-mismatch",
        format!(
            "expected {} at '{}', found {} — expected something like: {}",
            schema.kind_name(),
            display_path(path),
            kind_of(value),
            example
        ),
        Vec::new(),
    );
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

/// Push an error-severity diagnostic. Most validation findings are fatal
/// (spec §7: `SchemaError` is fatal); [`push_diag`] is used directly for
/// the one case that isn't (a still-supported deprecated field).
fn push_error(ctx: &mut Ctx, path: &str, kind: &str, message: String, suggestions: Vec<Suggestion>) {
    push_diag(ctx, Severity::Error, path, kind, message, suggestions);
}

fn push_diag(
    ctx: &mut Ctx,
    severity: Severity,
    path: &str,
    kind: &str,
    message: String,
    suggestions: Vec<Suggestion>,
) {
    let last_key = path.rsplit(['.', '[']).next().unwrap_or(path);
    let base = if severity == Severity::Warning {
        Diagnostic::warning(kind, message)
    } else {
        Diagnostic::error(kind, message)
    };
    let mut diag = base.with_suggestions(suggestions);
    if let Some(file) = ctx.file {
        diag = diag.with_file(file);
    }
    if let Some(local_line) = find_key_line(ctx.header_text, last_key) {
        let line = local_line + ctx.line_offset - 1;
        diag = diag
            .with_position(Position::new(line, 1))
            .with_snippet(aw_core::diag::snippet_with_caret(
                ctx.header_text,
                local_line,
                1,
                1,
            ));
    }
    ctx.diagnostics.push(diag);
}

/// Best-effort: find the first line in `header_text` that looks like
/// `key:` at the start of a (possibly indented) line.
fn find_key_line(header_text: &str, key: &str) -> Option<usize> {
    let needle = format!("{key}:");
    for (i, line) in header_text.lines().enumerate() {
        if line.trim_start() == needle || line.trim_start().starts_with(&format!("{needle} ")) {
            return Some(i + 1);
        }
    }
    None
}
