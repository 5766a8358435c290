//! Diagnostic rendering duality (SPEC_FULL.md §B): human-readable text by
//! default (honoring `NO_COLOR`), or one JSON array per `--format-json`.

use aw_core::diag::{Diagnostic, Diagnostics};
use serde_json::{Value, json};

fn diagnostic_to_json(diagnostic: &Diagnostic) -> Value {
    json!({
        "severity": diagnostic.severity.to_string(),
        "file": diagnostic.file.as_ref().map(|f| f.display().to_string()),
        "position": diagnostic.position.map(|p| json!({ "line": p.line, "column": p.column })),
        "kind": diagnostic.kind,
        "message": diagnostic.message,
        "suggestions": diagnostic.suggestions.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    })
}

pub fn render_json(diagnostics: &Diagnostics) -> String {
    let items: Vec<Value> = diagnostics.iter().map(diagnostic_to_json).collect();
    serde_json::to_string_pretty(&Value::Array(items)).unwrap_or_else(|_| "[]".to_string())
}

/// Colorized text rendering, disabled when `NO_COLOR` is set (any
/// non-empty value) per the `NO_COLOR` convention.
pub fn render_text(diagnostics: &Diagnostics) -> String {
    let color = std::env::var("NO_COLOR").map(|v| v.is_empty()).unwrap_or(true);
    diagnostics
        .iter()
        .map(|d| {
            let rendered = d.render();
            if color {
                paint(&rendered, d.severity)
            } else {
                rendered
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint(text: &str, severity: aw_core::diag::Severity) -> String {
    let code = match severity {
        aw_core::diag::Severity::Error => "31",
        aw_core::diag::Severity::Warning => "33",
        aw_core::diag::Severity::Info => "36",
    };
    format!("\x1b[{code}m{text}\x1b[0m")
}

pub fn render(diagnostics: &Diagnostics, as_json: bool) -> String {
    if as_json {
        render_json(diagnostics)
    } else {
        render_text(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rendering_is_valid_json() {
        let mut diags = Diagnostics::new(false);
        diags.push(Diagnostic::error("schema-error", "bad field"));
        let rendered = render_json(&diags);
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["kind"], "schema-error");
    }

    #[test]
    fn text_rendering_includes_the_message() {
        let mut diags = Diagnostics::new(false);
        diags.push(Diagnostic::error("schema-error", "bad field"));
        let rendered = render_text(&diags);
        assert!(rendered.contains("bad field"));
    }
}
