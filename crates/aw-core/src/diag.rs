//! Diagnostics: the single value every compiler stage reports through.
//!
//! Every pass — front-matter parsing, schema validation, import resolution,
//! semantic lowering, pin resolution — emits [`Diagnostic`] values instead of
//! returning bare strings. The CLI is the only thing that renders them.

use std::fmt;
use std::path::{Path, PathBuf};

/// How serious a diagnostic is. In strict mode, [`Severity::Warning`] is
/// promoted to fatal by the caller (the diagnostic itself never changes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A 1-indexed (line, column) position within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A suggested fix, rendered as `Did you mean 'X'?` or an example value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// A single close-match name (field, enum value).
    DidYouMean(String),
    /// An example value to show for a type mismatch, already formatted.
    ExampleValue(String),
    /// A free-form remediation hint (e.g. "run `aw pin-update`").
    Hint(String),
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::DidYouMean(s) => write!(f, "Did you mean '{s}'?"),
            Suggestion::ExampleValue(s) => write!(f, "expected something like: {s}"),
            Suggestion::Hint(s) => write!(f, "{s}"),
        }
    }
}

/// A single diagnostic: severity, optional position, message, optional
/// source snippet, and zero or more suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: Option<PathBuf>,
    pub position: Option<Position>,
    pub kind: String,
    pub message: String,
    pub snippet: Option<String>,
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: None,
            position: None,
            kind: kind.into(),
            message: message.into(),
            snippet: None,
            suggestions: Vec::new(),
        }
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Promote a warning to an error (used in strict mode). No-op on
    /// anything already at or above `Error`.
    pub fn promote(mut self) -> Self {
        if self.severity == Severity::Warning {
            self.severity = Severity::Error;
        }
        self
    }

    /// Render the Rust-style one-diagnostic text block described in spec
    /// §4.2: `path:L:C: <kind>: <msg>` followed by the snippet and a caret
    /// underline, followed by suggestion lines.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let loc = match (&self.file, &self.position) {
            (Some(f), Some(p)) => format!("{}:{}:{}: ", display_relative(f), p.line, p.column),
            (Some(f), None) => format!("{}: ", display_relative(f)),
            (None, Some(p)) => format!("{}:{}: ", p.line, p.column),
            (None, None) => String::new(),
        };

        out.push_str(&loc);
        out.push_str(&format!("{}: {}\n", self.kind, self.message));

        if let Some(snippet) = &self.snippet {
            for line in snippet.lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }

        for suggestion in &self.suggestions {
            out.push_str(&format!("  {suggestion}\n"));
        }

        out
    }
}

/// Render `file` relative to the current working directory when possible,
/// falling back to the absolute path.
fn display_relative(file: &Path) -> String {
    match std::env::current_dir() {
        Ok(cwd) => file
            .strip_prefix(&cwd)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| file.display().to_string()),
        Err(_) => file.display().to_string(),
    }
}

/// Build a `±context` source snippet around a 1-indexed line number, with a
/// caret underline beneath the target column.
pub fn snippet_with_caret(source: &str, line: usize, column: usize, context: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if line == 0 || line > lines.len() {
        return String::new();
    }
    let idx = line - 1;
    let start = idx.saturating_sub(context);
    let end = (idx + context + 1).min(lines.len());

    let mut out = String::new();
    for (i, text) in lines[start..end].iter().enumerate() {
        let lineno = start + i + 1;
        out.push_str(&format!("{lineno:>4} | {text}\n"));
        if lineno == line {
            let pad = column.saturating_sub(1);
            out.push_str(&format!("     | {}^\n", " ".repeat(pad)));
        }
    }
    out
}

/// An accumulated, ordered set of diagnostics from a single compilation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    strict: bool,
}

impl Diagnostics {
    pub fn new(strict: bool) -> Self {
        Self {
            items: Vec::new(),
            strict,
        }
    }

    /// Push a diagnostic, promoting warnings to errors when strict mode is
    /// enabled (spec §7: "In strict mode all warnings become errors").
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let diagnostic = if self.strict {
            diagnostic.promote()
        } else {
            diagnostic
        };
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.push(d);
        }
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_location_and_message() {
        let diag = Diagnostic::error("unknown-property", "unknown property 'permisions'")
            .with_file(Path::new("/tmp/workflow.md"))
            .with_position(Position::new(3, 1))
            .with_suggestion(Suggestion::DidYouMean("permissions".to_string()));
        let rendered = diag.render();
        assert!(rendered.contains("3:1:"));
        assert!(rendered.contains("unknown-property"));
        assert!(rendered.contains("Did you mean 'permissions'?"));
    }

    #[test]
    fn strict_mode_promotes_warnings() {
        let mut diags = Diagnostics::new(true);
        diags.push(Diagnostic::warning("merge-conflict", "colliding key"));
        assert!(diags.has_fatal());
    }

    #[test]
    fn non_strict_keeps_warnings_non_fatal() {
        let mut diags = Diagnostics::new(false);
        diags.push(Diagnostic::warning("merge-conflict", "colliding key"));
        assert!(!diags.has_fatal());
    }

    #[test]
    fn snippet_with_caret_marks_target_column() {
        let source = "a: 1\nb: 2\nc: bad-value\nd: 4\n";
        let snippet = snippet_with_caret(source, 3, 4, 1);
        assert!(snippet.contains("c: bad-value"));
        assert!(snippet.contains('^'));
    }
}
