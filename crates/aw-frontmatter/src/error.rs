use aw_core::diag::{Diagnostic, Position, snippet_with_caret};
use std::path::Path;

/// Failures from splitting and parsing the YAML front-matter header (spec
/// §4.1, edge cases).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("file does not start with a `---` frontmatter fence")]
    MissingOpeningFence,

    #[error("frontmatter is not terminated by a closing `---` fence")]
    UnterminatedHeader,

    #[error("invalid YAML in frontmatter: {message}")]
    Yaml {
        message: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Convert to a renderable [`Diagnostic`], with a source snippet taken
    /// from the *original* file content (not just the extracted header).
    pub fn into_diagnostic(self, file: &Path, source: &str) -> Diagnostic {
        let diag = Diagnostic::error("frontmatter", self.to_string()).with_file(file);
        match self {
            ParseError::MissingOpeningFence => {
                diag.with_position(Position::new(1, 1)).with_snippet(
                    snippet_with_caret(source, 1, 1, 1),
                )
            }
            ParseError::UnterminatedHeader => diag,
            ParseError::Yaml { line, column, .. } => diag
                .with_position(Position::new(line, column))
                .with_snippet(snippet_with_caret(source, line, column, 2)),
        }
    }
}
