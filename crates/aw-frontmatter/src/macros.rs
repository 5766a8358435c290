//! Scanning of body-level placeholders referenced by spec §3/§6:
//! `{{#runtime-import PATH}}` directives (consumed by the import resolver,
//! C3) and `${{ ... }}` GitHub Actions expressions, which this compiler
//! never evaluates and must pass through untouched.

use std::sync::LazyLock;

static RUNTIME_IMPORT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\{\{#runtime-import\s+([^}]+?)\s*\}\}").expect("valid regex")
});

static EXPRESSION_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{\{.*?\}\}").expect("valid regex"));

/// Collect every `{{#runtime-import PATH}}` reference in document order.
pub fn runtime_imports(body: &str) -> Vec<String> {
    RUNTIME_IMPORT_RE
        .captures_iter(body)
        .map(|c| c[1].trim().to_string())
        .collect()
}

/// `true` if `text` contains at least one `${{ ... }}` expression. Used by
/// callers that want to skip macro-expansion or escaping logic over spans
/// that already look like a GitHub Actions expression.
pub fn contains_expression(text: &str) -> bool {
    EXPRESSION_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_runtime_imports_in_order() {
        let body = "intro\n{{#runtime-import shared/setup.md}}\nmiddle\n{{#runtime-import shared/teardown.md}}\n";
        let imports = runtime_imports(body);
        assert_eq!(imports, vec!["shared/setup.md", "shared/teardown.md"]);
    }

    #[test]
    fn no_imports_returns_empty() {
        assert!(runtime_imports("just prose, no directives").is_empty());
    }

    #[test]
    fn detects_expression_placeholders() {
        assert!(contains_expression("Hello ${{ github.actor }}!"));
        assert!(!contains_expression("Hello, no expression here."));
    }
}
