//! Leading banner comments (spec §6 "Output (`.lock.yml`)"): a
//! frontmatter content hash, the resolved import list with commit SHAs,
//! a prompt-component version manifest, and the creator prompt hash.

use aw_core::content_hash16;

/// One resolved import, as recorded for the banner (spec §4.3/§4.8:
/// "resolved import list with commit SHAs").
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub reference: String,
    pub resolved_sha: Option<String>,
}

/// One system-prompt component and the date it was last touched (spec §6:
/// "System Prompt Versions: list `- <file>: <YYYY-MM-DD>`").
#[derive(Debug, Clone, PartialEq)]
pub struct PromptComponent {
    pub file: String,
    pub date: String,
}

pub fn render_banner(
    frontmatter_source: &str,
    imports: &[ImportRecord],
    prompt_components: &[PromptComponent],
    creator_prompt: &str,
) -> String {
    let mut lines = Vec::new();
    lines.push(format!("# frontmatter-hash: {}", content_hash16(frontmatter_source.as_bytes())));

    if !imports.is_empty() {
        lines.push("# Resolved Imports:".to_string());
        for import in imports {
            match &import.resolved_sha {
                Some(sha) => lines.push(format!("#   - {}: {sha}", import.reference)),
                None => lines.push(format!("#   - {} (local)", import.reference)),
            }
        }
    }

    lines.push("# System Prompt Versions:".to_string());
    if prompt_components.is_empty() {
        lines.push("#   (none)".to_string());
    } else {
        for component in prompt_components {
            lines.push(format!("#   - {}: {}", component.file, component.date));
        }
    }

    lines.push(format!("# Creator Prompt Hash: {}", content_hash16(creator_prompt.as_bytes())));
    lines.push("# This file is generated. Do not edit by hand.".to_string());
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_deterministic_for_the_same_inputs() {
        let imports = vec![ImportRecord {
            reference: "octo/shared/tools.md@main".to_string(),
            resolved_sha: Some("abc123".to_string()),
        }];
        let components = vec![PromptComponent {
            file: "base.md".to_string(),
            date: "2026-01-01".to_string(),
        }];
        let a = render_banner("---\nname: test\n---\n", &imports, &components, "creator prompt text");
        let b = render_banner("---\nname: test\n---\n", &imports, &components, "creator prompt text");
        assert_eq!(a, b);
        assert!(a.starts_with("# frontmatter-hash: "));
        assert!(a.contains("# Resolved Imports:"));
        assert!(a.contains("octo/shared/tools.md@main: abc123"));
    }

    #[test]
    fn no_imports_omits_the_resolved_imports_section() {
        let banner = render_banner("---\nname: test\n---\n", &[], &[], "creator prompt text");
        assert!(!banner.contains("# Resolved Imports:"));
    }
}
