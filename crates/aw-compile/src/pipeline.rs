//! Wires C1 through C9 into the single `compile` entry point (spec §2,
//! §6: `Compile(source) -> (bytes, diagnostics)`).

use std::path::Path;

use aw_core::diag::{Diagnostic, Diagnostics};
use aw_imports::{GithubRemoteFetcher, ImportResolver};
use aw_pins::{ActionsLock, GithubCommitResolver};
use aw_yaml::EmitContext;

use crate::options::CompileOptions;

/// The successful output of [`compile`]: the final `.lock.yml` bytes plus
/// the (possibly updated) action-pin lock file, ready to persist.
#[derive(Debug, Clone)]
pub struct CompiledWorkflow {
    pub yaml: String,
    pub actions_lock: ActionsLock,
}

/// Compile one workflow source document into its `.lock.yml` form.
/// Returns `None` alongside at least one fatal diagnostic on failure;
/// never panics on malformed input.
pub fn compile(source: &str, source_path: &Path, options: &CompileOptions) -> (Option<CompiledWorkflow>, Diagnostics) {
    let mut diagnostics = Diagnostics::new(options.strict);

    // C1: front-matter extraction.
    let document = match aw_frontmatter::extract(source) {
        Ok(doc) => doc,
        Err(err) => {
            diagnostics.push(err.into_diagnostic(source_path, source));
            return (None, diagnostics);
        }
    };

    // C2 (entry-level, pre-import): catches malformed headers early so
    // import resolution never recurses into a broken document.
    let entry_diags = aw_schema::validate_workflow(&document, Some(source_path), options.strict);
    let entry_fatal = entry_diags.has_fatal();
    diagnostics.extend(entry_diags.into_vec());
    if entry_fatal {
        return (None, diagnostics);
    }

    // C3: import resolution.
    let fetcher = GithubRemoteFetcher::new(options.github_token.clone());
    let resolver = ImportResolver::new(&fetcher, options.cache_dir.clone(), options.strict);
    let Some(resolved) = resolver.resolve(source_path, &document, &mut diagnostics) else {
        return (None, diagnostics);
    };

    // C2 (again, on the merged header): spec §4 data flow, "C2
    // (validation on merged header)".
    let merged_header_text = serde_yaml::to_string(&resolved.merged_header).unwrap_or_default();
    let merged_document = aw_frontmatter::SourceDocument {
        header: resolved.merged_header.clone(),
        header_text: merged_header_text,
        header_line_offset: 0,
        body: resolved.merged_body.clone(),
    };
    let merged_diags = aw_schema::validate_workflow(&merged_document, Some(source_path), options.strict);
    let merged_fatal = merged_diags.has_fatal();
    diagnostics.extend(merged_diags.into_vec());
    if merged_fatal {
        return (None, diagnostics);
    }

    // C4: semantic model build.
    let Some(mut data) = aw_model::build(&resolved.merged_header, &resolved.resolved, source_path, options.strict, &mut diagnostics) else {
        return (None, diagnostics);
    };

    // C5: fuzzy schedule / stop-after lowering.
    aw_schedule::lower_schedules(&mut data, &mut diagnostics);
    if diagnostics.has_fatal() {
        return (None, diagnostics);
    }

    // C6: job graph planning.
    let plan = match aw_jobs::plan(&data) {
        Ok(plan) => plan,
        Err(err) => {
            diagnostics.push(Diagnostic::error("job-graph-error", err.to_string()).with_file(source_path));
            return (None, diagnostics);
        }
    };

    // C7's handler-job shape was already folded into `plan` via
    // `aw_safe_outputs::plan_handlers`; C8 emits the tree.
    let ctx = EmitContext {
        frontmatter_source: source.to_string(),
        imports: resolved
            .resolved
            .iter()
            .map(|(reference, sha)| aw_yaml::ImportRecord {
                reference: reference.clone(),
                resolved_sha: sha.clone(),
            })
            .collect(),
        prompt_components: Vec::new(),
        creator_prompt: document.body.clone(),
    };
    let yaml = aw_yaml::emit(&data, &plan, &ctx);

    // C9: action pinning, as a post-process over the emitted text.
    let mut actions_lock = match ActionsLock::load(&options.lock_file_path) {
        Ok(lock) => lock,
        Err(err) => {
            diagnostics.push(Diagnostic::error("pin-lockfile-error", err.to_string()).with_file(&options.lock_file_path));
            return (None, diagnostics);
        }
    };
    let commit_resolver = GithubCommitResolver::new(options.github_token.clone());
    let pinned_yaml = match aw_pins::pin_yaml_uses(&yaml, &mut actions_lock, &commit_resolver, !options.no_pin_update) {
        Ok(yaml) => yaml,
        Err(err) => {
            diagnostics.push(
                Diagnostic::error("pin-error", err.to_string())
                    .with_file(source_path)
                    .with_suggestion(aw_core::diag::Suggestion::Hint("run `aw pin-update`".to_string())),
            );
            return (None, diagnostics);
        }
    };

    (
        Some(CompiledWorkflow {
            yaml: pinned_yaml,
            actions_lock,
        }),
        diagnostics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options() -> CompileOptions {
        let dir = tempfile::tempdir().unwrap();
        CompileOptions {
            strict: false,
            no_fix: false,
            no_pin_update: true,
            cache_dir: dir.into_path(),
            lock_file_path: PathBuf::from("/nonexistent/actions-lock.json"),
            github_token: None,
        }
    }

    #[test]
    fn compiles_a_minimal_dispatch_workflow() {
        let source = "---\nname: demo\non: workflow_dispatch\npermissions: read-all\nengine: copilot\n---\nDo the thing.\n";
        let (compiled, diagnostics) = compile(source, Path::new("demo.md"), &options());
        assert!(diagnostics.iter().all(|d| !d.is_fatal()), "unexpected diagnostics: {:?}", diagnostics.iter().map(|d| d.render()).collect::<Vec<_>>());
        let compiled = compiled.expect("compilation should succeed");
        assert!(compiled.yaml.contains("name: demo"));
        assert!(compiled.yaml.contains("jobs:"));
    }

    #[test]
    fn malformed_header_is_fatal_and_returns_none() {
        let source = "not frontmatter at all";
        let (compiled, diagnostics) = compile(source, Path::new("demo.md"), &options());
        assert!(compiled.is_none());
        assert!(diagnostics.has_fatal());
    }

    #[test]
    fn unknown_engine_is_fatal() {
        let source = "---\nname: demo\non: workflow_dispatch\nengine: not-a-real-engine\n---\nbody\n";
        let (compiled, diagnostics) = compile(source, Path::new("demo.md"), &options());
        assert!(compiled.is_none());
        assert!(diagnostics.has_fatal());
    }
}
