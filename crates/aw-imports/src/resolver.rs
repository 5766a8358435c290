//! The import resolver driver (spec §4.3): normalizes and cycle-checks
//! `imports:` entries, fetches (local read or remote, cached), recurses
//! into each fragment's own imports, then merges everything into the
//! entry document.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use aw_core::diag::{Diagnostic, Diagnostics};
use aw_frontmatter::SourceDocument;
use serde_yaml::Value;

use crate::cache::ImportCache;
use crate::fetch::{CHAIN_DEADLINE, RemoteFetcher, fetch_with_retry};
use crate::merge::{ImportFragment, merge_bodies, merge_headers};
use crate::spec::{ImportSpec, parse_import};

/// The fully resolved output of import resolution: the merged header/body
/// ready for C2's full-schema validation and C4's model build, plus the
/// resolved import list (with commit SHAs) for the lock-file banner (spec
/// §4.8, §6).
pub struct ResolvedImports {
    pub merged_header: Value,
    pub merged_body: String,
    /// `(identity, commit_sha)` for every remote import actually fetched,
    /// in resolution order — `commit_sha` is `None` for local imports.
    pub resolved: Vec<(String, Option<String>)>,
}

pub struct ImportResolver<'a> {
    fetcher: &'a dyn RemoteFetcher,
    cache: ImportCache,
    strict: bool,
}

impl<'a> ImportResolver<'a> {
    pub fn new(fetcher: &'a dyn RemoteFetcher, cache_root: PathBuf, strict: bool) -> Self {
        Self {
            fetcher,
            cache: ImportCache::new(cache_root),
            strict,
        }
    }

    /// Resolve `entry`'s `imports:` (and everything they transitively
    /// import), merging into a single header/body. Returns `None` if any
    /// fatal diagnostic was pushed (unreachable import, cycle, schema
    /// violation, or chain deadline exceeded — spec §4.3 "Failure").
    pub fn resolve(
        &self,
        entry_path: &Path,
        entry: &SourceDocument,
        diagnostics: &mut Diagnostics,
    ) -> Option<ResolvedImports> {
        let deadline = Instant::now() + CHAIN_DEADLINE;
        let mut visited = HashSet::new();
        let root_identity = entry_path.display().to_string();
        visited.insert(root_identity.clone());
        let mut chain = vec![root_identity];
        let mut resolved = Vec::new();

        let fragments = self.resolve_children(
            entry_path,
            entry,
            &mut visited,
            &mut chain,
            deadline,
            &mut resolved,
            diagnostics,
        )?;

        let merged_header = merge_headers(&entry.header, &fragments, diagnostics);
        let merged_body = merge_bodies(&entry.body, &fragments);

        Some(ResolvedImports {
            merged_header,
            merged_body,
            resolved,
        })
    }

    /// Resolve every entry in `document`'s `imports:` list into
    /// [`ImportFragment`]s, recursing into each fragment's own imports
    /// first so nested imports are already merged by the time they reach
    /// the parent's merge step.
    #[allow(clippy::too_many_arguments)]
    fn resolve_children(
        &self,
        document_path: &Path,
        document: &SourceDocument,
        visited: &mut HashSet<String>,
        chain: &mut Vec<String>,
        deadline: Instant,
        resolved: &mut Vec<(String, Option<String>)>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<ImportFragment>> {
        let mut fragments = Vec::new();
        for raw in extract_imports_list(&document.header) {
            let spec = match parse_import(&raw) {
                Ok(spec) => spec,
                Err(err) => {
                    diagnostics.push(Diagnostic::error("import-error", err.to_string()));
                    return None;
                }
            };
            let identity = spec.identity();

            if chain.contains(&identity) {
                let mut cycle_chain = chain.clone();
                cycle_chain.push(identity.clone());
                diagnostics.push(Diagnostic::error(
                    "import-cycle",
                    format!("import cycle detected: {}", cycle_chain.join(" -> ")),
                ));
                return None;
            }
            if visited.contains(&identity) {
                // Already resolved elsewhere in this compilation (spec
                // §4.3 step 1: "each file is entered at most once").
                continue;
            }
            if Instant::now() >= deadline {
                diagnostics.push(Diagnostic::error(
                    "import-timeout",
                    format!(
                        "import chain deadline ({:?}) exceeded before resolving '{identity}'",
                        CHAIN_DEADLINE
                    ),
                ));
                return None;
            }

            visited.insert(identity.clone());
            chain.push(identity.clone());

            let fetched = self.fetch_one(document_path, &spec, &identity, resolved, diagnostics)?;
            let (child_document, child_path) = fetched;

            let child_diags = aw_schema::validate_import(&child_document, child_path.as_deref(), self.strict);
            let fatal = child_diags.has_fatal();
            diagnostics.extend(child_diags.into_vec());
            if fatal {
                chain.pop();
                return None;
            }

            let grandchildren = self.resolve_children(
                child_path.as_deref().unwrap_or(document_path),
                &child_document,
                visited,
                chain,
                deadline,
                resolved,
                diagnostics,
            )?;

            let merged_header = merge_headers(&child_document.header, &grandchildren, diagnostics);
            let merged_body = merge_bodies(&child_document.body, &grandchildren);
            fragments.push(ImportFragment {
                identity,
                header: merged_header,
                body: merged_body,
            });

            chain.pop();
        }
        Some(fragments)
    }

    fn fetch_one(
        &self,
        importing_file: &Path,
        spec: &ImportSpec,
        identity: &str,
        resolved: &mut Vec<(String, Option<String>)>,
        diagnostics: &mut Diagnostics,
    ) -> Option<(SourceDocument, Option<PathBuf>)> {
        match spec {
            ImportSpec::Local(rel) => {
                let base = importing_file.parent().unwrap_or_else(|| Path::new("."));
                let full_path = base.join(rel);
                let content = match std::fs::read_to_string(&full_path) {
                    Ok(c) => c,
                    Err(err) => {
                        diagnostics.push(Diagnostic::error(
                            "import-unreachable",
                            format!("cannot read local import '{}': {err}", full_path.display()),
                        ));
                        return None;
                    }
                };
                let document = match aw_frontmatter::extract(&content) {
                    Ok(doc) => doc,
                    Err(err) => {
                        diagnostics.push(err.into_diagnostic(&full_path, &content));
                        return None;
                    }
                };
                resolved.push((identity.to_string(), None));
                Some((document, Some(full_path)))
            }
            ImportSpec::Remote {
                owner,
                repo,
                path,
                git_ref,
            } => {
                let fragment = match self.cache.get(owner, repo, path, git_ref.as_deref()) {
                    Some(cached) => cached,
                    None => {
                        match fetch_with_retry(self.fetcher, owner, repo, path, git_ref.as_deref()) {
                            Ok(fetched) => {
                                let _ = self.cache.put(owner, repo, path, git_ref.as_deref(), &fetched);
                                fetched
                            }
                            Err(err) => {
                                diagnostics.push(Diagnostic::error("fetch-error", err.to_string()));
                                return None;
                            }
                        }
                    }
                };
                let document = match aw_frontmatter::extract(&fragment.content) {
                    Ok(doc) => doc,
                    Err(err) => {
                        let virtual_path = PathBuf::from(format!("{owner}/{repo}/{path}"));
                        diagnostics.push(err.into_diagnostic(&virtual_path, &fragment.content));
                        return None;
                    }
                };
                resolved.push((identity.to_string(), Some(fragment.commit_sha)));
                Some((document, None))
            }
        }
    }
}

/// Read the `imports:` sequence of strings from a parsed header, if
/// present.
fn extract_imports_list(header: &Value) -> Vec<String> {
    header
        .as_mapping()
        .and_then(|m| m.get(Value::String("imports".to_string())))
        .and_then(|v| v.as_sequence())
        .map(|seq| seq.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

/// Exposed for callers that want to show the user how much of the chain
/// deadline budget remains.
pub fn chain_deadline() -> Duration {
    CHAIN_DEADLINE
}
