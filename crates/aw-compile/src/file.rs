//! File-system orchestration around [`compile`] (SPEC_FULL.md §A.1):
//! reading the source, writing the `.lock.yml` and action-pin lock file.
//! IO failures here are genuinely exceptional, so this layer uses
//! `anyhow` rather than threading another error enum through the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use aw_core::diag::Diagnostics;

use crate::options::CompileOptions;
use crate::pipeline::compile;

/// Compile `source_path` on disk and write the resulting `.lock.yml`
/// next to it (`<name>.md` -> `<name>.lock.yml`), plus the updated
/// action-pin lock file. Returns the diagnostics regardless of outcome;
/// callers render them and decide the process exit code.
pub fn compile_file(source_path: &Path, options: &CompileOptions) -> Result<Diagnostics> {
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("reading workflow source {}", source_path.display()))?;

    let (compiled, diagnostics) = compile(&source, source_path, options);

    if let Some(compiled) = compiled {
        let lock_path = lock_file_path_for(source_path);
        std::fs::write(&lock_path, &compiled.yaml).with_context(|| format!("writing {}", lock_path.display()))?;
        compiled
            .actions_lock
            .save(&options.lock_file_path)
            .with_context(|| format!("writing {}", options.lock_file_path.display()))?;
    }

    Ok(diagnostics)
}

fn lock_file_path_for(source_path: &Path) -> std::path::PathBuf {
    let stem = source_path.file_stem().and_then(|s| s.to_str()).unwrap_or("workflow");
    source_path.with_file_name(format!("{stem}.lock.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_file_path_replaces_extension() {
        let path = Path::new(".github/workflows/nightly.md");
        assert_eq!(lock_file_path_for(path), Path::new(".github/workflows/nightly.lock.yml"));
    }
}
