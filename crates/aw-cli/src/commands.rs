use std::path::{Path, PathBuf};

use anyhow::Result;
use aw_compile::{CompileOptions, compile, compile_file};
use aw_core::diag::Diagnostics;

use crate::render::render;

fn base_options(strict: bool, no_fix: bool, no_pin_update: bool) -> CompileOptions {
    CompileOptions {
        strict,
        no_fix,
        no_pin_update,
        ..CompileOptions::default()
    }
}

/// `aw compile`: writes `<name>.lock.yml` and the action-pin lock file
/// for every source. Returns `true` if every source compiled cleanly.
pub fn run_compile(sources: &[PathBuf], strict: bool, no_fix: bool, no_pin_update: bool, as_json: bool) -> Result<bool> {
    let options = base_options(strict, no_fix, no_pin_update);
    let mut all_clean = true;
    for source in sources {
        let diagnostics = compile_file(source, &options)?;
        if !diagnostics.is_empty() {
            eprintln!("{}", render(&diagnostics, as_json));
        }
        if diagnostics.has_fatal() {
            all_clean = false;
        }
    }
    Ok(all_clean)
}

/// `aw lint`: validates without writing any files.
pub fn run_lint(sources: &[PathBuf], strict: bool, as_json: bool) -> Result<bool> {
    let options = base_options(strict, false, true);
    let mut all_clean = true;
    for source in sources {
        let diagnostics = lint_one(source, &options)?;
        if !diagnostics.is_empty() {
            eprintln!("{}", render(&diagnostics, as_json));
        }
        if diagnostics.has_fatal() {
            all_clean = false;
        }
    }
    Ok(all_clean)
}

fn lint_one(source_path: &Path, options: &CompileOptions) -> Result<Diagnostics> {
    let source = std::fs::read_to_string(source_path)?;
    let (_, diagnostics) = compile(&source, source_path, options);
    Ok(diagnostics)
}

/// `aw pin-update`: forces pin resolution regardless of the global
/// `--no-pin-update` default, recording every resolved SHA.
pub fn run_pin_update(sources: &[PathBuf], strict: bool, as_json: bool) -> Result<bool> {
    let options = base_options(strict, false, false);
    let mut all_clean = true;
    for source in sources {
        let diagnostics = compile_file(source, &options)?;
        if !diagnostics.is_empty() {
            eprintln!("{}", render(&diagnostics, as_json));
        }
        if diagnostics.has_fatal() {
            all_clean = false;
        }
    }
    Ok(all_clean)
}
