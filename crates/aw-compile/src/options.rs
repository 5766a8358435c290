use std::path::PathBuf;

/// Options threading through `compile` (spec §6 "CLI surface": "flags for
/// strict mode, no-fix, and no-pin-update").
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub strict: bool,
    /// `--no-fix`: suppress auto-applying suggested schema fixes.
    pub no_fix: bool,
    /// `--no-pin-update`: fail instead of resolving+recording a missing
    /// action pin.
    pub no_pin_update: bool,
    pub cache_dir: PathBuf,
    pub lock_file_path: PathBuf,
    pub github_token: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            no_fix: false,
            no_pin_update: false,
            cache_dir: aw_core::env::cache_dir(),
            lock_file_path: PathBuf::from(".github/aw/actions-lock.json"),
            github_token: aw_core::env::github_token(),
        }
    }
}
