//! Environment resolution for the compiler's external interfaces (spec §6).
//!
//! Mirrors the teacher workspace's `csa-config::paths` convention: an
//! explicit environment variable override first, a platform cache
//! directory second, a hardcoded fallback last.

use std::path::PathBuf;

/// Environment variable names honored at compile time.
pub const WORKSPACE_ENV: &str = "GH_AW_WORKSPACE";
pub const CACHE_DIR_ENV: &str = "GH_AW_CACHE_DIR";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Resolve the workspace root: `$GH_AW_WORKSPACE`, else the current
/// directory.
pub fn workspace_root() -> PathBuf {
    std::env::var(WORKSPACE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve the remote-import / action-pin cache directory: `$GH_AW_CACHE_DIR`,
/// else `<platform cache dir>/gh-aw`, else `./.gh-aw-cache`.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(dirs) = directories::BaseDirs::new() {
        return dirs.cache_dir().join("gh-aw");
    }
    PathBuf::from(".gh-aw-cache")
}

/// Resolve the GitHub token used for remote imports and action SHA
/// resolution. `None` means anonymous/unauthenticated requests.
pub fn github_token() -> Option<String> {
    std::env::var(GITHUB_TOKEN_ENV).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_defaults_to_cwd() {
        // SAFETY: test-local env mutation; no other thread reads this var
        // concurrently in the test harness for this process.
        unsafe { std::env::remove_var(WORKSPACE_ENV) };
        assert_eq!(workspace_root(), PathBuf::from("."));
    }

    #[test]
    fn github_token_is_none_when_unset_or_empty() {
        unsafe {
            std::env::remove_var(GITHUB_TOKEN_ENV);
        }
        assert_eq!(github_token(), None);
    }
}
