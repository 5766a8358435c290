//! Classifying and parsing `imports:` entries (spec §4.3).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportSpecError {
    #[error("cannot parse remote import '{0}': expected owner/repo/path[@ref]")]
    MalformedRemote(String),
}

/// A single classified `imports:` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpec {
    /// `./foo.md` or `shared/foo.md` — resolved relative to the importing
    /// file.
    Local(PathBuf),
    /// `owner/repo/path[@ref]` — fetched through the injected remote
    /// fetcher.
    Remote {
        owner: String,
        repo: String,
        path: String,
        git_ref: Option<String>,
    },
}

impl ImportSpec {
    /// A stable string identity used for cycle detection and diagnostics
    /// (not necessarily a filesystem path for remote specs).
    pub fn identity(&self) -> String {
        match self {
            ImportSpec::Local(path) => path.display().to_string(),
            ImportSpec::Remote {
                owner,
                repo,
                path,
                git_ref,
            } => match git_ref {
                Some(r) => format!("{owner}/{repo}/{path}@{r}"),
                None => format!("{owner}/{repo}/{path}"),
            },
        }
    }
}

/// Classify and parse one raw `imports:` entry (spec §4.3 classification
/// rule: starts with `.` or `shared/` → local; otherwise
/// `owner/repo/path[@ref]` → remote).
pub fn parse_import(raw: &str) -> Result<ImportSpec, ImportSpecError> {
    if raw.starts_with('.') || raw.starts_with("shared/") {
        return Ok(ImportSpec::Local(PathBuf::from(raw)));
    }

    let (spec, git_ref) = match raw.rsplit_once('@') {
        Some((s, r)) => (s, Some(r.to_string())),
        None => (raw, None),
    };

    let mut parts = spec.splitn(3, '/');
    let (Some(owner), Some(repo), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ImportSpecError::MalformedRemote(raw.to_string()));
    };
    if owner.is_empty() || repo.is_empty() || path.is_empty() {
        return Err(ImportSpecError::MalformedRemote(raw.to_string()));
    }

    Ok(ImportSpec::Remote {
        owner: owner.to_string(),
        repo: repo.to_string(),
        path: path.to_string(),
        git_ref,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_slash_is_local() {
        assert_eq!(
            parse_import("./shared/setup.md").unwrap(),
            ImportSpec::Local(PathBuf::from("./shared/setup.md"))
        );
    }

    #[test]
    fn shared_prefix_is_local() {
        assert_eq!(
            parse_import("shared/setup.md").unwrap(),
            ImportSpec::Local(PathBuf::from("shared/setup.md"))
        );
    }

    #[test]
    fn owner_repo_path_is_remote() {
        let spec = parse_import("acme/workflows/shared/setup.md@v2").unwrap();
        assert_eq!(
            spec,
            ImportSpec::Remote {
                owner: "acme".to_string(),
                repo: "workflows".to_string(),
                path: "shared/setup.md".to_string(),
                git_ref: Some("v2".to_string()),
            }
        );
    }

    #[test]
    fn remote_without_ref() {
        let spec = parse_import("acme/workflows/shared/setup.md").unwrap();
        assert!(matches!(spec, ImportSpec::Remote { git_ref: None, .. }));
    }

    #[test]
    fn malformed_remote_errors() {
        assert!(parse_import("acme").is_err());
    }
}
