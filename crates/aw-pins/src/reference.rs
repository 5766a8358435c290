//! Parses a `uses:` reference (spec §4.9, component C9): `owner/repo@ref`
//! or `owner/repo/path@ref`.

use crate::error::PinError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    pub owner: String,
    pub repo: String,
    pub path: Option<String>,
    pub version: String,
}

impl ActionRef {
    /// The lock file key: `"{owner/repo}@{ref}"` (spec §6, persisted
    /// state: "mapping `\"{owner/repo}@{ref}\"` → { sha, repo, version }").
    pub fn lock_key(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repo, self.version)
    }

    /// The rewritten `uses:` string once pinned (spec §4.9: "rewritten to
    /// `owner/repo@<40-hex-sha>`").
    pub fn pinned(&self, sha: &str) -> String {
        match &self.path {
            Some(path) => format!("{}/{}/{}@{}", self.owner, self.repo, path, sha),
            None => format!("{}/{}@{}", self.owner, self.repo, sha),
        }
    }
}

/// A 40-hex commit SHA already pinned; such references are left alone.
pub fn is_already_pinned(version: &str) -> bool {
    version.len() == 40 && version.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn parse_action_ref(uses: &str) -> Result<ActionRef, PinError> {
    let (repo_part, version) = uses
        .rsplit_once('@')
        .ok_or_else(|| PinError::InvalidReference(uses.to_string()))?;
    if version.is_empty() {
        return Err(PinError::InvalidReference(uses.to_string()));
    }

    let mut segments = repo_part.splitn(3, '/');
    let owner = segments.next().filter(|s| !s.is_empty());
    let repo = segments.next().filter(|s| !s.is_empty());
    let (owner, repo) = match (owner, repo) {
        (Some(o), Some(r)) => (o, r),
        _ => return Err(PinError::InvalidReference(uses.to_string())),
    };
    let path = segments.next().map(str::to_string);

    Ok(ActionRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        path,
        version: version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_owner_repo_ref() {
        let r = parse_action_ref("actions/checkout@v4").unwrap();
        assert_eq!(r.owner, "actions");
        assert_eq!(r.repo, "checkout");
        assert_eq!(r.path, None);
        assert_eq!(r.version, "v4");
        assert_eq!(r.lock_key(), "actions/checkout@v4");
    }

    #[test]
    fn parses_ref_with_subpath() {
        let r = parse_action_ref("actions/aws/ec2@main").unwrap();
        assert_eq!(r.path.as_deref(), Some("ec2"));
        assert_eq!(r.pinned("a".repeat(40).as_str()), format!("actions/aws/ec2@{}", "a".repeat(40)));
    }

    #[test]
    fn missing_at_sign_is_invalid() {
        assert!(parse_action_ref("actions/checkout").is_err());
    }

    #[test]
    fn already_pinned_sha_is_recognized() {
        assert!(is_already_pinned(&"f".repeat(40)));
        assert!(!is_already_pinned("v4"));
    }
}
