//! Pins one `uses:` reference against the lock file, fetching and
//! recording a new SHA only when pin updates are requested (spec §4.9:
//! "when a referenced action is not in the lock file and pin updates are
//! not requested, fail with a diagnostic that tells the user to run the
//! pinner").

use crate::error::PinError;
use crate::lockfile::{ActionsLock, PinEntry};
use crate::reference::{ActionRef, is_already_pinned, parse_action_ref};
use crate::resolver::CommitResolver;

/// Resolve `uses` to its pinned `owner/repo@<sha>` form.
///
/// - Already a 40-hex SHA: passed through unchanged.
/// - In the lock file: rewritten from the cached SHA.
/// - Missing, `allow_pin_update` true: resolved live and the lock file
///   updated in place.
/// - Missing, `allow_pin_update` false: [`PinError::PinMissing`].
pub fn pin_action(
    uses: &str,
    lock: &mut ActionsLock,
    resolver: &dyn CommitResolver,
    allow_pin_update: bool,
) -> Result<String, PinError> {
    let action_ref: ActionRef = parse_action_ref(uses)?;
    if is_already_pinned(&action_ref.version) {
        return Ok(uses.to_string());
    }

    let key = action_ref.lock_key();
    if let Some(entry) = lock.get(&key) {
        return Ok(action_ref.pinned(&entry.sha));
    }

    if !allow_pin_update {
        return Err(PinError::PinMissing(key));
    }

    let sha = resolver.resolve(&action_ref.owner, &action_ref.repo, &action_ref.version)?;
    lock.insert(
        key,
        PinEntry {
            sha: sha.clone(),
            repo: format!("{}/{}", action_ref.owner, action_ref.repo),
            version: action_ref.version.clone(),
        },
    );
    Ok(action_ref.pinned(&sha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::fake::FakeResolver;
    use std::collections::HashMap;

    fn resolver_with(sha: &str) -> FakeResolver {
        let mut shas = HashMap::new();
        shas.insert(
            ("actions".to_string(), "checkout".to_string(), "v4".to_string()),
            sha.to_string(),
        );
        FakeResolver { shas }
    }

    #[test]
    fn already_pinned_sha_passes_through() {
        let mut lock = ActionsLock::new();
        let resolver = resolver_with(&"a".repeat(40));
        let sha = "b".repeat(40);
        let uses = format!("actions/checkout@{sha}");
        let pinned = pin_action(&uses, &mut lock, &resolver, false).unwrap();
        assert_eq!(pinned, uses);
    }

    #[test]
    fn missing_pin_without_auto_pin_fails() {
        let mut lock = ActionsLock::new();
        let resolver = resolver_with(&"a".repeat(40));
        assert!(matches!(
            pin_action("actions/checkout@v4", &mut lock, &resolver, false),
            Err(PinError::PinMissing(_))
        ));
    }

    #[test]
    fn missing_pin_with_auto_pin_resolves_and_records() {
        let mut lock = ActionsLock::new();
        let sha = "a".repeat(40);
        let resolver = resolver_with(&sha);
        let pinned = pin_action("actions/checkout@v4", &mut lock, &resolver, true).unwrap();
        assert_eq!(pinned, format!("actions/checkout@{sha}"));
        assert_eq!(lock.get("actions/checkout@v4").unwrap().sha, sha);
    }

    #[test]
    fn cached_pin_is_reused_without_calling_the_resolver() {
        let mut lock = ActionsLock::new();
        let sha = "a".repeat(40);
        lock.insert(
            "actions/checkout@v4".to_string(),
            crate::lockfile::PinEntry {
                sha: sha.clone(),
                repo: "actions/checkout".to_string(),
                version: "v4".to_string(),
            },
        );
        let resolver = resolver_with(&"c".repeat(40));
        let pinned = pin_action("actions/checkout@v4", &mut lock, &resolver, false).unwrap();
        assert_eq!(pinned, format!("actions/checkout@{sha}"));
    }
}
