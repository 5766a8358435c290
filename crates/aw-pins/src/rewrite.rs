//! Rewrites every `uses:` line in an emitted lock file to its pinned
//! form (spec §4.9: "the compiler never emits a tag reference in the
//! output").

use crate::error::PinError;
use crate::lockfile::ActionsLock;
use crate::pin::pin_action;
use crate::resolver::CommitResolver;

/// Scan `yaml` line by line, pinning every `uses: <ref>` value found.
/// Preserves indentation and any inline comment; fails fast on the first
/// unpinnable reference.
pub fn pin_yaml_uses(
    yaml: &str,
    lock: &mut ActionsLock,
    resolver: &dyn CommitResolver,
    allow_pin_update: bool,
) -> Result<String, PinError> {
    let mut out = String::with_capacity(yaml.len());
    for line in yaml.lines() {
        out.push_str(&pin_line(line, lock, resolver, allow_pin_update)?);
        out.push('\n');
    }
    if !yaml.ends_with('\n') && out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

fn pin_line(line: &str, lock: &mut ActionsLock, resolver: &dyn CommitResolver, allow_pin_update: bool) -> Result<String, PinError> {
    let trimmed = line.trim_start();
    let indent_len = line.len() - trimmed.len();
    let Some(rest) = trimmed.strip_prefix("uses:") else {
        return Ok(line.to_string());
    };
    let value = rest.trim();
    let unquoted = value.trim_matches('"').trim_matches('\'');
    if unquoted.is_empty() || !unquoted.contains('@') {
        return Ok(line.to_string());
    }
    let pinned = pin_action(unquoted, lock, resolver, allow_pin_update)?;
    Ok(format!("{}uses: {pinned}", &line[..indent_len]))
}
