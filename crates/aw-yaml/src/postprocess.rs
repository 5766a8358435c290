//! Text-level fixups applied after `serde_yaml` has serialized the tree
//! (spec §4.8): `on`/`if` keys come out of the serializer quoted (so the
//! YAML 1.1 `on` → boolean ambiguity never bites a CI runner that still
//! resolves that way) and get unquoted again once the encoding is no
//! longer at risk; `key: null` collapses to a bare `key:`.

const UNQUOTE_KEYS: &[&str] = &["on", "if"];

pub fn postprocess(yaml: String) -> String {
    let mut out = String::with_capacity(yaml.len());
    for line in yaml.lines() {
        out.push_str(&unquote_known_keys(line));
        out.push('\n');
    }
    collapse_null_values(&out)
}

fn unquote_known_keys(line: &str) -> String {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    for key in UNQUOTE_KEYS {
        for quote in ['"', '\''] {
            let quoted = format!("{quote}{key}{quote}:");
            if let Some(after) = rest.strip_prefix(&quoted) {
                return format!("{indent}{key}:{after}");
            }
        }
    }
    line.to_string()
}

fn collapse_null_values(yaml: &str) -> String {
    yaml.lines()
        .map(|line| match line.strip_suffix(": null") {
            Some(prefix) => format!("{prefix}:"),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        + if yaml.ends_with('\n') { "\n" } else { "" }
}
