use crate::error::ParseError;

/// A source document split into its parsed YAML header and Markdown body.
///
/// `header_line_offset` is the 1-indexed line number, in the *original*
/// file, of the first line of the header text — used to translate
/// `serde_yaml` error positions (relative to the header substring) back
/// into positions the caller can report against the original file.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub header: serde_yaml::Value,
    pub header_text: String,
    pub header_line_offset: usize,
    pub body: String,
}

/// Split `source` on its leading `---` / `---` frontmatter fences and parse
/// the header as YAML (spec §4.1).
///
/// Per spec, this is *not* full YAML 1.1: scalar resolution follows
/// `serde_yaml`'s core-schema behavior, where only the literal tokens
/// `true`/`false` (and their capitalizations) resolve to booleans — `on`,
/// `off`, `yes`, and `no` stay strings. This is relied upon, not
/// special-cased.
pub fn extract(source: &str) -> Result<SourceDocument, ParseError> {
    if !source.starts_with("---") {
        return Err(ParseError::MissingOpeningFence);
    }
    let after_fence = &source[3..];
    let after_open_line = after_fence
        .strip_prefix("\r\n")
        .or_else(|| after_fence.strip_prefix('\n'))
        .ok_or(ParseError::MissingOpeningFence)?;

    let (header_text, body) =
        split_closing_fence(after_open_line).ok_or(ParseError::UnterminatedHeader)?;

    let header: serde_yaml::Value =
        serde_yaml::from_str(header_text).map_err(|e| yaml_error(&e))?;

    Ok(SourceDocument {
        header,
        header_text: header_text.to_string(),
        header_line_offset: 2,
        body: body.to_string(),
    })
}

/// Find a line consisting of exactly `---` and split the text there,
/// returning `(header, body)` with the fence line itself excluded from
/// both halves.
fn split_closing_fence(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" {
            let header = &text[..offset];
            let body_start = offset + line.len();
            return Some((header, &text[body_start..]));
        }
        offset += line.len();
    }
    None
}

fn yaml_error(err: &serde_yaml::Error) -> ParseError {
    match err.location() {
        Some(loc) => ParseError::Yaml {
            message: err.to_string(),
            // +1: header_line_offset (2) minus the 1-indexed line serde_yaml
            // already reports, i.e. line 1 in the header is line 2 overall.
            line: loc.line() + 1,
            column: loc.column(),
        },
        None => ParseError::Yaml {
            message: err.to_string(),
            line: 2,
            column: 1,
        },
    }
}
