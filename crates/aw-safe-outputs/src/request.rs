//! A single safe-output request line as the agent writes it to
//! `GH_AW_SAFE_OUTPUTS` (spec §4.7: "Each line is `{type: <snake_case_kind>,
//! ...fields}`").

use aw_model::SafeOutputKind;
use serde_json::Value;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("missing 'type' field")]
    MissingType,
    #[error("unknown safe-output kind '{0}'")]
    UnknownKind(String),
}

/// One parsed (not yet validated) request line.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeOutputRequest {
    pub kind: SafeOutputKind,
    pub fields: Value,
}

/// Parse one JSON-Lines request (spec §4.7 validation contract step 1:
/// "JSON well-formed and matches a known kind").
pub fn parse_line(line: &str) -> Result<SafeOutputRequest, RequestError> {
    let value: Value = serde_json::from_str(line).map_err(|e| RequestError::Json(e.to_string()))?;
    let kind_str = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(RequestError::MissingType)?;
    let kind = SafeOutputKind::from_wire_type(kind_str).ok_or_else(|| RequestError::UnknownKind(kind_str.to_string()))?;
    Ok(SafeOutputRequest { kind, fields: value })
}

/// Parse every line of a `GH_AW_SAFE_OUTPUTS` file. Lines that fail to
/// parse are reported alongside the successfully parsed requests rather
/// than aborting the whole file (spec §4.7: "other requests continue").
pub fn parse_all(content: &str) -> (Vec<SafeOutputRequest>, Vec<(usize, RequestError)>) {
    let mut requests = Vec::new();
    let mut errors = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(req) => requests.push(req),
            Err(err) => errors.push((idx + 1, err)),
        }
    }
    (requests, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_valid_line() {
        let req = parse_line(r#"{"type":"create_issue","title":"t","body":"b"}"#).unwrap();
        assert_eq!(req.kind, SafeOutputKind::CreateIssue);
    }

    #[test]
    fn unknown_kind_errors() {
        assert!(matches!(parse_line(r#"{"type":"nonsense"}"#), Err(RequestError::UnknownKind(_))));
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(parse_line("not json"), Err(RequestError::Json(_))));
    }

    #[test]
    fn parse_all_continues_past_bad_lines() {
        let content = "{\"type\":\"create_issue\",\"title\":\"t\",\"body\":\"b\"}\nnot json\n";
        let (requests, errors) = parse_all(content);
        assert_eq!(requests.len(), 1);
        assert_eq!(errors.len(), 1);
    }
}
