use serde_json::{json, Value};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

pub const INVALID_JSON: &str = "Invalid JSON response from API";

pub fn error_value(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// Interior of the first ```` ```json ```` block, up to the next fence or end of text.
pub fn fenced_json(content: &str) -> Option<&str> {
    let start = content.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &content[start..];
    let end = rest.find(FENCE_CLOSE).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Best-effort decode of a model reply.
///
/// Tries the trimmed reply as JSON, then the first ```` ```json ```` block.
/// Never fails: an unusable reply comes back as `{"error": ...}`, and callers
/// check for that key instead of handling an `Err`.
pub fn parse_response(raw: &str) -> Value {
    let content = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return value;
    }

    match fenced_json(content) {
        Some(inner) => match serde_json::from_str::<Value>(inner) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("fenced block is not valid JSON: {}", err);
                error_value(format!("Invalid JSON in fenced block: {}", err))
            }
        },
        None => {
            log::warn!("model reply is not JSON ({} chars)", content.len());
            error_value(INVALID_JSON)
        }
    }
}

/// Error message carried by a parsed reply, if any.
pub fn error_of(value: &Value) -> Option<String> {
    let err = value.as_object()?.get("error")?;
    Some(match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BARE: &str = r#"{"violations":[{"violationType":"language","severity":"high","pageNumber":3}]}"#;

    #[test]
    fn test_bare_json() {
        let value = parse_response(BARE);
        assert_eq!(value["violations"][0]["pageNumber"], 3);
        assert_eq!(error_of(&value), None);
    }

    #[test]
    fn test_fenced_matches_bare() {
        let fenced = format!("Here is the analysis:\n```json\n{}\n```\nLet me know.", BARE);
        assert_eq!(parse_response(&fenced), parse_response(BARE));
    }

    #[test]
    fn test_unterminated_fence() {
        let fenced = format!("```json\n{}\n", BARE);
        assert_eq!(parse_response(&fenced), parse_response(BARE));
    }

    #[test]
    fn test_surrounding_whitespace() {
        let padded = format!("\n\n   {}   \n", BARE);
        assert_eq!(parse_response(&padded), parse_response(BARE));
    }

    #[test]
    fn test_not_json() {
        let value = parse_response("not json");
        assert_eq!(error_of(&value).as_deref(), Some(INVALID_JSON));
    }

    #[test]
    fn test_plain_fence_is_not_searched() {
        let value = parse_response("```\n{\"a\": 1}\n```");
        assert_eq!(error_of(&value).as_deref(), Some(INVALID_JSON));
    }

    #[test]
    fn test_broken_fenced_block() {
        let value = parse_response("```json\n{\"violations\": [\n```");
        let message = error_of(&value).unwrap_or_default();
        assert!(message.starts_with("Invalid JSON in fenced block"));
    }

    #[test]
    fn test_error_key_from_model_is_a_failure() {
        let value = parse_response(r#"{"error": {"code": 42}}"#);
        assert_eq!(error_of(&value).as_deref(), Some(r#"{"code":42}"#));
    }

    #[test]
    fn test_error_of_non_object() {
        assert_eq!(error_of(&serde_json::json!([1, 2])), None);
    }
}
