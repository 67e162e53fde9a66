//! Structured reply parsing.

use serde::de::DeserializeOwned;

use crate::error::InferenceError;

/// Strip a surrounding markdown code fence (optionally tagged `json`).
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let body = match rest.rfind("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}

/// Parse a model reply into `T`, rejecting anything that does not match the
/// expected shape exactly.
pub fn parse_structured<T: DeserializeOwned>(reply: &str) -> Result<T, InferenceError> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Err(InferenceError::InvalidResponse("empty reply".to_string()));
    }
    serde_json::from_str(body).map_err(|e| InferenceError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Target {
        target: String,
    }

    #[test]
    fn test_strip_plain_reply() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fence() {
        let reply = "```json\n{\"target\": \"#q\"}\n```";
        assert_eq!(strip_code_fence(reply), "{\"target\": \"#q\"}");
    }

    #[test]
    fn test_strip_unterminated_fence() {
        let reply = "```\n[1, 2]";
        assert_eq!(strip_code_fence(reply), "[1, 2]");
    }

    #[test]
    fn test_parse_structured_ok() {
        let parsed: Target = parse_structured("```json\n{\"target\": \"#q\"}\n```").unwrap();
        assert_eq!(parsed.target, "#q");
    }

    #[test]
    fn test_parse_structured_rejects_prose() {
        let result: Result<Target, _> = parse_structured("I think the search box is #q");
        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_structured_rejects_wrong_shape() {
        let result: Result<Target, _> = parse_structured("{\"selector\": \"#q\"}");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_structured_rejects_empty() {
        let result: Result<Target, _> = parse_structured("   ");
        assert!(result.is_err());
    }
}
