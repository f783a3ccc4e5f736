//! Best-effort structured extraction from untrusted model replies.
//!
//! Model output is free text that is *asked* to contain a JSON object. The
//! first balanced `{...}` span is parsed; if that fails the raw reply becomes
//! the summary and every other field takes its default.

use chrono::NaiveDate;
use eagle_core::models::{parse_date_lenient, ChangeTarget, DateBound};
use serde_json::{Map, Value};

/// Outcome of interpreting one analysis reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub summary: String,
    pub target: ChangeTarget,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// False when no JSON object could be recovered
    pub structured: bool,
}

/// Return the first balanced `{...}` span of `text`, parsed as a JSON object
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let span = first_object_span(text)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Interpret an analysis reply, falling back to the raw text as summary
pub fn parse_analysis_reply(reply: &str) -> ParsedReply {
    let Some(object) = extract_json_object(reply) else {
        return ParsedReply {
            summary: reply.trim().to_string(),
            target: ChangeTarget::LandUse,
            start_date: None,
            end_date: None,
            structured: false,
        };
    };

    let summary = object
        .get("summary")
        .and_then(summary_text)
        .unwrap_or_else(|| reply.trim().to_string());

    let target = object
        .get("target")
        .and_then(Value::as_str)
        .map(ChangeTarget::from_loose)
        .unwrap_or_default();

    ParsedReply {
        summary,
        target,
        start_date: object.get("startDate").and_then(|v| date_value(v, DateBound::Start)),
        end_date: object.get("endDate").and_then(|v| date_value(v, DateBound::End)),
        structured: true,
    }
}

fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// A summary may arrive as a string or as a list of bullet strings
fn summary_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn date_value(value: &Value, bound: DateBound) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_lenient(s, bound),
        Value::Number(n) => parse_date_lenient(&n.to_string(), bound),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_prose() {
        let reply = r#"Here is the analysis:
{"summary": "Forest cover dropped", "target": "deforestation"}
Let me know if you need more."#;
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object["summary"], "Forest cover dropped");
    }

    #[test]
    fn test_extract_from_code_fence() {
        let reply = "```json\n{\"summary\": \"ok\", \"nested\": {\"a\": 1}}\n```";
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object["nested"]["a"], 1);
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let reply =
            r#"{"summary": "values like {x} and \"quoted }\"", "target": "urban"} trailing }"#;
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object["target"], "urban");
    }

    #[test]
    fn test_extract_only_first_object() {
        let reply = r#"{"summary": "first"} {"summary": "second"}"#;
        assert_eq!(extract_json_object(reply).unwrap()["summary"], "first");
    }

    #[test]
    fn test_extract_unbalanced_is_none() {
        assert!(extract_json_object(r#"{"summary": "cut off"#).is_none());
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("{not: valid json}").is_none());
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"{"summary": ["- Canopy loss of 12%", "- Mostly near roads"],
            "target": "Deforestation", "startDate": "2019", "endDate": "2023-06-30"}"#;
        let parsed = parse_analysis_reply(reply);

        assert!(parsed.structured);
        assert_eq!(parsed.summary, "- Canopy loss of 12%\n- Mostly near roads");
        assert_eq!(parsed.target, ChangeTarget::Deforestation);
        assert_eq!(parsed.start_date, NaiveDate::from_ymd_opt(2019, 1, 1));
        assert_eq!(parsed.end_date, NaiveDate::from_ymd_opt(2023, 6, 30));
    }

    #[test]
    fn test_parse_numeric_year() {
        let parsed =
            parse_analysis_reply(r#"{"summary": "s", "startDate": 2020, "endDate": null}"#);
        assert_eq!(parsed.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(parsed.end_date, None);
    }

    #[test]
    fn test_parse_without_json_uses_raw_text() {
        let reply = "  Vegetation looks stable around the city.  ";
        let parsed = parse_analysis_reply(reply);

        assert!(!parsed.structured);
        assert_eq!(parsed.summary, "Vegetation looks stable around the city.");
        assert_eq!(parsed.target, ChangeTarget::LandUse);
        assert_eq!(parsed.start_date, None);
        assert_eq!(parsed.end_date, None);
    }

    #[test]
    fn test_parse_json_without_summary_keeps_raw_reply() {
        let reply = r#"Analysis done. {"target": "urban"}"#;
        let parsed = parse_analysis_reply(reply);

        assert!(parsed.structured);
        assert_eq!(parsed.summary, reply);
        assert_eq!(parsed.target, ChangeTarget::Urban);
    }
}
