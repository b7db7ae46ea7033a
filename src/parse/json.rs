use serde_json::Value;
use tracing::debug;

use super::ParseError;
use super::diagnostics::format_parse_error;
use super::repair::repair;

const RAW_OUTPUT_LIMIT: usize = 500;
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parsed data plus what it took to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub data: Value,
    /// Unclosed braces or brackets remained, e.g. the model hit its token limit.
    pub truncated: bool,
    /// The text only parsed after syntax repair.
    pub repaired: bool,
}

pub fn parse_json(text: &str) -> Result<Value, ParseError> {
    parse_json_detailed(text).map(|outcome| outcome.data)
}

pub fn parse_json_detailed(text: &str) -> Result<ParseOutcome, ParseError> {
    let cleaned = text.trim_start_matches(BYTE_ORDER_MARK);
    let truncated = is_likely_truncated(cleaned);
    let outcome = |data: Value, repaired: bool| ParseOutcome {
        data,
        truncated,
        repaired,
    };

    let first_error = match serde_json::from_str::<Value>(cleaned) {
        Ok(data) => return Ok(outcome(data, false)),
        Err(err) => err,
    };

    let stripped = strip_code_fences(cleaned);
    if let Ok(data) = serde_json::from_str::<Value>(stripped) {
        debug!("parsed JSON after stripping code fences");
        return Ok(outcome(data, false));
    }

    let extracted = extract_json_substring(cleaned);
    if let Some(candidate) = extracted {
        if let Ok(data) = serde_json::from_str::<Value>(candidate) {
            debug!("parsed JSON extracted from surrounding text");
            return Ok(outcome(data, false));
        }
    }

    if let Some(data) = repair(extracted.unwrap_or(cleaned)) {
        debug!(truncated, "parsed JSON after repair");
        return Ok(outcome(data, true));
    }

    Err(ParseError::new(
        format_parse_error(&first_error, text),
        Some(text.chars().take(RAW_OUTPUT_LIMIT).collect()),
        Some(first_error),
    ))
}

/// Tracks whether a character stream is inside a JSON string literal.
#[derive(Default)]
struct StringScanner {
    in_string: bool,
    escape: bool,
}

impl StringScanner {
    /// Feeds one character. Returns true when it is structural: outside any
    /// string literal and neither a quote nor a backslash.
    fn structural(&mut self, ch: char) -> bool {
        if self.escape {
            self.escape = false;
            return false;
        }
        match ch {
            '\\' => {
                if self.in_string {
                    self.escape = true;
                }
                false
            }
            '"' => {
                self.in_string = !self.in_string;
                false
            }
            _ => !self.in_string,
        }
    }
}

fn strip_code_fences(text: &str) -> &str {
    let stripped = text.trim();
    let Some(rest) = stripped.strip_prefix("```") else {
        return stripped;
    };
    // The rest of the opening line is the language tag.
    let body = rest.split_once('\n').map_or("", |(_, body)| body).trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Returns the outermost object or array starting at the first `{` or `[`.
fn extract_json_substring(text: &str) -> Option<&str> {
    let (start, opener) = text
        .char_indices()
        .find(|&(_, ch)| ch == '{' || ch == '[')?;
    let closer = if opener == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    let mut scanner = StringScanner::default();
    for (offset, ch) in text[start..].char_indices() {
        if !scanner.structural(ch) {
            continue;
        }
        if ch == opener {
            depth += 1;
        } else if ch == closer {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + ch.len_utf8()]);
            }
        }
    }
    None
}

fn is_likely_truncated(text: &str) -> bool {
    let mut braces = 0i64;
    let mut brackets = 0i64;
    let mut scanner = StringScanner::default();
    for ch in text.chars() {
        if !scanner.structural(ch) {
            continue;
        }
        match ch {
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
    }
    braces > 0 || brackets > 0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn strips_fence_without_closing_marker() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn extracts_outermost_object_ignoring_braces_in_strings() {
        let text = r#"Result: {"a": "}", "b": {"c": [1]}} trailing {"x": 2}"#;
        assert_eq!(
            extract_json_substring(text),
            Some(r#"{"a": "}", "b": {"c": [1]}}"#)
        );
    }

    #[test]
    fn extracts_array_when_it_comes_first() {
        assert_eq!(extract_json_substring("list: [1, {\"a\": 2}] ok"), Some("[1, {\"a\": 2}]"));
    }

    #[test]
    fn extraction_handles_escaped_quotes() {
        let text = r#"x {"msg": "say \"}\""} y"#;
        assert_eq!(extract_json_substring(text), Some(r#"{"msg": "say \"}\""}"#));
    }

    #[test]
    fn extraction_gives_up_on_unbalanced_text() {
        assert_eq!(extract_json_substring("{\"a\": 1"), None);
        assert_eq!(extract_json_substring("no json here"), None);
    }

    #[test]
    fn detects_truncation() {
        assert!(is_likely_truncated("{\"a\": [1, 2"));
        assert!(!is_likely_truncated("{\"a\": \"{[\"}"));
        assert!(!is_likely_truncated(""));
    }

    #[test]
    fn detailed_reports_clean_parse() {
        let outcome = parse_json_detailed("{\"a\": 1}").unwrap();
        assert_eq!(outcome.data, json!({"a": 1}));
        assert!(!outcome.truncated);
        assert!(!outcome.repaired);
    }

    #[test]
    fn detailed_reports_truncated_repair() {
        let outcome = parse_json_detailed("{\"items\": [1, 2").unwrap();
        assert_eq!(outcome.data, json!({"items": [1, 2]}));
        assert!(outcome.truncated);
        assert!(outcome.repaired);
    }

    #[test]
    fn raw_output_is_capped() {
        let text = "x".repeat(800);
        let err = parse_json(&text).unwrap_err();
        assert_eq!(err.raw_output().map(str::len), Some(RAW_OUTPUT_LIMIT));
    }
}
