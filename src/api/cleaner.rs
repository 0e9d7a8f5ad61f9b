//! Repairs for the structural defects the registrar API is known to emit.
//!
//! Two repairs run in a single pass over the raw text before parsing:
//!
//! - whitespace just inside the quotes of a string (`"  CSE  "`) is removed;
//! - a string *value* whose trimmed content is exactly `true` or `false` is
//!   rewritten as the bare boolean literal.
//!
//! The scanner tracks string boundaries byte by byte and honours backslash
//! escapes, so embedded `\"` and escaped newlines are never touched. Object
//! keys are trimmed but never unquoted.
//!
//! Known limitation: a field whose genuine string value is `"true"` or
//! `"false"` comes out as a boolean. The API types the same fields
//! inconsistently, and callers rely on getting booleans.

/// Repair a raw response body. Idempotent, and a no-op on already clean JSON.
pub fn clean(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }

        out.push_str(&raw[copied..i]);

        let Some(close) = find_closing_quote(bytes, i + 1) else {
            // Unterminated string: leave the tail for the parser to reject
            out.push_str(&raw[i..]);
            return out;
        };

        let content = trim_content(&raw[i + 1..close]);
        if is_value_position(bytes, close + 1) && (content == "true" || content == "false") {
            out.push_str(content);
        } else {
            out.push('"');
            out.push_str(content);
            out.push('"');
        }

        i = close + 1;
        copied = i;
    }

    out.push_str(&raw[copied..]);
    out
}

/// Index of the quote closing the string whose content starts at `start`
fn find_closing_quote(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Strip ASCII whitespace adjacent to the quotes without exposing a dangling escape
fn trim_content(content: &str) -> &str {
    let start = content.len() - content.trim_start_matches(is_space).len();
    let rest = &content[start..];
    let trimmed = rest.trim_end_matches(is_space);

    let trailing_backslashes = trimmed.bytes().rev().take_while(|b| *b == b'\\').count();
    if trailing_backslashes % 2 == 1 && trimmed.len() < rest.len() {
        // `\ ` is one escape sequence; keep the escaped character
        &rest[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// A string is a key when the next significant character is `:`
fn is_value_position(bytes: &[u8], after: usize) -> bool {
    bytes[after.min(bytes.len())..]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map_or(true, |b| *b != b':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn parsed(raw: &str) -> Value {
        serde_json::from_str(&clean(raw)).unwrap()
    }

    #[test]
    fn test_trims_and_unquotes() {
        let value = parsed(r#"{"value": "  CSE  ", "flag": "true"}"#);
        assert_eq!(value, json!({"value": "CSE", "flag": true}));
    }

    #[test]
    fn test_unquotes_false_and_padded_booleans() {
        let value = parsed(r#"{"a": "false", "b": " true ", "c": ["true", "no"]}"#);
        assert_eq!(value, json!({"a": false, "b": true, "c": [true, "no"]}));
    }

    #[test]
    fn test_keys_are_never_unquoted() {
        let value = parsed(r#"{"true": "x", " false " : "y"}"#);
        assert_eq!(value, json!({"true": "x", "false": "y"}));
    }

    #[test]
    fn test_escaped_quotes_survive() {
        let raw = r#"{"title": " say \"true\" twice ", "q": "\"false\""}"#;
        let value = parsed(raw);
        assert_eq!(value["title"], json!("say \"true\" twice"));
        assert_eq!(value["q"], json!("\"false\""));
    }

    #[test]
    fn test_multiline_content_untouched() {
        let raw = r#"{"Description": "line one\nline two  \n  line three"}"#;
        assert_eq!(clean(raw), raw);
    }

    #[test]
    fn test_escaped_trailing_space_is_kept() {
        let raw = r#"["a\ "]"#;
        assert_eq!(clean(raw), raw);

        let raw = r#"["a\\  "]"#;
        assert_eq!(clean(raw), r#"["a\\"]"#);
    }

    #[test]
    fn test_clean_input_is_unchanged() {
        let raw = r#"{"Campuses":[{"CampusShortName":"SEATTLE","Open":true}],"Next":null,"TotalCount":3}"#;
        assert_eq!(clean(raw), raw);
    }

    #[test]
    fn test_non_ascii_content() {
        let raw = "{\"name\": \"  Café Müller  \", \"emoji\": \" 📚\"}";
        assert_eq!(clean(raw), "{\"name\": \"Café Müller\", \"emoji\": \"📚\"}");
    }

    #[test]
    fn test_whitespace_only_string() {
        assert_eq!(clean(r#"{"Room": "   "}"#), r#"{"Room": ""}"#);
    }

    #[test]
    fn test_unterminated_string_left_alone() {
        let raw = r#"{"a": "  open"#;
        assert_eq!(clean(raw), raw);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            r#"{"value": "  CSE  ", "flag": "true"}"#,
            r#"{"a": " \"true\" ", "b": "  false", "c": "x\\ "}"#,
            r#"["  true  ", " ", "\\", "a\ "]"#,
            r#"{"Next": {"Href": " /student/v5/public/course.json?page_start=26 "}}"#,
            r#"{"a": "  open"#,
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {}", sample);
        }
    }
}
