//! JSON utilities for simulator UI metadata
//!
//! The `ui_car.json` / `ui_track.json` files shipped with cars and tracks are
//! frequently hand-edited and not strictly valid JSON:
//! - A UTF-8 byte order mark before the opening brace
//! - Raw newlines and tabs inside string values (usually descriptions)
//! - Stray control characters and invalid UTF-8 sequences
//!
//! This module cleans those up before handing the text to `serde_json`.

use crate::{PitboxError, Result};
use serde_json::Value;
use std::path::Path;

/// Preprocess UI metadata JSON to fix known issues
///
/// - Drops a leading byte order mark
/// - Escapes raw `\n`, `\r` and `\t` inside strings
/// - Removes every other control character
///
/// Returns the cleaned JSON text ready for parsing.
pub fn preprocess_ui_json(json: &str) -> Result<String> {
    let json = json.strip_prefix('\u{FEFF}').unwrap_or(json);
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in json.chars() {
        if !in_string {
            match ch {
                '"' => in_string = true,
                '\n' | '\r' | '\t' => {}
                _ if ch.is_control() => continue,
                _ => {}
            }
            result.push(ch);
            continue;
        }

        if escaped {
            escaped = false;
            // An escape followed by a raw control char is dropped entirely
            if !ch.is_control() {
                result.push('\\');
                result.push(ch);
            }
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '"' => {
                in_string = false;
                result.push(ch);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ if ch.is_control() => {}
            _ => result.push(ch),
        }
    }

    if result.trim().is_empty() {
        return Err(PitboxError::Parse {
            context: "UI JSON preprocessing".to_string(),
            details: "JSON is empty after preprocessing".to_string(),
        });
    }

    Ok(result)
}

/// Decode raw file bytes (lossy UTF-8), clean them and parse.
pub fn parse_ui_json(bytes: &[u8]) -> Result<Value> {
    let text = String::from_utf8_lossy(bytes);
    let cleaned = preprocess_ui_json(&text)?;
    serde_json::from_str(&cleaned).map_err(|e| PitboxError::Parse {
        context: "UI JSON".to_string(),
        details: e.to_string(),
    })
}

/// Read and parse a metadata file.
pub fn read_ui_json(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).map_err(|e| PitboxError::file_error(path.to_path_buf(), e))?;
    parse_ui_json(&bytes).map_err(|e| match e {
        PitboxError::Parse { details, .. } => {
            PitboxError::parse_error(path.display().to_string(), details)
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bom_is_dropped() {
        let value = parse_ui_json("\u{FEFF}{\"name\": \"AE86\"}".as_bytes()).unwrap();
        assert_eq!(value["name"], "AE86");
    }

    #[test]
    fn raw_newlines_in_strings_are_escaped() {
        let raw = "{\"description\": \"Line one\nLine\ttwo\"}";
        let value = parse_ui_json(raw.as_bytes()).unwrap();
        assert_eq!(value["description"], "Line one\nLine\ttwo");
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let raw = "{\"name\": \"The \\\"Ring\\\"\n\", \"length\": \"20.8 km\"}";
        let value = parse_ui_json(raw.as_bytes()).unwrap();
        assert_eq!(value["name"], "The \"Ring\"\n");
        assert_eq!(value["length"], "20.8 km");
    }

    #[test]
    fn escaped_backslash_before_quote_closes_string() {
        let raw = r#"{"path": "C:\\", "name": "x"}"#;
        let value = parse_ui_json(raw.as_bytes()).unwrap();
        assert_eq!(value["path"], "C:\\");
        assert_eq!(value["name"], "x");
    }

    #[test]
    fn control_characters_are_removed() {
        let raw = "{\"name\":\x01 \"Mazda\x02 RX-7\"}\x00";
        let value = parse_ui_json(raw.as_bytes()).unwrap();
        assert_eq!(value["name"], "Mazda RX-7");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut raw = b"{\"brand\": \"Citro".to_vec();
        raw.push(0xEB);
        raw.extend_from_slice(b"n\"}");
        let value = parse_ui_json(&raw).unwrap();
        assert_eq!(value["brand"], "Citro\u{FFFD}n");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(preprocess_ui_json("\u{FEFF}\x00\x01").is_err());
        assert!(parse_ui_json(b"").is_err());
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        let err = parse_ui_json(b"{\"name\": \"Akina").unwrap_err();
        assert!(matches!(err, PitboxError::Parse { .. }));
    }

    proptest! {
        #[test]
        fn cleaned_output_has_no_raw_control_chars(input in ".*") {
            if let Ok(cleaned) = preprocess_ui_json(&input) {
                let bad = cleaned
                    .chars()
                    .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'));
                prop_assert!(!bad);
            }
        }

        #[test]
        fn any_string_value_survives(text in "[^\\\\\"]{0,40}") {
            let raw = format!("{{\"description\": \"{text}\"}}");
            let value = parse_ui_json(raw.as_bytes()).unwrap();
            let expected: String = text
                .chars()
                .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
                .collect();
            prop_assert_eq!(value["description"].as_str().unwrap(), expected.as_str());
        }
    }
}
