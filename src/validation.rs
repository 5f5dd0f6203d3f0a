//! Form sanitization and ordered field validation.
//!
//! Forms derive `validator::Validate` for presence and length rules; the
//! remaining rules (character classes, dates, references) are checked by the
//! form itself. Both sets of failures are merged here and reported in the
//! form's declared field order, so a re-rendered form lists errors top to
//! bottom.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Merge derive-based and hand-checked failures, ordered by `fields`.
///
/// Within a field, derive-based failures come first. Failures on a field
/// that is not listed are appended last.
pub fn ordered_errors(
    fields: &[&str],
    derived: Result<(), ValidationErrors>,
    extra: Vec<FieldError>,
) -> Vec<FieldError> {
    let derived = derived.err();
    let by_field = derived.as_ref().map(|errors| errors.field_errors());

    let mut ordered = Vec::new();
    for field in fields {
        if let Some(list) = by_field.as_ref().and_then(|map| map.get(*field)) {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                ordered.push(FieldError::new(field, message));
            }
        }
        ordered.extend(extra.iter().filter(|e| e.field == *field).cloned());
    }
    ordered.extend(
        extra
            .into_iter()
            .filter(|e| !fields.contains(&e.field.as_str())),
    );
    ordered
}

/// Trim surrounding whitespace in place
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// HTML-escape a value in place
pub fn escape(value: &mut String) {
    if value.chars().any(needs_escape) {
        *value = escape_html(value);
    }
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'' | '/' | '\\' | '`')
}

/// Replace HTML-significant characters with their entities
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

/// ASCII letters and digits only; the empty string is not alphanumeric
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Parse an ISO-8601 calendar date or date-time, keeping the date part
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Optional date field: empty means absent, anything else must parse
pub fn optional_date(
    value: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    let parsed = parse_iso_date(value);
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

/// Reference field: empty is left to the presence rule, anything else must be an id
pub fn reference(
    value: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Uuid> {
    if value.is_empty() {
        return None;
    }
    let parsed = Uuid::parse_str(value).ok();
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "A must be specified"))]
        a: String,
        #[validate(length(min = 1, message = "B must be specified"))]
        b: String,
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_trim_then_escape() {
        let mut value = "  <b>Bold</b>  ".to_string();
        trim(&mut value);
        escape(&mut value);
        assert_eq!(value, "&lt;b&gt;Bold&lt;&#x2F;b&gt;");
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(is_alphanumeric("Tolkien"));
        assert!(is_alphanumeric("R2D2"));
        assert!(!is_alphanumeric(""));
        assert!(!is_alphanumeric("J.R.R."));
        assert!(!is_alphanumeric("Anne Marie"));
        assert!(!is_alphanumeric("Émile"));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("1892-01-03"), NaiveDate::from_ymd_opt(1892, 1, 3));
        assert_eq!(
            parse_iso_date("2020-06-01T10:00:00Z"),
            NaiveDate::from_ymd_opt(2020, 6, 1)
        );
        assert_eq!(parse_iso_date("03/01/1892"), None);
        assert_eq!(parse_iso_date("1892-13-01"), None);
    }

    #[test]
    fn test_ordered_errors_follow_field_order() {
        let sample = Sample {
            a: String::new(),
            b: String::new(),
        };
        let extra = vec![
            FieldError::new("b", "B is odd"),
            FieldError::new("z", "Unlisted"),
            FieldError::new("a", "A is odd"),
        ];
        let errors = ordered_errors(&["a", "b"], sample.validate(), extra);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["A must be specified", "A is odd", "B must be specified", "B is odd", "Unlisted"]
        );
    }

    #[test]
    fn test_ordered_errors_empty_when_valid() {
        let sample = Sample {
            a: "x".into(),
            b: "y".into(),
        };
        assert!(ordered_errors(&["a", "b"], sample.validate(), vec![]).is_empty());
    }

    #[test]
    fn test_optional_date_and_reference() {
        let mut errors = Vec::new();
        assert_eq!(optional_date("", "d", "Invalid date", &mut errors), None);
        assert!(errors.is_empty());
        assert_eq!(optional_date("nope", "d", "Invalid date", &mut errors), None);
        assert_eq!(errors, vec![FieldError::new("d", "Invalid date")]);

        errors.clear();
        let id = Uuid::new_v4();
        assert_eq!(reference(&id.to_string(), "r", "Bad", &mut errors), Some(id));
        assert_eq!(reference("42", "r", "Bad", &mut errors), None);
        assert_eq!(errors.len(), 1);
    }
}
