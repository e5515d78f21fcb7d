//! Field-level form validation used by the editor binders.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use validator::{ValidateLength, ValidationError};

use crate::shared::constants::{NAME_MAX_LENGTH, NAME_MIN_LENGTH, NAME_TOO_LONG};

/// Raw form input keyed by field name, as typed by the user.
pub type FormValues = BTreeMap<String, String>;

/// Per-field error text. Only the first failing validator of a field is kept,
/// so the user sees one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }

    /// Record the outcome of a validator for `field`.
    pub fn check(&mut self, field: &str, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.add(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.add(&field, message);
            }
        }
        fields
    }
}

/// Read a text field with surrounding whitespace removed. Missing fields read
/// as the empty string.
pub fn trimmed(values: &FormValues, field: &str) -> String {
    values
        .get(field)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Parse a numeric field. Blank input is `Ok(None)`; garbage is an error
/// carrying `message`.
pub fn parse_number<T: FromStr>(
    values: &FormValues,
    field: &str,
    message: &str,
) -> Result<Option<T>, String> {
    let raw = trimmed(values, field);
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>().map(Some).map_err(|_| message.to_string())
}

/// Length bounds on printable characters (control characters do not count).
#[derive(Debug, Clone)]
pub struct StringLength {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub message: &'static str,
}

impl StringLength {
    pub fn at_least(min: u64, message: &'static str) -> Self {
        Self {
            min: Some(min),
            max: None,
            message,
        }
    }

    pub fn at_most(max: u64, message: &'static str) -> Self {
        Self {
            min: None,
            max: Some(max),
            message,
        }
    }

    pub fn check(&self, value: &str) -> Result<(), String> {
        let printable: String = value.chars().filter(|c| !c.is_control()).collect();
        if printable.validate_length(self.min, self.max, None) {
            Ok(())
        } else {
            Err(self.message.to_string())
        }
    }
}

/// The length rule every category and beverage name follows, in the dialog
/// and in the JSON API alike. `too_short` names the entity.
pub fn check_name(value: &str, too_short: &'static str) -> Result<(), String> {
    StringLength::at_least(NAME_MIN_LENGTH, too_short).check(value)?;
    StringLength::at_most(NAME_MAX_LENGTH, NAME_TOO_LONG).check(value)
}

/// Adapt a form rule outcome for `#[validate(custom(...))]`.
pub fn into_validation_error(outcome: Result<(), String>) -> Result<(), ValidationError> {
    outcome.map_err(|message| ValidationError::new("length").with_message(message.into()))
}

/// Inclusive numeric range.
#[derive(Debug, Clone)]
pub struct NumberRange<T> {
    pub min: T,
    pub max: T,
    pub message: &'static str,
}

impl<T: PartialOrd + Copy> NumberRange<T> {
    pub fn check(&self, value: T) -> Result<(), String> {
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(self.message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_string_length_counts_trimmed_printable_chars() {
        let rule = StringLength::at_least(3, "too short");
        assert!(rule.check("Ale").is_ok());
        assert_eq!(rule.check("Al"), Err("too short".to_string()));
        assert!(rule.check("A\u{7}l").is_err());
        assert!(rule.check("Öl!").is_ok());
    }

    #[test]
    fn test_name_rule_bounds_both_ends() {
        assert!(check_name("Ale", "too short").is_ok());
        assert_eq!(check_name("A\u{7}l", "too short"), Err("too short".to_string()));
        assert!(check_name(&"x".repeat(255), "too short").is_ok());
        assert_eq!(
            check_name(&"x".repeat(256), "too short"),
            Err(NAME_TOO_LONG.to_string())
        );

        let error = into_validation_error(check_name("Al", "too short")).unwrap_err();
        assert_eq!(error.message.as_deref(), Some("too short"));
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::default();
        errors.add("name", "first");
        errors.add("name", "second");
        errors.check("score", Err("bad score".to_string()));
        errors.check("count", Ok(()));

        assert_eq!(errors.get("name"), Some("first"));
        assert!(errors.has("score"));
        assert!(!errors.has("count"));
        assert_eq!(errors.to_string(), "name: first; score: bad score");
    }

    #[test]
    fn test_parse_number() {
        let values = form(&[("count", " 12 "), ("score", "x"), ("blank", "  ")]);
        assert_eq!(parse_number::<i32>(&values, "count", "bad"), Ok(Some(12)));
        assert_eq!(
            parse_number::<i32>(&values, "score", "bad"),
            Err("bad".to_string())
        );
        assert_eq!(parse_number::<i32>(&values, "blank", "bad"), Ok(None));
        assert_eq!(parse_number::<i32>(&values, "missing", "bad"), Ok(None));
    }

    #[derive(validator::Validate)]
    struct Named {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn test_validator_errors_keep_their_messages() {
        use validator::Validate;

        let errors = Named {
            name: "Al".to_string(),
        }
        .validate()
        .unwrap_err();
        let fields = FieldErrors::from(errors);
        assert_eq!(fields.get("name"), Some("too short"));
    }

    #[test]
    fn test_number_range_is_inclusive() {
        let rule = NumberRange {
            min: 1,
            max: 5,
            message: "out of range",
        };
        assert!(rule.check(1).is_ok());
        assert!(rule.check(5).is_ok());
        assert!(rule.check(0).is_err());
        assert!(rule.check(6).is_err());
    }
}
