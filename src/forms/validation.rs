//! Form validation
//!
//! Field rules (required, email, phone) and the line-item presence check of
//! quotation and sales order forms. Failures are returned as
//! [`CrmError::Validation`] carrying every offending field.

use std::collections::BTreeMap;

use crate::error::{CrmError, FieldError, Result};
use crate::notify::{Notice, Notifier};

use super::LineRow;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const LINE_ITEMS_MESSAGE: &str = "Please add at least one valid item";
pub const FORM_ERRORS_MESSAGE: &str = "Please correct the errors in the form";

/// Submitted form values by field name.
pub type FormData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    /// A text field named like `*phone*` is checked as a phone number.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let kind = match kind {
            FieldKind::Text if name.to_ascii_lowercase().contains("phone") => FieldKind::Phone,
            other => other,
        };
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Error message for `raw`, if any. A missing required value wins over
    /// a format error.
    pub fn check(&self, raw: &str) -> Option<&'static str> {
        let value = raw.trim();
        if value.is_empty() {
            return self.required.then_some(REQUIRED_MESSAGE);
        }

        match self.kind {
            FieldKind::Email if !is_valid_email(value) => Some(EMAIL_MESSAGE),
            FieldKind::Phone if !is_valid_phone(value) => Some(PHONE_MESSAGE),
            _ => None,
        }
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Some dot with text on both sides
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Digits, spaces and `-+()` only, with at least 10 digits.
pub fn is_valid_phone(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '\t' | '-' | '+' | '(' | ')'));
    allowed && !value.is_empty() && value.chars().filter(char::is_ascii_digit).count() >= 10
}

/// Ordered set of field rules for one form.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    rules: Vec<FieldRule>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Checks every rule against `data`; absent fields count as empty.
    pub fn validate(&self, data: &FormData) -> Result<()> {
        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let raw = data.get(&rule.name).map(String::as_str).unwrap_or("");
                rule.check(raw).map(|message| FieldError::new(&rule.name, message))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CrmError::Validation(errors))
        }
    }

    /// [`FormValidator::validate`] for a submit; a blocked submit is
    /// announced through `notifier`.
    pub fn submit(&self, data: &FormData, notifier: &dyn Notifier) -> Result<()> {
        let result = self.validate(data);
        if result.is_err() {
            notifier.notify(Notice::error(FORM_ERRORS_MESSAGE));
        }
        result
    }
}

/// At least one row needs an item code, a quantity and a unit price.
pub fn validate_line_items(rows: &[LineRow]) -> Result<()> {
    if rows.iter().any(LineRow::is_complete) {
        Ok(())
    } else {
        Err(CrmError::validation("items", LINE_ITEMS_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ChannelNotifier;

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b@mail.example.co"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane@example."));
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("98765 43210 ext"));
    }

    #[test]
    fn test_phone_inferred_from_name() {
        let rule = FieldRule::new("contact_phone", FieldKind::Text);
        assert_eq!(rule.kind, FieldKind::Phone);
        assert_eq!(rule.check("12"), Some(PHONE_MESSAGE));
        assert_eq!(rule.check("  "), None);
    }

    #[test]
    fn test_required_wins_over_format() {
        let rule = FieldRule::new("email", FieldKind::Email).required();
        assert_eq!(rule.check(" "), Some(REQUIRED_MESSAGE));
        assert_eq!(rule.check("nope"), Some(EMAIL_MESSAGE));
        assert_eq!(rule.check("a@b.io"), None);
    }

    #[test]
    fn test_validate_collects_every_field() {
        let validator = FormValidator::new()
            .field(FieldRule::new("name", FieldKind::Text).required())
            .field(FieldRule::new("email", FieldKind::Email))
            .field(FieldRule::new("phone", FieldKind::Text));

        let mut data = FormData::new();
        data.insert("email".to_string(), "bad".to_string());
        data.insert("phone".to_string(), "123".to_string());

        let err = validator.validate(&data).unwrap_err();
        let fields: Vec<(&str, &str)> = err
            .field_errors()
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("name", REQUIRED_MESSAGE), ("email", EMAIL_MESSAGE), ("phone", PHONE_MESSAGE)]
        );
    }

    #[test]
    fn test_line_items_need_one_complete_row() {
        let partial = LineRow {
            item_code: "AB-1".to_string(),
            quantity: "2".to_string(),
            ..Default::default()
        };
        let err = validate_line_items(&[partial.clone()]).unwrap_err();
        assert_eq!(err.field_errors()[0].message, LINE_ITEMS_MESSAGE);
        assert!(validate_line_items(&[]).is_err());

        let complete = LineRow {
            unit_price: "10".to_string(),
            ..partial.clone()
        };
        assert!(validate_line_items(&[partial, complete]).is_ok());
    }

    #[test]
    fn test_blocked_submit_is_announced() {
        let validator = FormValidator::new().field(FieldRule::new("name", FieldKind::Text).required());
        let (notifier, mut rx) = ChannelNotifier::channel();

        assert!(validator.submit(&FormData::new(), &notifier).is_err());
        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.message, FORM_ERRORS_MESSAGE);
        assert_eq!(notice.level, crate::notify::NoticeLevel::Error);

        let data = FormData::from([("name".to_string(), "Acme".to_string())]);
        assert!(validator.submit(&data, &notifier).is_ok());
        assert!(rx.try_recv().is_err());
    }
}
