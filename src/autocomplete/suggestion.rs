//! Suggestion records returned by the search endpoints.

use serde_json::Value;

/// One row of an autocomplete response, kept as the raw JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion(Value);

impl Suggestion {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Text shown in the dropdown: `name`, then `description`, then
    /// `item_code`, then the JSON itself.
    pub fn display_text(&self) -> String {
        self.field("name")
            .or_else(|| self.field("description"))
            .or_else(|| self.field("item_code"))
            .map(str::to_string)
            .unwrap_or_else(|| match &self.0 {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// Text written into the input on selection: `item_code`, then `code`,
    /// then the display text.
    pub fn value(&self) -> String {
        self.field("item_code")
            .or_else(|| self.field("code"))
            .map(str::to_string)
            .unwrap_or_else(|| self.display_text())
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Reads `{"items": [...]}` or a bare array. Anything else yields nothing.
pub fn decode_suggestions(body: Value) -> Vec<Suggestion> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    rows.into_iter().map(Suggestion::new).collect()
}
