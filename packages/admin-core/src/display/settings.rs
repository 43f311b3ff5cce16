//! Per-table and per-field display settings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::label::Label;

fn default_display_in_grid() -> bool {
    true
}

/// Label set plus key/value property bag for a table or field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Presentation labels, in declaration order
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Named properties such as `enumOptions`, `length`, `htmlLength`
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    /// Whether the field appears as a grid column
    #[serde(default = "default_display_in_grid")]
    pub display_in_grid: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            properties: IndexMap::new(),
            display_in_grid: true,
        }
    }
}

impl DisplaySettings {
    /// Creates display settings from label tags and properties.
    pub fn new<I, S>(labels: I, properties: IndexMap<String, Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Label>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            properties,
            display_in_grid: true,
        }
    }

    /// Adds a label, keeping declaration order.
    pub fn add_label(&mut self, label: impl Into<Label>) {
        self.labels.push(label.into());
    }

    /// Sets a property.
    pub fn add_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Builder form of [`DisplaySettings::add_label`].
    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.add_label(label);
        self
    }

    /// Builder form of [`DisplaySettings::add_property`].
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_property(key, value);
        self
    }

    /// Exact-match label membership.
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Exact-match membership by tag string.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == tag)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Property rendered as a string; numbers and booleans are stringified.
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Property as an unsigned integer, accepting numeric strings.
    pub fn property_usize(&self, key: &str) -> Option<usize> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_u64().map(|v| v as usize),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Comma-split `enumOptions`, in listed order.
    pub fn enum_options(&self) -> Vec<String> {
        self.property_str("enumOptions")
            .map(|joined| joined.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup_is_exact() {
        let settings = DisplaySettings::default()
            .with_label("NOT_NULL")
            .with_label("custom-tag");
        assert!(settings.has_label(&Label::NotNull));
        assert!(!settings.has_label(&Label::NotNullMarker));
        assert!(settings.has_tag("custom-tag"));
        assert!(!settings.has_tag("custom"));
    }

    #[test]
    fn test_numeric_properties_accept_strings() {
        let settings = DisplaySettings::default()
            .with_property("length", 40)
            .with_property("htmlLength", "25");
        assert_eq!(settings.property_usize("length"), Some(40));
        assert_eq!(settings.property_usize("htmlLength"), Some(25));
        assert_eq!(settings.property_usize("missing"), None);
    }

    #[test]
    fn test_enum_options_keep_order() {
        let settings = DisplaySettings::default().with_property("enumOptions", "C,A,B");
        assert_eq!(settings.enum_options(), vec!["C", "A", "B"]);
        assert!(DisplaySettings::default().enum_options().is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let settings: DisplaySettings = serde_json::from_str(r#"{"labels":["hidden"]}"#).unwrap();
        assert!(settings.display_in_grid);
        assert!(settings.has_label(&Label::Hidden));
        assert!(settings.properties.is_empty());
    }
}
