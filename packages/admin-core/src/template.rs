//! Display templates such as `"{name} ({owner.email})"`.
//!
//! Foreign key option labels and the server side `FkData` listing render
//! rows through a template. Plain `{field}` blocks read a column of the row,
//! `{fk.field}` blocks read a column of the row referenced by `fk`, and any
//! other text is kept as is.

use crate::error::AdminError;
use crate::record::{value_text, Record};
use crate::table::TableDefinition;

/// One parsed template piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    Text(String),
    Field(String),
    ForeignField { field: String, other_field: String },
}

/// Parsed display template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTemplate {
    elements: Vec<TemplateElement>,
}

impl DisplayTemplate {
    /// Parses a template. An unterminated `{` is kept as literal text.
    pub fn parse(display: &str) -> Self {
        let mut elements = Vec::new();
        let mut rest = display;

        while !rest.is_empty() {
            let Some(open) = rest.find('{') else {
                elements.push(TemplateElement::Text(rest.to_string()));
                break;
            };
            if open > 0 {
                elements.push(TemplateElement::Text(rest[..open].to_string()));
                rest = &rest[open..];
                continue;
            }
            let Some(close) = rest.find('}') else {
                elements.push(TemplateElement::Text(rest.to_string()));
                break;
            };
            let block = &rest[1..close];
            match block.split_once('.') {
                Some((field, other_field)) if !field.is_empty() => {
                    elements.push(TemplateElement::ForeignField {
                        field: field.to_string(),
                        other_field: other_field.to_string(),
                    })
                }
                _ => elements.push(TemplateElement::Field(block.to_string())),
            }
            rest = &rest[close + 1..];
        }

        Self { elements }
    }

    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    /// Checks that every block names a field of `table`, and that dotted
    /// blocks go through a foreign key.
    pub fn validate(&self, table: &TableDefinition) -> Result<(), AdminError> {
        for element in &self.elements {
            match element {
                TemplateElement::Text(_) => {}
                TemplateElement::Field(name) => {
                    table.get_field(name)?;
                }
                TemplateElement::ForeignField { field, .. } => {
                    if table.get_field(field)?.foreign_key.is_none() {
                        return Err(AdminError::Validation(format!(
                            "Template block '{}' in table '{}' is not a foreign key",
                            field, table.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders a row.
    ///
    /// # Arguments
    /// * `record` - Row being labelled
    /// * `resolve` - Reads `other_field` of the row referenced by the
    ///   foreign key column `field`; `None` renders empty
    pub fn render<F>(&self, record: &Record, resolve: F) -> String
    where
        F: Fn(&str, &str) -> Option<String>,
    {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                TemplateElement::Text(text) => out.push_str(text),
                TemplateElement::Field(name) => {
                    if let Some(value) = record.get(name) {
                        out.push_str(&value_text(value));
                    }
                }
                TemplateElement::ForeignField { field, other_field } => {
                    if let Some(text) = resolve(field, other_field) {
                        out.push_str(&text);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mixed() {
        let template = DisplayTemplate::parse("{name} - {owner.email}!");
        assert_eq!(
            template.elements(),
            &[
                TemplateElement::Field("name".to_string()),
                TemplateElement::Text(" - ".to_string()),
                TemplateElement::ForeignField {
                    field: "owner".to_string(),
                    other_field: "email".to_string()
                },
                TemplateElement::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_is_text() {
        let template = DisplayTemplate::parse("a {b");
        assert_eq!(
            template.elements(),
            &[
                TemplateElement::Text("a ".to_string()),
                TemplateElement::Text("{b".to_string())
            ]
        );
    }

    #[test]
    fn test_render() {
        let template = DisplayTemplate::parse("{name} ({owner.email})");
        let mut record = Record::new();
        record.insert("name".to_string(), json!("Alpha"));
        record.insert("owner".to_string(), json!(3));
        let text = template.render(&record, |field, other| {
            assert_eq!((field, other), ("owner", "email"));
            Some("a@b.c".to_string())
        });
        assert_eq!(text, "Alpha (a@b.c)");
    }
}
