//! Grid cell formatting.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::widget::Priority;
use super::{update_page_href, RenderContext};
use crate::display::Label;
use crate::error::AdminError;
use crate::record::{is_blank, value_text, value_to_string};
use crate::registry::TableRegistry;
use crate::types::FieldType;

/// One grid cell as sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellPayload {
    /// Owning table
    pub tbl: String,
    /// Member (field) name
    pub mem: String,
    /// Raw value
    pub val: Value,
    /// Linked record id, for foreign key cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lval: Option<Value>,
    /// Display value of the linked record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dval: Option<String>,
    /// Table of the linked record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otbl: Option<String>,
}

impl CellPayload {
    pub fn new(table: impl Into<String>, member: impl Into<String>, value: Value) -> Self {
        Self {
            tbl: table.into(),
            mem: member.into(),
            val: value,
            lval: None,
            dval: None,
            otbl: None,
        }
    }

    /// Adds the linked record of a foreign key cell.
    pub fn with_link(mut self, other_table: impl Into<String>, id: Value, display: impl Into<String>) -> Self {
        self.otbl = Some(other_table.into());
        self.lval = Some(id);
        self.dval = Some(display.into());
        self
    }
}

/// Renders one grid cell as markup.
///
/// Cells linking to another record render as a link to that record's
/// Update page. Otherwise the first matching rule wins: boolean icon, file
/// image link, file download link, varchar `www`/`email` anchors, priority
/// badge, empty for null, and finally the escaped raw value.
///
/// # Returns
/// `Err(AdminError::TableNotFound | FieldNotFound)` when the payload names
/// an unknown table or member.
pub fn format_cell(
    ctx: &RenderContext<'_>,
    registry: &TableRegistry,
    payload: &CellPayload,
) -> Result<String, AdminError> {
    if let (Some(other), Some(id), Some(display)) = (&payload.otbl, &payload.lval, &payload.dval) {
        return Ok(format!(
            r#"<a class="aunderline" href="{}">{}</a>"#,
            attr(&update_page_href(other, &value_text(id))),
            text(display)
        ));
    }

    let field = registry.get(&payload.tbl)?.get_field(&payload.mem)?;
    let value = &payload.val;

    let html = match field.field_type {
        FieldType::Boolean => {
            let disabled = value_to_string(value).as_deref() == Some("0");
            format!(
                r#"<img src="{}" />"#,
                attr(&ctx.image_url(if disabled { "disabled.png" } else { "enabled.png" }))
            )
        }
        _ if field.has_label(&Label::FileViewAsImage) => file_link(ctx, value, "View Image"),
        _ if field.has_label(&Label::FileViewAsLink) => file_link(ctx, value, "Download"),
        FieldType::Varchar => match value_to_string(value) {
            None => String::new(),
            Some(v) if field.has_label(&Label::Www) => {
                format!(r#"<a target="_blank" href="{}">{}</a>"#, attr(&v), text(&v))
            }
            Some(v) if field.has_label(&Label::EmailLink) => {
                format!(r#"<a href="mailto:{}">{}</a>"#, attr(&v), text(&v))
            }
            Some(v) => text(&v).into_owned(),
        },
        _ if field.has_label(&Label::PriorityHml) => {
            match Priority::from_value(&value_text(value)) {
                Some(p) => format!(r#"<span class="{}">{}</span>"#, p.css_class(), p.as_str()),
                None => "-".to_string(),
            }
        }
        _ => text(&value_text(value)).into_owned(),
    };
    Ok(html)
}

fn file_link(ctx: &RenderContext<'_>, value: &Value, label: &str) -> String {
    if is_blank(value) {
        return String::new();
    }
    format!(
        r#"<a target="_blank" href="{}">{}</a>"#,
        attr(&ctx.storage_url(&value_text(value))),
        label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::display::DisplaySettings;
    use crate::i18n::Localizer;
    use crate::render::HookRegistry;
    use crate::table::{FieldDefinition, TableDefinition};
    use serde_json::json;

    fn registry() -> TableRegistry {
        let table = TableDefinition::new("Link", "id", "id", DisplaySettings::default())
            .with_field(FieldDefinition::new("id", FieldType::Int))
            .unwrap()
            .with_field(FieldDefinition::new("site", FieldType::Varchar).with_label("www"))
            .unwrap()
            .with_field(FieldDefinition::new("mail", FieldType::Varchar).with_label("email"))
            .unwrap()
            .with_field(FieldDefinition::new("shot", FieldType::Varchar).with_label("fileViewAsImage"))
            .unwrap()
            .with_field(FieldDefinition::new("note", FieldType::Text))
            .unwrap();
        let mut registry = TableRegistry::new();
        registry.register(table).unwrap();
        registry
    }

    fn format(payload: CellPayload) -> String {
        let config = AdminConfig::default();
        let localizer = Localizer::default();
        let hooks = HookRegistry::new();
        let ctx = RenderContext::new(&config, &localizer, &hooks);
        format_cell(&ctx, &registry(), &payload).unwrap()
    }

    #[test]
    fn test_varchar_cells() {
        assert_eq!(
            format(CellPayload::new("Link", "site", json!("http://a.io"))),
            r#"<a target="_blank" href="http://a.io">http://a.io</a>"#
        );
        assert_eq!(
            format(CellPayload::new("Link", "mail", json!("a@b.c"))),
            r#"<a href="mailto:a@b.c">a@b.c</a>"#
        );
        assert_eq!(format(CellPayload::new("Link", "mail", Value::Null)), "");
    }

    #[test]
    fn test_file_and_null_cells() {
        assert_eq!(
            format(CellPayload::new("Link", "shot", json!("x.png"))),
            r#"<a target="_blank" href="files/x.png">View Image</a>"#
        );
        assert_eq!(format(CellPayload::new("Link", "shot", json!(""))), "");
        assert_eq!(format(CellPayload::new("Link", "note", Value::Null)), "");
        assert_eq!(
            format(CellPayload::new("Link", "note", json!("<i>"))),
            "&lt;i&gt;"
        );
    }

    #[test]
    fn test_table_link_cell() {
        let payload = CellPayload::new("Link", "id", json!(1)).with_link("Project", json!(4), "Alpha");
        assert_eq!(
            format(payload),
            r#"<a class="aunderline" href="ajax?jackaction=Update&amp;object=Project&amp;id=4">Alpha</a>"#
        );
    }

    #[test]
    fn test_unknown_member_is_error() {
        let config = AdminConfig::default();
        let localizer = Localizer::default();
        let hooks = HookRegistry::new();
        let ctx = RenderContext::new(&config, &localizer, &hooks);
        let payload = CellPayload::new("Link", "ghost", json!(1));
        assert!(matches!(
            format_cell(&ctx, &registry(), &payload),
            Err(AdminError::FieldNotFound { .. })
        ));
    }
}
