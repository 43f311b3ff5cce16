//! Read-only view dispatch.

use serde_json::Value;

use super::widget::{FormElement, Priority, ViewContent, ViewWidget, Widget};
use super::{update_page_href, RenderContext};
use crate::display::Label;
use crate::record::{is_blank, value_as_f64, value_text, value_to_string, Record};
use crate::table::{FieldDefinition, TableDefinition};
use crate::types::FieldType;

/// Read-only content of one field.
///
/// # Arguments
/// * `ctx` - Render collaborators
/// * `field` - Field being shown
/// * `value` - Stored value
/// * `linked` - Display value of the row a foreign key points at
pub fn view_content(
    ctx: &RenderContext<'_>,
    field: &FieldDefinition,
    value: &Value,
    linked: Option<&str>,
) -> ViewContent {
    if field.has_label(&Label::FileViewAsImage) {
        if is_blank(value) {
            return ViewContent::Text(String::new());
        }
        return ViewContent::Image {
            src: ctx.storage_url(&value_text(value)),
            width: 80,
        };
    }
    if field.has_label(&Label::FileViewAsLink) {
        if is_blank(value) {
            return ViewContent::Text(String::new());
        }
        return ViewContent::Link {
            href: ctx.storage_url(&value_text(value)),
            text: "Download".to_string(),
        };
    }

    match field.field_type {
        FieldType::Varchar if field.has_label(&Label::Password) => ViewContent::Text(String::new()),
        FieldType::Boolean => {
            let enabled = value_to_string(value).as_deref() != Some("0");
            ViewContent::Icon {
                src: ctx.image_url(if enabled { "enabled.png" } else { "disabled.png" }),
                enabled,
            }
        }
        t if t.is_integer() && field.has_label(&Label::PriorityHml) => {
            ViewContent::Priority(Priority::from_value(&value_text(value)))
        }
        t if t.is_integer() && field.has_label(&Label::Rating1To10) => ViewContent::Rating {
            stars: value_as_f64(value).map_or(0, |v| v.clamp(0.0, 10.0) as u32),
            star_src: ctx.image_url("16/star.png"),
        },
        t if t.is_integer() => match (&field.foreign_key, linked) {
            (Some(fk), Some(linked)) if !value.is_null() => ViewContent::Link {
                href: update_page_href(&fk.other_table, &value_text(value)),
                text: linked.to_string(),
            },
            _ => text_view(field, value),
        },
        _ => text_view(field, value),
    }
}

fn text_view(field: &FieldDefinition, value: &Value) -> ViewContent {
    let Some(text) = value_to_string(value) else {
        return ViewContent::Text(String::new());
    };
    if field.has_label(&Label::Www) {
        ViewContent::Link {
            href: text.clone(),
            text,
        }
    } else if field.has_label(&Label::EmailLink) {
        ViewContent::Link {
            href: format!("mailto:{}", text),
            text,
        }
    } else if field.has_label(&Label::RichText) {
        ViewContent::RawHtml(text)
    } else {
        ViewContent::Text(text)
    }
}

/// Labelled read-only block of one field.
pub fn build_view_widget(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    field: &FieldDefinition,
    value: &Value,
    linked: Option<&str>,
) -> FormElement {
    let widget = Widget::View(ViewWidget {
        name: field.name.clone(),
        content: view_content(ctx, field, value, linked),
    });
    ctx.block(table, field, widget, false)
}

/// Read-only blocks of every non-hidden field of a record, in declaration
/// order.
///
/// # Arguments
/// * `linked` - Resolves the display value behind a foreign key field
pub fn build_view_fields<F>(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    record: &Record,
    linked: F,
) -> Vec<FormElement>
where
    F: Fn(&FieldDefinition, &Value) -> Option<String>,
{
    table
        .fields
        .values()
        .filter(|field| !field.has_label(&Label::Hidden))
        .map(|field| {
            let value = record.get(&field.name).unwrap_or(&Value::Null);
            let linked_value = if field.foreign_key.is_some() {
                linked(field, value)
            } else {
                None
            };
            build_view_widget(ctx, table, field, value, linked_value.as_deref())
        })
        .collect()
}
