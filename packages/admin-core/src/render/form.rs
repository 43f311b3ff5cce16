//! Whole-form assembly.

use std::fmt::Write;

use serde_json::Value;

use super::edit::build_edit_widget;
use super::widget::{FormElement, HiddenInput, ViewContent, ViewWidget, Widget};
use super::RenderContext;
use crate::error::AdminError;
use crate::fk::FkKey;
use crate::record::{value_text, Record};
use crate::table::{order_columns, TableDefinition};

/// Form mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMode {
    Create,
    Update,
    QuickUpdate,
}

impl FormMode {
    /// Mode name handed to build hooks.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Update => "update",
            FormMode::QuickUpdate => "quick-update",
        }
    }

    /// CRUD action the form submits with.
    pub fn action(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Update => "update",
            FormMode::QuickUpdate => "quickEditupdate",
        }
    }
}

/// Rendered fields of a form plus their side lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub elements: Vec<FormElement>,
    /// Fields whose rich text editors are flushed before submit
    pub rich_text: Vec<String>,
    /// Foreign key option lists to fetch
    pub fk_requests: Vec<FkKey>,
}

/// Renders every field of a table in render order.
///
/// # Arguments
/// * `ctx` - Render collaborators
/// * `table` - Table to render
/// * `record` - Current values; `None` on create
/// * `mode` - Form mode
/// * `only_grid_fields` - Skip fields not displayed in the grid
/// * `ignored` - Field names to skip
pub fn build_fields(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    record: Option<&Record>,
    mode: FormMode,
    only_grid_fields: bool,
    ignored: &[&str],
) -> FormFields {
    let mut fields = FormFields::default();

    for field in order_columns(table) {
        if ignored.contains(&field.name.as_str()) {
            continue;
        }
        if only_grid_fields && !field.display_settings.display_in_grid {
            continue;
        }
        let value = record
            .and_then(|r| r.get(&field.name))
            .unwrap_or(&Value::Null);
        let outcome = build_edit_widget(ctx, table, field, value, mode);
        fields.elements.extend(outcome.element);
        fields.rich_text.extend(outcome.rich_text);
        fields.fk_requests.extend(outcome.fk_requests);
    }

    fields
}

/// A complete create or update form.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub table: String,
    pub mode: FormMode,
    /// `jackaction`, `object` and, when updating, `id` carriers
    pub hidden: Vec<HiddenInput>,
    /// Read-only id block shown when updating
    pub id_label: Option<FormElement>,
    pub fields: FormFields,
}

impl Form {
    /// Renders the form markup.
    pub fn to_html(&self, ctx: &RenderContext<'_>) -> String {
        let loading = ctx.loading_text();
        let mut html = format!(
            r#"<form id="{}-{}" method="post" action="ajax" class="jack-createviewupdate-form">"#,
            html_escape::encode_double_quoted_attribute(&self.table),
            self.mode.as_str()
        );
        for hidden in &self.hidden {
            html.push_str(&hidden.to_html());
        }
        if let Some(id_label) = &self.id_label {
            html.push_str(&id_label.to_html(&loading));
        }
        html.push_str("<ul>");
        for element in &self.fields.elements {
            html.push_str(&element.to_html(&loading));
        }
        html.push_str("</ul>");
        if self.mode == FormMode::Create {
            let _ = write!(
                html,
                r#"<input type="reset" class="jack-crud-reset" value="{}" />"#,
                html_escape::encode_double_quoted_attribute(&ctx.localizer.lookup("reset"))
            );
        }
        let _ = write!(
            html,
            r#"<input type="submit" class="jack-crud-save" value="{}" /></form>"#,
            html_escape::encode_double_quoted_attribute(&ctx.localizer.lookup("save"))
        );
        html
    }
}

/// Builds a form with its hidden carriers.
///
/// # Returns
/// `Err(AdminError::InvalidParameter)` when an update form is requested
/// without a record carrying a primary key value.
pub fn build_form(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    record: Option<&Record>,
    mode: FormMode,
) -> Result<Form, AdminError> {
    let mut hidden = vec![
        HiddenInput::new("jackaction", mode.action()),
        HiddenInput::new("object", &table.name),
    ];

    let mut id_label = None;
    if mode != FormMode::Create {
        let id = record
            .and_then(|r| r.get(&table.primary_key))
            .filter(|v| !v.is_null())
            .map(value_text)
            .ok_or_else(|| AdminError::InvalidParameter {
                name: "id".to_string(),
                reason: format!("{} form needs a '{}' record", mode.as_str(), table.name),
            })?;
        hidden.push(HiddenInput::new("id", &id));
        let pk = table.primary_key_field()?;
        let widget = Widget::View(ViewWidget {
            name: pk.name.clone(),
            content: ViewContent::Text(id),
        });
        id_label = Some(ctx.block(table, pk, widget, false));
    }

    Ok(Form {
        table: table.name.clone(),
        mode,
        hidden,
        id_label,
        fields: build_fields(ctx, table, record, mode, false, &[]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::display::DisplaySettings;
    use crate::i18n::Localizer;
    use crate::render::HookRegistry;
    use crate::table::FieldDefinition;
    use crate::types::FieldType;
    use serde_json::json;

    fn table() -> TableDefinition {
        let mut hidden_in_grid = FieldDefinition::new("notes", FieldType::Text);
        hidden_in_grid.display_settings.display_in_grid = false;
        TableDefinition::new("Task", "id", "title", DisplaySettings::default())
            .with_field(FieldDefinition::new("id", FieldType::Int).with_label("hidden"))
            .unwrap()
            .with_field(FieldDefinition::new("title", FieldType::Varchar))
            .unwrap()
            .with_field(hidden_in_grid)
            .unwrap()
            .with_field(FieldDefinition::new("body", FieldType::Text).with_label("rte"))
            .unwrap()
            .with_render_order("body", 0)
    }

    fn with_ctx<R>(f: impl FnOnce(&RenderContext<'_>) -> R) -> R {
        let config = AdminConfig::default();
        let localizer = Localizer::default();
        let hooks = HookRegistry::new();
        f(&RenderContext::new(&config, &localizer, &hooks))
    }

    fn element_names(fields: &FormFields) -> Vec<String> {
        fields
            .elements
            .iter()
            .map(|e| match e {
                FormElement::Hidden(h) => h.name.clone(),
                FormElement::Block(b) => b.field.clone(),
            })
            .collect()
    }

    #[test]
    fn test_build_fields_order_and_filters() {
        with_ctx(|ctx| {
            let all = build_fields(ctx, &table(), None, FormMode::Create, false, &[]);
            assert_eq!(element_names(&all), vec!["body", "id", "title", "notes"]);
            assert_eq!(all.rich_text, vec!["body"]);

            let grid_only = build_fields(ctx, &table(), None, FormMode::Create, true, &["title"]);
            assert_eq!(element_names(&grid_only), vec!["body", "id"]);
        });
    }

    #[test]
    fn test_build_form_carriers() {
        with_ctx(|ctx| {
            let create = build_form(ctx, &table(), None, FormMode::Create).unwrap();
            assert_eq!(
                create.hidden,
                vec![
                    HiddenInput::new("jackaction", "create"),
                    HiddenInput::new("object", "Task")
                ]
            );
            assert!(create.id_label.is_none());

            let mut record = Record::new();
            record.insert("id".to_string(), json!(7));
            record.insert("title".to_string(), json!("Fix bug"));
            let update = build_form(ctx, &table(), Some(&record), FormMode::QuickUpdate).unwrap();
            assert_eq!(update.hidden[0], HiddenInput::new("jackaction", "quickEditupdate"));
            assert_eq!(update.hidden[2], HiddenInput::new("id", "7"));
            assert!(update.to_html(ctx).contains(r#"value="Fix bug""#));
        });
    }

    #[test]
    fn test_update_without_record_fails() {
        with_ctx(|ctx| {
            assert!(matches!(
                build_form(ctx, &table(), None, FormMode::Update),
                Err(AdminError::InvalidParameter { .. })
            ));
        });
    }
}
