//! Edit-mode widget dispatch.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

use super::form::FormMode;
use super::hooks::HookInput;
use super::view::view_content;
use super::widget::*;
use super::RenderContext;
use crate::display::Label;
use crate::fk::{FkKey, FkSelect};
use crate::record::{value_to_string, value_text};
use crate::table::{FieldDefinition, TableDefinition};
use crate::types::FieldType;

/// Result of rendering one field for editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOutcome {
    /// Rendered element; `None` when nothing is rendered
    pub element: Option<FormElement>,
    /// Fields whose rich text editor must be flushed before submit
    pub rich_text: Vec<String>,
    /// Foreign key option lists the form still has to fetch
    pub fk_requests: Vec<FkKey>,
}

impl EditOutcome {
    fn nothing() -> Self {
        Self::default()
    }

    fn element(element: FormElement) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }
}

/// Builds the edit control of one field.
///
/// Rules are evaluated in order and the first match wins; label rules come
/// before type rules.
///
/// # Arguments
/// * `ctx` - Render collaborators
/// * `table` - Owning table
/// * `field` - Field to render
/// * `value` - Current value, `Null` on create
/// * `mode` - Form mode
pub fn build_edit_widget(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    field: &FieldDefinition,
    value: &Value,
    mode: FormMode,
) -> EditOutcome {
    let settings = &field.display_settings;

    if field.has_label(&Label::Hidden) {
        return EditOutcome::element(FormElement::Hidden(HiddenInput::new(&field.name, "")));
    }

    if let Some(hook_name) = settings.property_str("jsBuildFunction") {
        let Some(hook) = ctx.hooks.get(&hook_name) else {
            tracing::debug!(
                "No build hook '{}' for {}.{}, skipping field",
                hook_name,
                table.name,
                field.name
            );
            return EditOutcome::nothing();
        };
        let input = HookInput {
            table,
            field,
            value,
            mode,
        };
        return EditOutcome {
            element: hook(&input),
            ..EditOutcome::default()
        };
    }

    if field.has_label(&Label::ReadOnlyEdit) && mode != FormMode::Create {
        let widget = Widget::View(ViewWidget {
            name: field.name.clone(),
            content: view_content(ctx, field, value, None),
        });
        return EditOutcome::element(ctx.block(table, field, widget, true));
    }

    let mut outcome = EditOutcome::nothing();
    let widget = match field.field_type {
        _ if field.has_label(&Label::File) => Some(Widget::File(FileInput {
            name: field.name.clone(),
            current: value_text(value),
            tags: required_tags(field),
        })),
        FieldType::Varchar if field.has_label(&Label::Password) => Some(Widget::Text(TextInput {
            id: control_id(table, field),
            name: field.name.clone(),
            kind: InputKind::Password,
            value: String::new(),
            max_length: None,
            size: None,
            tags: required_tags(field),
        })),
        FieldType::Varchar => Some(varchar_input(table, field, value)),
        FieldType::Boolean => Some(boolean_input(field, value)),
        FieldType::Enum => Some(enum_input(field, value)),
        t if t.is_integer() => Some(integer_input(ctx, table, field, value, &mut outcome)),
        FieldType::Text | FieldType::LongText => {
            let rich_text = field.has_label(&Label::RichText);
            if rich_text {
                outcome.rich_text.push(field.name.clone());
            }
            Some(Widget::TextArea(TextArea {
                id: control_id(table, field),
                name: field.name.clone(),
                value: value_text(value),
                rich_text,
                tags: required_tags(field),
            }))
        }
        FieldType::Decimal => Some(Widget::Text(TextInput {
            id: control_id(table, field),
            name: field.name.clone(),
            kind: InputKind::Text,
            value: value_text(value),
            max_length: None,
            size: Some(10),
            tags: with_required(field, vec![ValidationTag::Number]),
        })),
        FieldType::Date => Some(date_input(field, value)),
        FieldType::DateTime => Some(date_time_input(field, value)),
        _ if field.has_label(&Label::CreationDbCreate) => None,
        _ => Some(plain_text_input(table, field, value)),
    };

    outcome.element = widget.map(|w| ctx.block(table, field, w, true));
    outcome
}

fn control_id(table: &TableDefinition, field: &FieldDefinition) -> String {
    format!("{}-{}", table.name, field.name)
}

fn required_tags(field: &FieldDefinition) -> Vec<ValidationTag> {
    with_required(field, Vec::new())
}

fn with_required(field: &FieldDefinition, mut tags: Vec<ValidationTag>) -> Vec<ValidationTag> {
    if field.is_required() && !tags.contains(&ValidationTag::Required) {
        tags.push(ValidationTag::Required);
    }
    tags
}

fn plain_text_input(table: &TableDefinition, field: &FieldDefinition, value: &Value) -> Widget {
    Widget::Text(TextInput {
        id: control_id(table, field),
        name: field.name.clone(),
        kind: InputKind::Text,
        value: value_text(value),
        max_length: None,
        size: None,
        tags: required_tags(field),
    })
}

fn varchar_input(table: &TableDefinition, field: &FieldDefinition, value: &Value) -> Widget {
    let settings = &field.display_settings;
    let mut tags = Vec::new();
    if field.has_label(&Label::WebAddress) {
        tags.push(ValidationTag::Url);
    }
    if field.has_label(&Label::Email) {
        tags.push(ValidationTag::Email);
    }
    Widget::Text(TextInput {
        id: control_id(table, field),
        name: field.name.clone(),
        kind: InputKind::Text,
        value: value_text(value),
        max_length: settings.property_usize("length").filter(|len| *len > 0),
        size: settings.property_usize("htmlLength"),
        tags: with_required(field, tags),
    })
}

fn boolean_input(field: &FieldDefinition, value: &Value) -> Widget {
    let current = value_to_string(value);
    let current = current.as_deref();
    Widget::Radio(ChoiceGroup {
        name: field.name.clone(),
        options: vec![
            ChoiceOption::new("1", "Yes", current == Some("1")),
            ChoiceOption::new("0", "No", current == Some("0")),
        ],
        tags: vec![ValidationTag::Required],
    })
}

fn enum_input(field: &FieldDefinition, value: &Value) -> Widget {
    let current = value_to_string(value);
    let options = field
        .display_settings
        .enum_options()
        .into_iter()
        .map(|option| {
            let selected = current.as_deref() == Some(option.as_str());
            ChoiceOption::new(option.clone(), option, selected)
        })
        .collect();
    Widget::Select(ChoiceGroup {
        name: field.name.clone(),
        options,
        tags: required_tags(field),
    })
}

fn integer_input(
    ctx: &RenderContext<'_>,
    table: &TableDefinition,
    field: &FieldDefinition,
    value: &Value,
    outcome: &mut EditOutcome,
) -> Widget {
    let current = value_to_string(value);
    let current = current.as_deref();

    if field.has_label(&Label::PriorityHml) {
        let options = [Priority::High, Priority::Medium, Priority::Low]
            .iter()
            .map(|p| ChoiceOption::new(p.value(), p.as_str(), current == Some(p.value())))
            .collect();
        return Widget::Radio(ChoiceGroup {
            name: field.name.clone(),
            options,
            tags: required_tags(field),
        });
    }

    if field.has_label(&Label::Rating1To10) {
        let options = (0..=10)
            .map(|n: u32| {
                let n = n.to_string();
                let selected = current == Some(n.as_str());
                ChoiceOption::new(n.clone(), n, selected)
            })
            .collect();
        return Widget::Select(ChoiceGroup {
            name: field.name.clone(),
            options,
            tags: required_tags(field),
        });
    }

    if let Some(key) = FkKey::for_field(table, field) {
        let selected = current.filter(|s| !s.is_empty()).map(str::to_string);
        let mut select = FkSelect::loading(key.clone(), &field.name, selected, !field.is_required());
        select.tags = required_tags(field);
        match ctx.fk_cache.and_then(|cache| cache.get(&key)) {
            Some(options) => select.apply_options(&options),
            None => outcome.fk_requests.push(key),
        }
        return Widget::ForeignKey(select);
    }

    Widget::Text(TextInput {
        id: control_id(table, field),
        name: field.name.clone(),
        kind: InputKind::Text,
        value: value_text(value),
        max_length: None,
        size: None,
        tags: with_required(field, vec![ValidationTag::Digits]),
    })
}

/// Reads the date part of `yyyy-mm-dd` or `yyyy-mm-dd hh:mm:ss`.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn date_input(field: &FieldDefinition, value: &Value) -> Widget {
    let (value, display) = match parse_date(&value_text(value)) {
        Some(date) => (
            date.format("%Y-%m-%d").to_string(),
            date.format("%d-%m-%Y").to_string(),
        ),
        None => (String::new(), String::new()),
    };
    Widget::Date(DatePicker {
        name: field.name.clone(),
        value,
        display,
        tags: required_tags(field),
    })
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Reads a stored datetime in any of [`DATE_TIME_FORMATS`].
fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn date_time_input(field: &FieldDefinition, value: &Value) -> Widget {
    let text = value_text(value);
    let text = text.trim();
    let parsed = parse_date_time(text);
    let (hour, minute, am) = match parsed {
        Some(dt) => {
            let (pm, hour12) = dt.hour12();
            (hour12 % 12, dt.minute(), !pm)
        }
        None => (0, 0, true),
    };
    Widget::DateTime(DateTimePicker {
        name: field.name.clone(),
        // Unreadable values are carried as stored so an untouched picker keeps them
        value: text.to_string(),
        hour,
        minute,
        am,
        tags: required_tags(field),
    })
}
