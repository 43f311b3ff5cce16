//! Calendar feed over `calendar`-labelled tables.

use admin_core::display::Label;
use admin_core::record::{is_blank, value_text, value_to_string};
use admin_core::render::update_page_href;
use admin_core::table::TableDefinition;
use admin_core::Record;
use serde::Serialize;
use serde_json::Value;

use crate::api_request::CalendarRequest;
use crate::context::RequestContext;
use crate::dao::DaoRegistry;
use crate::Result;

/// One calendar event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub class_name: String,
}

/// Members of a table mapped to event parts.
#[derive(Debug, Default)]
struct CalendarFields<'t> {
    start: Option<&'t str>,
    end: Option<&'t str>,
    complete: Option<&'t str>,
    description: Option<&'t str>,
    title: Option<&'t str>,
}

impl<'t> CalendarFields<'t> {
    /// First matching label per member wins, in the order start, end,
    /// complete, description, title.
    fn of(table: &'t TableDefinition) -> Self {
        let mut fields = Self::default();
        for field in table.fields.values() {
            let name = Some(field.name.as_str());
            if field.has_label(&Label::CalendarStart) {
                fields.start = name;
            } else if field.has_label(&Label::CalendarEnd) {
                fields.end = name;
            } else if field.has_label(&Label::CalendarComplete) {
                fields.complete = name;
            } else if field.has_label(&Label::CalendarDescription) {
                fields.description = name;
            } else if field.has_label(&Label::CalendarTitle) {
                fields.title = name;
            }
        }
        fields
    }
}

fn read<'r>(record: &'r Record, field: Option<&str>) -> Option<&'r Value> {
    field.and_then(|f| record.get(f))
}

fn is_truthy(value: &Value) -> bool {
    !is_blank(value)
        && !matches!(value_to_string(value).as_deref(), Some("0") | Some("false"))
}

fn entry(table: &TableDefinition, fields: &CalendarFields<'_>, record: &Record) -> CalendarEntry {
    let id = record
        .get(&table.primary_key)
        .map(value_text)
        .unwrap_or_default();
    let mut title = read(record, fields.title).map(value_text).unwrap_or_default();
    let mut class_name = format!("cal-{}", table.name);

    if fields.complete.is_some() {
        if read(record, fields.complete).is_some_and(is_truthy) {
            class_name.push_str(" jack-cal-complete");
            title = format!("COMPLETE:{}", title);
        } else {
            class_name.push_str(" jack-cal-incomplete");
            title = format!("PENDING: {}", title);
        }
    }

    CalendarEntry {
        url: update_page_href(&table.name, &id),
        id,
        title,
        start: read(record, fields.start).map(value_text).unwrap_or_default(),
        end: fields.end.map(|f| record.get(f).map(value_text).unwrap_or_default()),
        description: read(record, fields.description)
            .filter(|v| !is_blank(v))
            .map(value_text),
        class_name,
    }
}

/// Events of every record of the requested calendar tables.
///
/// Named tables without the `calendar` label contribute nothing.
///
/// # Returns
/// `Err(AdminError::TableNotFound)` when a named table is not registered.
pub fn calendar_entries(
    ctx: &RequestContext,
    daos: &DaoRegistry,
    request: &CalendarRequest,
) -> Result<Vec<CalendarEntry>> {
    let tables: Vec<&TableDefinition> = match request.tables() {
        None => ctx.registry.tables_with_label(&Label::Calendar).collect(),
        Some(names) => names
            .into_iter()
            .map(|name| ctx.registry.get(name))
            .collect::<Result<_>>()?,
    };

    let mut entries = Vec::new();
    for table in tables {
        if !table.has_label(&Label::Calendar) {
            tracing::debug!("Skipping {}: not a calendar table", table.name);
            continue;
        }
        let fields = CalendarFields::of(table);
        for record in daos.get(&table.name)?.get_all()? {
            entries.push(entry(table, &fields, &record));
        }
    }
    Ok(entries)
}
