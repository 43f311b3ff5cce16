//! Page actions: declared per-table handlers with generic fallbacks.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use admin_core::display::Label;
use admin_core::error::AdminError;
use admin_core::render::{build_form, build_view_fields, FormMode, RenderContext};
use admin_core::table::{order_columns, FieldDefinition, TableDefinition};
use admin_core::types::FieldType;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde_json::{json, Value};

use crate::api_request::{AjaxRequest, CalendarRequest, GlobalAction, PageAction};
use crate::calendar::calendar_entries;
use crate::context::RequestContext;
use crate::dao::DaoRegistry;
use crate::grid::grid_columns;
use crate::options::{fk_options, linked_display};
use crate::reply::Reply;
use crate::Result;

/// Everything a page handler may read.
#[derive(Clone, Copy)]
pub struct Page<'a> {
    pub ctx: &'a RequestContext,
    pub table: &'a TableDefinition,
    pub daos: &'a DaoRegistry,
    pub render: RenderContext<'a>,
}

/// Handler of one page action of one table.
pub trait PageHandler: Send + Sync {
    fn handle(&self, page: &Page<'_>, request: &AjaxRequest) -> Result<Reply>;
}

impl<F> PageHandler for F
where
    F: Fn(&Page<'_>, &AjaxRequest) -> Result<Reply> + Send + Sync,
{
    fn handle(&self, page: &Page<'_>, request: &AjaxRequest) -> Result<Reply> {
        self(page, request)
    }
}

/// Declared page handlers keyed by `(table, action)`.
#[derive(Clone, Default)]
pub struct PageRegistry {
    handlers: HashMap<(String, PageAction), Arc<dyn PageHandler>>,
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the handler of `action` for `table`, replacing the generic
    /// page.
    pub fn register<H>(&mut self, table: impl Into<String>, action: PageAction, handler: H)
    where
        H: PageHandler + 'static,
    {
        self.handlers
            .insert((table.into(), action), Arc::new(handler));
    }

    pub fn is_declared(&self, table: &str, action: PageAction) -> bool {
        self.handlers.contains_key(&(table.to_string(), action))
    }

    /// Runs the declared handler, or the generic page when none is declared.
    pub fn dispatch(&self, page: &Page<'_>, action: PageAction, request: &AjaxRequest) -> Result<Reply> {
        if let Some(handler) = self.handlers.get(&(page.table.name.clone(), action)) {
            tracing::debug!("Declared {} page for {}", action.as_str(), page.table.name);
            return handler.handle(page, request);
        }
        generic_page(page, action, request)
    }
}

fn generic_page(page: &Page<'_>, action: PageAction, request: &AjaxRequest) -> Result<Reply> {
    match action {
        PageAction::Manager => Ok(Reply::Json(column_model(page))),
        PageAction::Order => Ok(Reply::Json(Value::from(
            order_columns(page.table)
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>(),
        ))),
        PageAction::Create => {
            let form = build_form(&page.render, page.table, None, FormMode::Create)?;
            Ok(Reply::Html(form.to_html(&page.render)))
        }
        PageAction::Update => {
            let id = page_id(request)?;
            let record = page.daos.get(&page.table.name)?.get(id)?;
            let mode = if request.param("quick") == Some("1") {
                FormMode::QuickUpdate
            } else {
                FormMode::Update
            };
            let form = build_form(&page.render, page.table, Some(&record), mode)?;
            Ok(Reply::Html(form.to_html(&page.render)))
        }
        PageAction::View => {
            let id = page_id(request)?;
            let record = page.daos.get(&page.table.name)?.get(id)?;
            let elements = build_view_fields(&page.render, page.table, &record, |field, value| {
                let fk = field.foreign_key.as_ref()?;
                linked_display(&page.ctx.registry, page.daos, &fk.other_table, value)
            });
            let loading = page.render.loading_text();
            let mut html = format!(r#"<div class="jack-view" id="{}-view"><ul>"#, attr(&page.table.name));
            for element in &elements {
                html.push_str(&element.to_html(&loading));
            }
            html.push_str("</ul></div>");
            Ok(Reply::Html(html))
        }
        PageAction::FkData => {
            let options = fk_options(&page.ctx.registry, page.daos, &page.table.name)?;
            Ok(Reply::Json(serde_json::to_value(options)?))
        }
        PageAction::Upload | PageAction::Send => Err(AdminError::HandlerNotDeclared {
            table: page.table.name.clone(),
            action: action.as_str().to_string(),
        }),
    }
}

fn page_id(request: &AjaxRequest) -> Result<&str> {
    request
        .param("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AdminError::InvalidParameter {
            name: "id".to_string(),
            reason: "no id given".to_string(),
        })
}

/// How the quick search picks its value for a field.
fn search_type(field: &FieldDefinition) -> &'static str {
    if field.foreign_key.is_some() {
        "fk"
    } else {
        match field.field_type {
            FieldType::Enum => "en",
            FieldType::Boolean => "bl",
            t if t.is_date() => "dt",
            _ => "text",
        }
    }
}

/// Grid column model of the Manager page.
fn column_model(page: &Page<'_>) -> Value {
    let table = page.table;
    let localizer = &page.ctx.localizer;
    let columns: Vec<Value> = grid_columns(table)
        .into_iter()
        .map(|field| {
            let mut column = json!({
                "name": field.name,
                "label": localizer.field_label(&table.name, &field.name),
                "type": field.field_type,
                "hidden": field.has_label(&Label::Hidden),
                "searchType": search_type(field),
            });
            if let Some(width) = field.display_settings.property_usize("gridWidth") {
                column["width"] = Value::from(width);
            }
            if field.field_type == FieldType::Enum {
                column["options"] = Value::from(field.display_settings.enum_options());
            }
            if let Some(fk) = &field.foreign_key {
                column["otherTable"] = Value::from(fk.other_table.clone());
            }
            column
        })
        .collect();

    json!({
        "table": table.name,
        "title": localizer.lookup(&table.name),
        "primaryKey": table.primary_key,
        "columns": columns,
    })
}

/// Pages served without a target table.
pub(crate) fn global_page(ctx: &RequestContext, daos: &DaoRegistry, action: GlobalAction) -> Result<Reply> {
    let reply = match action {
        GlobalAction::Home => {
            let mut html = String::from(r#"<ul class="jack-home">"#);
            for table in ctx.registry.tables() {
                let _ = write!(
                    html,
                    r#"<li><a href="ajax?jackaction=Manager&amp;object={}">{}</a></li>"#,
                    attr(&table.name),
                    text(&ctx.localizer.lookup(&table.name))
                );
            }
            html.push_str("</ul>");
            Reply::Html(html)
        }
        GlobalAction::Help => Reply::Html(format!(
            r#"<div class="jack-help">{}</div>"#,
            text(&ctx.localizer.lookup("help"))
        )),
        GlobalAction::Calendar => {
            let entries = calendar_entries(ctx, daos, &CalendarRequest::all())?;
            Reply::Json(serde_json::to_value(entries)?)
        }
    };
    Ok(reply)
}
