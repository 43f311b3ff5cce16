//! Paged grid listing with quick search.

use admin_core::error::AdminError;
use admin_core::query::{build_condition, Condition, Query, QuickSearchOp, SortOrder};
use admin_core::record::value_text;
use admin_core::render::{format_cell, CellPayload, RenderContext};
use admin_core::table::{order_columns, FieldDefinition, TableDefinition};
use serde::Serialize;
use serde_json::Value;

use crate::api_request::GridRequest;
use crate::context::RequestContext;
use crate::dao::DaoRegistry;
use crate::options::linked_display;
use crate::Result;

/// One grid cell: the raw payload, or its markup when the request asked for
/// formatted cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GridCell {
    Payload(CellPayload),
    Html(String),
}

/// One grid row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub id: String,
    pub cell: Vec<GridCell>,
}

/// Paged listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridResponse {
    pub page: usize,
    /// Number of pages
    pub total: usize,
    /// Number of matching records
    pub records: usize,
    pub rows: Vec<GridRow>,
}

/// Columns shown in the grid, in render order.
pub(crate) fn grid_columns(table: &TableDefinition) -> Vec<&FieldDefinition> {
    order_columns(table)
        .into_iter()
        .filter(|f| f.display_settings.display_in_grid)
        .collect()
}

/// Quick-search clause of a grid request, if it filters at all.
///
/// `searchtype` picks where the value comes from: `fk`, `en` and `dt` read
/// the dedicated select values, `bl` maps the `tru` operator to 1 and
/// anything else to 0.
fn search_condition(table: &TableDefinition, request: &GridRequest) -> Result<Option<Condition>> {
    let field = match request.field.as_deref() {
        None | Some("ALL") => return Ok(None),
        Some(f) => f,
    };
    let raw = match request.search_type.as_deref() {
        Some("fk") => request.fk_value.clone(),
        Some("en") => request.enum_value.clone(),
        Some("dt") => request.date_value.clone(),
        Some("bl") => Some(
            if request.search_option.as_deref() == Some("tru") { "1" } else { "0" }.to_string(),
        ),
        _ => request.value.clone(),
    };
    let Some(value) = raw.filter(|v| v != "ALL") else {
        return Ok(None);
    };

    let member = member_name(field);
    table.get_field(member)?;
    let op = match request.search_type.as_deref() {
        // The boolean value already encodes the operator
        Some("bl") => QuickSearchOp::Eq,
        _ => QuickSearchOp::from_code(request.search_option.as_deref()),
    };
    Ok(Some(build_condition(member, &value, op)))
}

/// `Table.member` names address the member.
fn member_name(field: &str) -> &str {
    field.rsplit_once('.').map_or(field, |(_, member)| member)
}

fn grid_query(table: &TableDefinition, request: &GridRequest) -> Result<(Query, Vec<Condition>)> {
    let conditions: Vec<Condition> = search_condition(table, request)?.into_iter().collect();
    let sort_field = request
        .sort_field
        .as_deref()
        .map(member_name)
        .unwrap_or(table.primary_key.as_str());
    if table.field(sort_field).is_none() {
        return Err(AdminError::FieldNotFound {
            table: table.name.clone(),
            field: sort_field.to_string(),
        });
    }

    let mut query = Query::select(&table.name)
        .order_by(sort_field, SortOrder::parse(request.sort_order.as_deref()))
        .start(request.rows.saturating_mul(request.page - 1))
        .limit(request.rows);
    for condition in &conditions {
        query = query.filter(condition.clone());
    }
    Ok((query, conditions))
}

/// Lists one page of a table.
///
/// # Arguments
/// * `ctx` - Request context
/// * `daos` - Table DAOs
/// * `render` - Render collaborators; `Some` formats cells as markup
/// * `request` - Grid request
pub fn list_grid(
    ctx: &RequestContext,
    daos: &DaoRegistry,
    render: Option<&RenderContext<'_>>,
    request: &GridRequest,
) -> Result<GridResponse> {
    let table = ctx.registry.get(&request.object)?;
    let dao = daos.get(&table.name)?;
    let (query, conditions) = grid_query(table, request)?;

    let records = if conditions.is_empty() {
        dao.count_all()?
    } else {
        dao.count_where(&conditions)?
    };
    let total = if records > 0 {
        records.div_ceil(request.rows)
    } else {
        0
    };

    let columns = grid_columns(table);
    let mut rows = Vec::new();
    for record in dao.get_where(&query)? {
        let id = record
            .get(&table.primary_key)
            .map(value_text)
            .unwrap_or_default();
        let mut cell = Vec::with_capacity(columns.len());
        for field in &columns {
            let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
            let mut payload = CellPayload::new(&table.name, &field.name, value.clone());
            if let Some(fk) = &field.foreign_key {
                if let Some(display) = linked_display(&ctx.registry, daos, &fk.other_table, &value) {
                    payload = payload.with_link(&fk.other_table, value, display);
                }
            }
            cell.push(match render {
                Some(render) => GridCell::Html(format_cell(render, &ctx.registry, &payload)?),
                None => GridCell::Payload(payload),
            });
        }
        rows.push(GridRow { id, cell });
    }
    tracing::debug!(
        "Grid {} page {}: {} of {} records",
        table.name,
        request.page,
        rows.len(),
        records
    );

    Ok(GridResponse {
        page: request.page,
        total,
        records,
        rows,
    })
}

/// Records of one page as newline-delimited JSON.
pub fn list_rest(ctx: &RequestContext, daos: &DaoRegistry, request: &GridRequest) -> Result<String> {
    let table = ctx.registry.get(&request.object)?;
    let (query, _) = grid_query(table, request)?;
    let mut out = String::new();
    for record in daos.get(&table.name)?.get_where(&query)? {
        out.push_str(&serde_json::to_string(&record)?);
        out.push('\n');
    }
    Ok(out)
}
