//! Generic DAO-backed CRUD actions.
//!
//! Failures of the action itself are answered as a [`RequestResult`] with a
//! negative code and the error text. Only errors that make the request
//! unanswerable (unknown table) propagate as `Err`.

use admin_core::display::Label;
use admin_core::error::AdminError;
use admin_core::record::{is_blank, value_text};
use admin_core::table::TableDefinition;
use admin_core::types::FieldType;
use admin_core::Record;
use serde_json::Value;

use crate::api_request::{AjaxRequest, CrudAction};
use crate::context::RequestContext;
use crate::dao::{DaoRegistry, TableDao};
use crate::result::{OperationResult, RequestResult, ResultCode};
use crate::Result;

/// Runs a CRUD action against `table`.
pub(crate) fn handle_crud(
    ctx: &RequestContext,
    daos: &DaoRegistry,
    table: &TableDefinition,
    action: CrudAction,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let dao = daos.get(&table.name)?;
    tracing::debug!("CRUD {} on {}", action.as_str(), table.name);

    let result = match action {
        CrudAction::Create => create(ctx, dao.as_ref(), table, request),
        CrudAction::Read => read(ctx, dao.as_ref(), table, request),
        CrudAction::Update | CrudAction::QuickEditUpdate => update(ctx, dao.as_ref(), table, request),
        CrudAction::Delete => delete(ctx, dao.as_ref(), table, request),
        CrudAction::DeleteMultiple => delete_multiple(ctx, dao.as_ref(), table, request),
    };
    Ok(result.unwrap_or_else(|e| {
        tracing::warn!("{} on {} failed: {}", action.as_str(), table.name, e);
        RequestResult::failed(e.to_string())
    }))
}

fn create(
    ctx: &RequestContext,
    dao: &dyn TableDao,
    table: &TableDefinition,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let mut record = record_from_params(table, request)?;
    for field in table.fields.values() {
        if record.contains_key(&field.name) {
            continue;
        }
        if field.has_label(&Label::CreationDbCreate) {
            record.insert(
                field.name.clone(),
                Value::from(chrono::Local::now().format(creation_format(field.field_type)).to_string()),
            );
        } else if let Some(default) = &field.default_value {
            record.insert(field.name.clone(), default.clone());
        }
    }
    if let Some(message) = missing_required(ctx, table, &record, true) {
        return Ok(RequestResult::failed(message));
    }

    let stored = dao.insert(record)?;
    let id = stored
        .get(&table.primary_key)
        .map(value_text)
        .unwrap_or_default();
    tracing::info!("Created {} {}", table.name, id);
    let message = ctx.message(
        &format!("Tbl_{}__created", table.name),
        &format!("{} created.", table.name),
    );
    Ok(RequestResult::passed(message.clone()).with_operation(
        OperationResult::passed(id, message).with_content(serde_json::to_string(&stored)?),
    ))
}

fn read(
    _ctx: &RequestContext,
    dao: &dyn TableDao,
    table: &TableDefinition,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let id = required_id(request)?;
    let record = dao.get(id)?;
    tracing::debug!("Read {} {}", table.name, id);
    Ok(RequestResult::passed(String::new()).with_operation(
        OperationResult::passed(id, String::new()).with_content(serde_json::to_string(&record)?),
    ))
}

fn update(
    ctx: &RequestContext,
    dao: &dyn TableDao,
    table: &TableDefinition,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let id = required_id(request)?;
    let mut values = record_from_params(table, request)?;
    // Edit forms send these fields blank; a blank value keeps the stored one
    values.retain(|name, value| {
        !(is_blank(value)
            && table
                .field(name)
                .is_some_and(|f| f.has_label(&Label::Password) || f.has_label(&Label::Hidden)))
    });
    if let Some(message) = missing_required(ctx, table, &values, false) {
        return Ok(RequestResult::failed(message));
    }

    let stored = dao.update(id, values)?;
    tracing::info!("Updated {} {}", table.name, id);
    let message = ctx.message(
        &format!("Tbl_{}__updated", table.name),
        &format!("{} updated.", table.name),
    );
    Ok(RequestResult::passed(message.clone()).with_operation(
        OperationResult::passed(id, message).with_content(serde_json::to_string(&stored)?),
    ))
}

fn delete(
    ctx: &RequestContext,
    dao: &dyn TableDao,
    table: &TableDefinition,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let id = required_id(request)?;
    dao.delete(id)?;
    tracing::info!("Deleted {} {}", table.name, id);
    let message = ctx.message(
        &format!("Tbl_{}__deleted", table.name),
        &format!("{} deleted.", table.name),
    );
    Ok(RequestResult::passed(message.clone()).with_operation(OperationResult::passed(id, message)))
}

/// Deletes every id of the comma separated `ids` parameter. Each id gets
/// its own operation result; the overall code is passed, partial or
/// failed by how many succeeded.
fn delete_multiple(
    ctx: &RequestContext,
    dao: &dyn TableDao,
    table: &TableDefinition,
    request: &AjaxRequest,
) -> Result<RequestResult> {
    let ids: Vec<&str> = request
        .param("ids")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(AdminError::InvalidParameter {
            name: "ids".to_string(),
            reason: "no ids given".to_string(),
        });
    }

    let operations: Vec<OperationResult> = ids
        .iter()
        .map(|id| match dao.delete(id) {
            Ok(()) => OperationResult::passed(*id, format!("Deleted {}", id)),
            Err(e) => {
                tracing::warn!("Failed to delete {} {}: {}", table.name, id, e);
                OperationResult::failed(Some(id.to_string()), e.to_string(), "DELETE_FAILED")
            }
        })
        .collect();
    let passed = operations
        .iter()
        .filter(|o| o.result == ResultCode::Passed)
        .count();
    tracing::info!("Deleted {} of {} {} records", passed, ids.len(), table.name);

    let message = match ResultCode::combine(passed, ids.len()) {
        ResultCode::Passed => ctx.message("Items deleted.", "Items deleted."),
        _ => format!("Deleted {} of {} items.", passed, ids.len()),
    };
    Ok(RequestResult {
        result: ResultCode::combine(passed, ids.len()),
        display_message: message,
        operation_results: operations,
    })
}

fn required_id(request: &AjaxRequest) -> Result<&str> {
    request
        .param("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AdminError::InvalidParameter {
            name: "id".to_string(),
            reason: "no id given".to_string(),
        })
}

/// Message naming the first required field left blank, if any.
///
/// # Arguments
/// * `all_fields` - Also report required fields absent from `record`
fn missing_required(
    ctx: &RequestContext,
    table: &TableDefinition,
    record: &Record,
    all_fields: bool,
) -> Option<String> {
    table
        .fields
        .values()
        .filter(|f| f.is_required() && f.name != table.primary_key)
        .find(|f| match record.get(&f.name) {
            Some(value) => is_blank(value),
            None => all_fields,
        })
        .map(|f| {
            format!(
                "{} {}",
                ctx.localizer.field_label(&table.name, &f.name),
                ctx.message("is required.", "is required.")
            )
        })
}

/// Typed values of the table's fields present in the request.
fn record_from_params(table: &TableDefinition, request: &AjaxRequest) -> Result<Record> {
    let mut record = Record::new();
    for field in table.fields.values() {
        let Some(raw) = request.param(&field.name) else {
            continue;
        };
        record.insert(field.name.clone(), typed_value(table, &field.name, field.field_type, raw)?);
    }
    Ok(record)
}

fn typed_value(table: &TableDefinition, name: &str, field_type: FieldType, raw: &str) -> Result<Value> {
    let invalid = |reason: String| AdminError::InvalidParameter {
        name: format!("{}.{}", table.name, name),
        reason,
    };
    if field_type.is_text() {
        return Ok(Value::from(raw));
    }
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match field_type {
        FieldType::Boolean => match raw {
            "1" | "true" => Ok(Value::from(1)),
            "0" | "false" => Ok(Value::from(0)),
            other => Err(invalid(format!("'{}' is not a boolean", other))),
        },
        t if t.is_integer() => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(e.to_string())),
        FieldType::Decimal => raw
            .parse::<f64>()
            .map(Value::from)
            .map_err(|e| invalid(e.to_string())),
        _ => Ok(Value::from(raw)),
    }
}

fn creation_format(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Date => "%Y-%m-%d",
        _ => "%Y-%m-%d %H:%M:%S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_request::Params;
    use admin_core::config::AdminConfig;
    use admin_core::display::DisplaySettings;
    use admin_core::i18n::Localizer;
    use admin_core::registry::TableRegistry;
    use admin_core::table::FieldDefinition;
    use serde_json::json;
    use std::sync::Arc;

    fn table() -> TableDefinition {
        TableDefinition::new("Task", "id", "title", DisplaySettings::default())
            .with_field(FieldDefinition::new("id", FieldType::Int).with_label("pk"))
            .unwrap()
            .with_field(
                FieldDefinition::new("title", FieldType::Varchar)
                    .with_label("NOT_NULL")
                    .not_null(),
            )
            .unwrap()
            .with_field(FieldDefinition::new("done", FieldType::Boolean).with_default(0))
            .unwrap()
            .with_field(FieldDefinition::new("created", FieldType::DateTime).with_label("creation-dbcreate"))
            .unwrap()
    }

    fn fixture() -> (RequestContext, DaoRegistry, TableDefinition) {
        let mut registry = TableRegistry::new();
        registry.register(table()).unwrap();
        let daos = DaoRegistry::in_memory(&registry);
        let ctx = RequestContext::new(
            None,
            None,
            &Localizer::default(),
            Arc::new(registry),
            Arc::new(AdminConfig::default()),
        )
        .unwrap();
        (ctx, daos, table())
    }

    fn request(pairs: &[(&str, &str)]) -> AjaxRequest {
        let params: Params = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AjaxRequest::from_params(params).unwrap()
    }

    #[test]
    fn test_create_applies_defaults() {
        let (ctx, daos, table) = fixture();
        let req = request(&[("jackaction", "create"), ("object", "Task"), ("title", "Fix bug")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::Create, &req).unwrap();
        assert!(result.is_passed());
        assert_eq!(result.operation_results[0].id.as_deref(), Some("1"));

        let stored = daos.get("Task").unwrap().get("1").unwrap();
        assert_eq!(stored["done"], json!(0));
        assert!(stored["created"].as_str().is_some_and(|s| s.len() == 19));
    }

    #[test]
    fn test_create_rejects_missing_required() {
        let (ctx, daos, table) = fixture();
        let req = request(&[("jackaction", "create"), ("object", "Task"), ("title", " ")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::Create, &req).unwrap();
        assert_eq!(result.result, ResultCode::Failed);
        assert!(result.display_message.contains("Tbl_Task_title"));
        assert_eq!(daos.get("Task").unwrap().count_all().unwrap(), 0);
    }

    #[test]
    fn test_update_and_bad_values() {
        let (ctx, daos, table) = fixture();
        daos.get("Task")
            .unwrap()
            .insert(Record::from_iter([("title".to_string(), json!("a"))]))
            .unwrap();

        let req = request(&[("jackaction", "update"), ("id", "1"), ("done", "1")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::Update, &req).unwrap();
        assert!(result.is_passed());
        assert_eq!(daos.get("Task").unwrap().get("1").unwrap()["done"], json!(1));

        let req = request(&[("jackaction", "update"), ("id", "1"), ("done", "maybe")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::Update, &req).unwrap();
        assert_eq!(result.result, ResultCode::Failed);

        let req = request(&[("jackaction", "update"), ("id", "7"), ("title", "x")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::Update, &req).unwrap();
        assert_eq!(result.display_message, "Record '7' not found in table 'Task'");
    }

    #[test]
    fn test_delete_multiple_partial() {
        let (ctx, daos, table) = fixture();
        let dao = daos.get("Task").unwrap();
        for title in ["a", "b"] {
            dao.insert(Record::from_iter([("title".to_string(), json!(title))]))
                .unwrap();
        }

        let req = request(&[("action", "deleteMultiple"), ("object", "Task"), ("ids", "1,9,2")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::DeleteMultiple, &req).unwrap();
        assert_eq!(result.result, ResultCode::PartialFailure);
        let passed: Vec<_> = result
            .operation_results
            .iter()
            .filter(|o| o.result == ResultCode::Passed)
            .filter_map(|o| o.id.as_deref())
            .collect();
        assert_eq!(passed, vec!["1", "2"]);
        assert_eq!(dao.count_all().unwrap(), 0);

        let req = request(&[("action", "deleteMultiple"), ("ids", "")]);
        let result = handle_crud(&ctx, &daos, &table, CrudAction::DeleteMultiple, &req).unwrap();
        assert_eq!(result.result, ResultCode::Failed);
    }
}
