//! Runtime integration tests
//!
//! Dispatch, grid listing, calendar feed and the worker loop, driven through
//! the request channel the way the HTTP layer drives them.

use std::sync::Arc;
use std::thread;

use admin_core::config::AdminConfig;
use admin_core::error::AdminError;
use admin_core::i18n::Localizer;
use admin_core::render::{build_form, FormMode, HookRegistry, RenderContext};
use admin_core::schema::load_schema_from_str;
use admin_core::submit::FormState;
use admin_runtime::{
    AjaxRequest, ApiHandlers, ApiRequest, CalendarRequest, DaoRegistry, GridRequest, Page,
    PageAction, PageRegistry, Reply, Runtime,
};
use ntest::timeout;
use percent_encoding::percent_decode_str;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

const SCHEMA: &str = r#"{
    "tables": [
        {
            "name": "Project",
            "primaryKey": "id",
            "fkDisplayField": "name",
            "fields": [
                {"name": "id", "type": "int", "displaySettings": {"labels": ["hidden", "pk"]}},
                {"name": "name", "type": "varchar", "displaySettings": {"labels": ["NOT_NULL", "notnull"]}}
            ]
        },
        {
            "name": "Task",
            "primaryKey": "id",
            "fkDisplayField": "title",
            "displaySettings": {"labels": ["calendar"]},
            "fields": [
                {"name": "id", "type": "int", "displaySettings": {"labels": ["hidden", "pk"]}},
                {"name": "title", "type": "varchar",
                 "displaySettings": {"labels": ["NOT_NULL", "notnull", "calendar-title"]}},
                {"name": "priority", "type": "int", "displaySettings": {"labels": ["priority-hml"]}},
                {"name": "done", "type": "boolean", "displaySettings": {"labels": ["calendar-complete"]}},
                {"name": "due", "type": "date", "displaySettings": {"labels": ["calendar-start"]}},
                {"name": "notes", "type": "text",
                 "displaySettings": {"labels": ["calendar-description"], "displayInGrid": false}},
                {"name": "projectId", "type": "int",
                 "foreignKey": {"side": "many", "otherTable": "Project", "otherField": "id", "otherSide": "one"}}
            ]
        }
    ]
}"#;

const SEED: &str = r#"{
    "Project": [{"id": 1, "name": "Apollo"}],
    "Task": [
        {"title": "Fix bug", "priority": 2, "done": 0, "due": "2024-05-01", "projectId": 1},
        {"title": "Write docs", "priority": 0, "done": 1, "due": "2024-05-02", "notes": "api"},
        {"title": "Fix build", "priority": 1, "done": 0, "due": "2024-05-03"}
    ]
}"#;

fn handlers_with(config: AdminConfig, pages: PageRegistry) -> ApiHandlers {
    let registry = Arc::new(load_schema_from_str(SCHEMA).unwrap());
    let daos = DaoRegistry::in_memory(&registry);
    daos.seed_from_json(SEED).unwrap();
    ApiHandlers::new(registry, daos, Localizer::default(), config).with_pages(pages)
}

fn handlers() -> ApiHandlers {
    handlers_with(AdminConfig::default(), PageRegistry::new())
}

fn params(pairs: &[(&str, &str)]) -> admin_runtime::Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ajax(pairs: &[(&str, &str)]) -> AjaxRequest {
    AjaxRequest::from_params(params(pairs)).unwrap()
}

fn json_of(reply: Reply) -> Value {
    reply.as_json().cloned().expect("json reply")
}

/// Test requests queued on the channel are answered in order
#[tokio::test]
#[timeout(5000)]
async fn test_runtime_processes_queued_requests() {
    let (api_tx, api_rx) = mpsc::channel(16);
    let mut runtime = Runtime::new(handlers(), api_rx);

    let (create_tx, create_rx) = oneshot::channel();
    api_tx
        .send(ApiRequest::Ajax {
            request: ajax(&[("jackaction", "create"), ("object", "Task"), ("title", "Ship it")]),
            response: create_tx,
        })
        .await
        .unwrap();
    let (grid_tx, grid_rx) = oneshot::channel();
    api_tx
        .send(ApiRequest::Grid {
            request: GridRequest::from_params(&params(&[("object", "Task")]), 50).unwrap(),
            response: grid_tx,
        })
        .await
        .unwrap();

    assert_eq!(runtime.process_pending().await.unwrap(), 2);
    assert_eq!(runtime.processed(), 2);

    let created = json_of(create_rx.await.unwrap().unwrap());
    assert_eq!(created["result"], json!(1));
    assert_eq!(created["operationResults"][0]["id"], json!("4"));

    let grid = json_of(grid_rx.await.unwrap().unwrap());
    assert_eq!(grid["records"], json!(4));
}

/// Test the blocking worker stops once every sender is gone
#[test]
#[timeout(5000)]
fn test_runtime_run_on_own_thread() {
    let (api_tx, api_rx) = mpsc::channel(16);
    let worker = thread::spawn(move || {
        let mut runtime = Runtime::new(handlers(), api_rx);
        runtime.run().map(|()| runtime.processed())
    });

    let (tx, rx) = oneshot::channel();
    api_tx
        .blocking_send(ApiRequest::ListTables { response: tx })
        .unwrap();
    let tables = rx.blocking_recv().unwrap().unwrap();
    assert_eq!(tables.as_json(), Some(&json!(["Project", "Task"])));

    drop(api_tx);
    assert_eq!(worker.join().unwrap().unwrap(), 1);
}

#[tokio::test]
#[timeout(5000)]
async fn test_dispatch_rejects_unknown_action_and_table() {
    let handlers = handlers();

    let err = handlers
        .dispatch(&ajax(&[("jackaction", "Explode"), ("object", "Task")]))
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::UnknownAction("Explode".to_string()));

    let err = handlers
        .dispatch(&ajax(&[("jackaction", "create"), ("object", "Nope")]))
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::TableNotFound { table: "Nope".to_string() });

    let err = handlers
        .dispatch(&ajax(&[("jackaction", "Manager")]))
        .await
        .unwrap_err();
    assert_eq!(err, AdminError::MissingObject("Manager".to_string()));
}

#[tokio::test]
#[timeout(5000)]
async fn test_anonymous_requests_refused_when_auth_required() {
    let config = AdminConfig {
        require_auth: true,
        ..AdminConfig::default()
    };
    let handlers = handlers_with(config, PageRegistry::new());
    let request = ajax(&[("jackaction", "home")]);

    assert_eq!(
        handlers.dispatch(&request).await.unwrap_err(),
        AdminError::Unauthenticated
    );
    let reply = handlers.dispatch(&request.with_user("admin")).await.unwrap();
    assert!(reply.into_body().contains("jackaction=Manager&amp;object=Task"));
}

#[tokio::test]
#[timeout(5000)]
async fn test_create_without_required_field_fails() {
    let handlers = handlers();
    let reply = handlers
        .dispatch(&ajax(&[("jackaction", "create"), ("object", "Task"), ("priority", "1")]))
        .await
        .unwrap();
    let result = json_of(reply);
    assert_eq!(result["result"], json!(-1));
    assert_eq!(
        handlers.daos().get("Task").unwrap().count_all().unwrap(),
        3
    );
}

#[tokio::test]
#[timeout(5000)]
async fn test_update_page_fills_fk_select_and_refreshes_after_change() {
    let handlers = handlers();
    let update = ajax(&[("jackaction", "Update"), ("object", "Task"), ("id", "1")]);

    let html = handlers.dispatch(&update).await.unwrap().into_body();
    assert!(html.contains(r#"<input type="hidden" name="id" value="1" />"#));
    assert!(html.contains(">Apollo<"));
    assert!(!html.contains("Loading list please wait..."));

    let created = handlers
        .dispatch(&ajax(&[("jackaction", "create"), ("object", "Project"), ("name", "Gemini")]))
        .await
        .unwrap();
    assert_eq!(json_of(created)["result"], json!(1));

    let html = handlers.dispatch(&update).await.unwrap().into_body();
    assert!(html.contains(">Gemini<"));
}

#[tokio::test]
#[timeout(5000)]
async fn test_view_page_shows_linked_record() {
    let handlers = handlers();
    let html = handlers
        .dispatch(&ajax(&[("jackaction", "View"), ("object", "Task"), ("id", "1")]))
        .await
        .unwrap()
        .into_body();
    assert!(html.starts_with(r#"<div class="jack-view" id="Task-view">"#));
    assert!(html.contains("Fix bug"));
    assert!(html.contains("Apollo"));
}

#[tokio::test]
#[timeout(5000)]
async fn test_manager_column_model_and_fk_data() {
    let handlers = handlers();
    let model = json_of(
        handlers
            .dispatch(&ajax(&[("jackaction", "Manager"), ("object", "Task")]))
            .await
            .unwrap(),
    );
    let names: Vec<&str> = model["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["id", "title", "priority", "done", "due", "projectId"]);
    assert_eq!(model["columns"][5]["searchType"], json!("fk"));
    assert_eq!(model["columns"][3]["searchType"], json!("bl"));

    let options = json_of(
        handlers
            .dispatch(&ajax(&[("jackaction", "FkData"), ("object", "Project")]))
            .await
            .unwrap(),
    );
    assert_eq!(options, json!([{"id": "1", "val": "Apollo"}]));
}

#[tokio::test]
#[timeout(5000)]
async fn test_declared_page_overrides_generic() {
    let mut pages = PageRegistry::new();
    pages.register(
        "Task",
        PageAction::Send,
        |page: &Page<'_>, request: &AjaxRequest| -> admin_runtime::Result<Reply> {
            Ok(Reply::Text(format!(
                "sent {} {}",
                page.table.name,
                request.param("id").unwrap_or_default()
            )))
        },
    );
    let handlers = handlers_with(AdminConfig::default(), pages);

    let reply = handlers
        .dispatch(&ajax(&[("jackaction", "Send"), ("object", "Task"), ("id", "2")]))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Text("sent Task 2".to_string()));

    let err = handlers
        .dispatch(&ajax(&[("jackaction", "Upload"), ("object", "Task")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::HandlerNotDeclared { .. }));
}

#[tokio::test]
#[timeout(5000)]
async fn test_textarea_wrapping() {
    let handlers = handlers();
    let reply = handlers
        .dispatch(&ajax(&[
            ("jackaction", "delete"),
            ("object", "Task"),
            ("id", "3"),
            ("wta", "1"),
        ]))
        .await
        .unwrap();
    let body = reply.into_body();
    assert!(body.starts_with("<textarea>{"));
    assert!(body.ends_with("}</textarea>"));
    assert!(body.contains(r#""result":1"#));
}

#[tokio::test]
#[timeout(5000)]
async fn test_delete_multiple_reports_deleted_ids() {
    let handlers = handlers();
    let result = json_of(
        handlers
            .dispatch(&ajax(&[("action", "deleteMultiple"), ("object", "Task"), ("ids", "1,3")]))
            .await
            .unwrap(),
    );
    assert_eq!(result["result"], json!(1));
    assert_eq!(result["operationResults"][0]["id"], json!("1"));
    assert_eq!(result["operationResults"][1]["id"], json!("3"));
    assert_eq!(handlers.daos().get("Task").unwrap().count_all().unwrap(), 1);
}

async fn grid(handlers: &ApiHandlers, pairs: &[(&str, &str)]) -> Value {
    let (tx, rx) = oneshot::channel();
    let request = GridRequest::from_params(&params(pairs), 50).unwrap();
    handlers
        .handle_api_request(ApiRequest::Grid { request, response: tx })
        .await
        .unwrap();
    json_of(rx.await.unwrap().unwrap())
}

#[tokio::test]
#[timeout(5000)]
async fn test_grid_paginates() {
    let handlers = handlers();
    let page = grid(&handlers, &[("object", "Task"), ("rows", "2"), ("page", "2")]).await;
    assert_eq!(page["page"], json!(2));
    assert_eq!(page["total"], json!(2));
    assert_eq!(page["records"], json!(3));
    assert_eq!(page["rows"].as_array().unwrap().len(), 1);
    assert_eq!(page["rows"][0]["id"], json!("3"));
}

#[tokio::test]
#[timeout(5000)]
async fn test_grid_quick_search() {
    let handlers = handlers();

    let found = grid(
        &handlers,
        &[("object", "Task"), ("field", "Task.title"), ("value", "fix"), ("searchoption", "cnt"), ("sord", "desc")],
    )
    .await;
    assert_eq!(found["records"], json!(2));
    assert_eq!(found["rows"][0]["cell"][1]["val"], json!("Fix build"));

    let done = grid(
        &handlers,
        &[("object", "Task"), ("field", "done"), ("searchtype", "bl"), ("searchoption", "tru")],
    )
    .await;
    assert_eq!(done["records"], json!(1));
    assert_eq!(done["rows"][0]["id"], json!("2"));

    let all = grid(&handlers, &[("object", "Task"), ("field", "ALL"), ("value", "ALL")]).await;
    assert_eq!(all["records"], json!(3));

    let none = grid(&handlers, &[("object", "Task"), ("field", "title"), ("value", "zzz")]).await;
    assert_eq!(none["total"], json!(0));
}

#[tokio::test]
#[timeout(5000)]
async fn test_grid_cells_link_foreign_rows() {
    let handlers = handlers();
    let page = grid(&handlers, &[("object", "Task"), ("rows", "1")]).await;
    let fk_cell = &page["rows"][0]["cell"][5];
    assert_eq!(fk_cell["otbl"], json!("Project"));
    assert_eq!(fk_cell["dval"], json!("Apollo"));

    let formatted = grid(&handlers, &[("object", "Task"), ("rows", "1"), ("format", "html")]).await;
    let cells = formatted["rows"][0]["cell"].as_array().unwrap();
    assert_eq!(cells[1], json!("Fix bug"));
    assert_eq!(cells[2], json!(r#"<span class="jack-ui-priority-high">High</span>"#));
    assert!(cells[5].as_str().unwrap().starts_with(r#"<a class="aunderline""#));
}

#[tokio::test]
#[timeout(5000)]
async fn test_rest_lists_records_line_by_line() {
    let handlers = handlers();
    let (tx, rx) = oneshot::channel();
    let request = GridRequest::from_params(&params(&[("object", "Project")]), 50).unwrap();
    handlers
        .handle_api_request(ApiRequest::Rest { request, response: tx })
        .await
        .unwrap();
    let body = rx.await.unwrap().unwrap().into_body();
    assert_eq!(body, "{\"id\":1,\"name\":\"Apollo\"}\n");
}

#[tokio::test]
#[timeout(5000)]
async fn test_calendar_entries_carry_completion_prefixes() {
    let handlers = handlers();
    let (tx, rx) = oneshot::channel();
    handlers
        .handle_api_request(ApiRequest::Calendar {
            request: CalendarRequest::from_params(&params(&[("object", "ALL")])),
            response: tx,
        })
        .await
        .unwrap();
    let entries = json_of(rx.await.unwrap().unwrap());
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0]["title"], json!("PENDING: Fix bug"));
    assert_eq!(entries[0]["start"], json!("2024-05-01"));
    assert_eq!(entries[0]["className"], json!("cal-Task jack-cal-incomplete"));
    assert!(entries[0].get("description").is_none());

    assert_eq!(entries[1]["title"], json!("COMPLETE:Write docs"));
    assert_eq!(entries[1]["className"], json!("cal-Task jack-cal-complete"));
    assert_eq!(entries[1]["description"], json!("api"));
    assert_eq!(entries[1]["url"], json!("ajax?jackaction=Update&object=Task&id=2"));

    // Non-calendar tables named explicitly contribute nothing
    let (tx, rx) = oneshot::channel();
    handlers
        .handle_api_request(ApiRequest::Calendar {
            request: CalendarRequest::from_params(&params(&[("object", "Project")])),
            response: tx,
        })
        .await
        .unwrap();
    assert_eq!(json_of(rx.await.unwrap().unwrap()), json!([]));
}

const ACCOUNT_SCHEMA: &str = r#"{
    "tables": [{
        "name": "Account",
        "primaryKey": "id",
        "fkDisplayField": "login",
        "fields": [
            {"name": "id", "type": "int", "displaySettings": {"labels": ["hidden", "pk"]}},
            {"name": "login", "type": "varchar", "displaySettings": {"labels": ["NOT_NULL", "notnull"]}},
            {"name": "secret", "type": "varchar", "displaySettings": {"labels": ["pwd"]}},
            {"name": "token", "type": "varchar", "displaySettings": {"labels": ["hidden"]}}
        ]
    }]
}"#;

/// Decodes a form-encoded submission into request parameters.
fn decode_form(body: &str) -> admin_runtime::Params {
    let decode = |raw: &str| percent_decode_str(raw).decode_utf8_lossy().into_owned();
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (decode(k), decode(v)))
        .collect()
}

/// Renders the Update form of a stored account, submits it with `edits`
/// and dispatches the encoded body.
async fn save_update_form(handlers: &ApiHandlers, edits: &[(&str, &str)]) -> Value {
    let config = AdminConfig::default();
    let localizer = Localizer::default();
    let hooks = HookRegistry::new();
    let render = RenderContext::new(&config, &localizer, &hooks);

    let stored = handlers.daos().get("Account").unwrap().get("1").unwrap();
    let table = handlers.registry().get("Account").unwrap();
    let form = build_form(&render, table, Some(&stored), FormMode::Update).unwrap();
    let mut state = FormState::new(&form);
    for (name, value) in edits {
        state.set(*name, *value);
    }
    let body = state.prepare_submission().unwrap();
    assert!(body.contains("secret="));
    assert!(body.contains("token="));

    let request = AjaxRequest::from_params(decode_form(&body)).unwrap();
    json_of(handlers.dispatch(&request).await.unwrap())
}

/// Test saving an Update form keeps password and hidden columns it sends blank
#[tokio::test]
#[timeout(5000)]
async fn test_update_form_round_trip_keeps_blank_secret_fields() {
    let registry = Arc::new(load_schema_from_str(ACCOUNT_SCHEMA).unwrap());
    let daos = DaoRegistry::in_memory(&registry);
    daos.seed_from_json(
        r#"{"Account": [{"id": 1, "login": "ann", "secret": "hunter2", "token": "abc"}]}"#,
    )
    .unwrap();
    let handlers = ApiHandlers::new(registry, daos, Localizer::default(), AdminConfig::default());

    let result = save_update_form(&handlers, &[("login", "anne")]).await;
    assert_eq!(result["result"], json!(1));
    let row = handlers.daos().get("Account").unwrap().get("1").unwrap();
    assert_eq!(row["login"], json!("anne"));
    assert_eq!(row["secret"], json!("hunter2"));
    assert_eq!(row["token"], json!("abc"));

    // A typed password still replaces the stored one
    let result = save_update_form(&handlers, &[("secret", "s3cret")]).await;
    assert_eq!(result["result"], json!(1));
    let row = handlers.daos().get("Account").unwrap().get("1").unwrap();
    assert_eq!(row["secret"], json!("s3cret"));
    assert_eq!(row["token"], json!("abc"));
}
