//! Task table scenarios: grid cells, edit widgets and create submission.

use serde_json::json;

use admin_core::record::Record;
use admin_core::render::{
    build_edit_widget, build_form, format_cell, CellPayload, FormMode, ValidationTag, Widget,
};
use admin_core::submit::{FieldViolation, FormState};

use super::helpers::{task_registry, RenderFixture};

#[test]
fn test_task_grid_row() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let ctx = fx.ctx();

    let row = [("title", json!("Fix bug")), ("priority", json!(2)), ("done", json!(0))];
    let cells: Vec<String> = row
        .into_iter()
        .map(|(member, value)| {
            format_cell(&ctx, &registry, &CellPayload::new("Task", member, value)).unwrap()
        })
        .collect();

    assert_eq!(cells[0], "Fix bug");
    assert_eq!(cells[1], r#"<span class="jack-ui-priority-high">High</span>"#);
    assert_eq!(cells[2], r#"<img src="images/disabled.png" />"#);
}

#[test]
fn test_priority_badges() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let ctx = fx.ctx();
    let badge = |v| format_cell(&ctx, &registry, &CellPayload::new("Task", "priority", v)).unwrap();

    assert!(badge(json!(0)).contains(">Low<"));
    assert!(badge(json!(1)).contains(">Medium<"));
    assert!(badge(json!(2)).contains(">High<"));
    assert_eq!(badge(json!(5)), "-");
}

#[test]
fn test_enum_and_boolean_edit_widgets() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let task = registry.get("Task").unwrap();

    let state = task.field("state").unwrap();
    let outcome = build_edit_widget(&fx.ctx(), task, state, &json!("B"), FormMode::Update);
    match outcome.element.as_ref().and_then(|e| e.widget()) {
        Some(Widget::Select(group)) => {
            assert_eq!(group.values(), vec!["A", "B", "C"]);
            assert_eq!(group.selected(), Some("B"));
        }
        other => panic!("unexpected {:?}", other),
    }

    let done = task.field("done").unwrap();
    for (value, expected) in [(json!("0"), Some("0")), (json!("1"), Some("1")), (json!("2"), None)] {
        let outcome = build_edit_widget(&fx.ctx(), task, done, &value, FormMode::Update);
        match outcome.element.as_ref().and_then(|e| e.widget()) {
            Some(Widget::Radio(group)) => assert_eq!(group.selected(), expected),
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn test_create_without_required_field_never_encodes() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let task = registry.get("Task").unwrap();
    let form = build_form(&fx.ctx(), task, None, FormMode::Create).unwrap();

    let title_widget = form
        .fields
        .elements
        .iter()
        .filter_map(|e| e.widget())
        .find(|w| w.name() == "title")
        .unwrap();
    assert!(title_widget.has_tag(ValidationTag::Required));

    let mut state = FormState::new(&form);
    state.set("done", "1");
    let err = state.prepare_submission().unwrap_err();
    assert!(err.errors().iter().any(|e| e.field == "title"
        && e.violation == FieldViolation::Tag(ValidationTag::Required)));
}

#[test]
fn test_update_form_round_trip() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let task = registry.get("Task").unwrap();

    let mut record = Record::new();
    record.insert("id".to_string(), json!(9));
    record.insert("title".to_string(), json!("Fix bug"));
    record.insert("priority".to_string(), json!(2));
    record.insert("done".to_string(), json!(0));
    record.insert("state".to_string(), json!("A"));

    let form = build_form(&fx.ctx(), task, Some(&record), FormMode::Update).unwrap();
    assert_eq!(form.fields.fk_requests.len(), 1);
    let body = FormState::new(&form).prepare_submission().unwrap();
    assert!(body.starts_with("jackaction=update&object=Task&id=9"));
    assert!(body.contains("title=Fix%20bug"));
    assert!(body.contains("priority=2"));
    assert!(body.contains("done=0"));
}
