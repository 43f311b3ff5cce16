//! Foreign key options resolved through the cache and applied to selects.

use std::sync::Arc;

use ntest::timeout;
use serde_json::json;

use admin_core::fk::{FkFetchOutcome, FkOption, FkOptionCache};
use admin_core::render::{build_edit_widget, FormMode, Widget};

use super::helpers::{task_registry, RenderFixture};

#[tokio::test]
#[timeout(5000)]
async fn test_select_fills_after_resolution() {
    let registry = task_registry();
    let fx = RenderFixture::new();
    let task = registry.get("Task").unwrap();
    let field = task.field("projectId").unwrap();

    let first = build_edit_widget(&fx.ctx(), task, field, &json!(2), FormMode::Update);
    let key = first.fk_requests[0].clone();
    let mut select = match first.element.and_then(|e| e.widget().cloned()) {
        Some(Widget::ForeignKey(select)) => select,
        other => panic!("unexpected {:?}", other),
    };
    assert!(select.is_loading());

    let cache = Arc::new(FkOptionCache::new());
    let outcome = cache
        .resolve(&key, || async {
            Ok(vec![FkOption::new("1", "Alpha"), FkOption::new("2", "Beta")])
        })
        .await
        .unwrap();
    let FkFetchOutcome::Resolved(options) = outcome else {
        panic!("fetch was superseded");
    };
    select.apply_options(&options);
    assert_eq!(select.selected.as_deref(), Some("2"));

    let refreshed = cache
        .refresh(&key, || async { Ok(vec![FkOption::new("1", "Alpha")]) })
        .await
        .unwrap();
    let FkFetchOutcome::Resolved(options) = refreshed else {
        panic!("refresh was superseded");
    };
    select.apply_options(&options);
    assert_eq!(select.selected, None);

    let restored = cache
        .refresh(&key, || async {
            Ok(vec![FkOption::new("1", "Alpha"), FkOption::new("2", "Beta")])
        })
        .await
        .unwrap();
    let FkFetchOutcome::Resolved(options) = restored else {
        panic!("refresh was superseded");
    };
    select.apply_options(&options);
    assert_eq!(select.selected.as_deref(), Some("2"));
}
