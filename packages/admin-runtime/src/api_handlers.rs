//! API request handlers

use std::sync::Arc;

use admin_core::config::AdminConfig;
use admin_core::error::AdminError;
use admin_core::fk::{FkFetchOutcome, FkKey, FkOptionCache};
use admin_core::i18n::Localizer;
use admin_core::registry::TableRegistry;
use admin_core::render::{HookRegistry, RenderContext};
use admin_core::table::TableDefinition;

use crate::api_request::{Action, AjaxRequest, ApiRequest, CrudAction, PageAction};
use crate::calendar::calendar_entries;
use crate::context::RequestContext;
use crate::crud::handle_crud;
use crate::dao::DaoRegistry;
use crate::grid::{list_grid, list_rest};
use crate::options::fk_options;
use crate::pages::{global_page, Page, PageRegistry};
use crate::reply::Reply;
use crate::result::ResultCode;
use crate::Result;

/// API request handlers
pub struct ApiHandlers {
    /// Table definitions
    registry: Arc<TableRegistry>,
    /// Table DAOs
    daos: DaoRegistry,
    /// Declared page handlers
    pages: PageRegistry,
    /// Dictionaries in the default language
    localizer: Localizer,
    /// Configuration
    config: Arc<AdminConfig>,
    /// Named build hooks
    hooks: HookRegistry,
    /// FK option lists shared by every form
    fk_cache: FkOptionCache,
}

impl ApiHandlers {
    /// Create new API handlers
    pub fn new(
        registry: Arc<TableRegistry>,
        daos: DaoRegistry,
        localizer: Localizer,
        config: AdminConfig,
    ) -> Self {
        Self {
            registry,
            daos,
            pages: PageRegistry::new(),
            localizer,
            config: Arc::new(config),
            hooks: HookRegistry::new(),
            fk_cache: FkOptionCache::new(),
        }
    }

    /// Replaces the declared page handlers
    pub fn with_pages(mut self, pages: PageRegistry) -> Self {
        self.pages = pages;
        self
    }

    /// Replaces the build hooks
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.registry
    }

    pub fn daos(&self) -> &DaoRegistry {
        &self.daos
    }

    pub fn fk_cache(&self) -> &FkOptionCache {
        &self.fk_cache
    }

    fn context(&self, user: Option<String>, language: Option<&str>) -> Result<RequestContext> {
        RequestContext::new(
            user,
            language,
            &self.localizer,
            Arc::clone(&self.registry),
            Arc::clone(&self.config),
        )
    }

    /// Handle API request
    pub async fn handle_api_request(&self, req: ApiRequest) -> Result<()> {
        match req {
            ApiRequest::Ajax { request, response } => {
                let result = self.dispatch(&request).await;
                if let Err(e) = &result {
                    tracing::warn!("{} on {:?} failed: {}", request.action, request.object, e);
                }
                let _ = response.send(result);
                Ok(())
            }
            ApiRequest::Grid { request, response } => {
                let result = self.context(request.user.clone(), None).and_then(|ctx| {
                    let render = RenderContext::new(&ctx.config, &ctx.localizer, &self.hooks);
                    let formatted = request.formatted.then_some(&render);
                    let grid = list_grid(&ctx, &self.daos, formatted, &request)?;
                    Ok(Reply::Json(serde_json::to_value(grid)?))
                });
                let _ = response.send(result);
                Ok(())
            }
            ApiRequest::Rest { request, response } => {
                let result = self
                    .context(request.user.clone(), None)
                    .and_then(|ctx| list_rest(&ctx, &self.daos, &request))
                    .map(Reply::Text);
                let _ = response.send(result);
                Ok(())
            }
            ApiRequest::Calendar { request, response } => {
                let result = self.context(request.user.clone(), None).and_then(|ctx| {
                    let entries = calendar_entries(&ctx, &self.daos, &request)?;
                    Ok(Reply::Json(serde_json::to_value(entries)?))
                });
                let _ = response.send(result);
                Ok(())
            }
            ApiRequest::ListTables { response } => {
                let result = Ok(Reply::Json(serde_json::Value::from(
                    self.registry.table_names(),
                )));
                let _ = response.send(result);
                Ok(())
            }
            ApiRequest::GetTable { name, response } => {
                let result = self
                    .registry
                    .get(&name)
                    .and_then(|table| Ok(Reply::Json(serde_json::to_value(table)?)));
                let _ = response.send(result);
                Ok(())
            }
        }
    }

    /// Dispatches `(object, action)`.
    ///
    /// # Returns
    /// `Err(AdminError::UnknownAction)` for names outside the action set,
    /// `Err(AdminError::MissingObject | TableNotFound)` when a table action
    /// names no registered table.
    pub async fn dispatch(&self, request: &AjaxRequest) -> Result<Reply> {
        let ctx = self.context(request.user.clone(), request.language.as_deref())?;
        let action = Action::parse(&request.action)?;
        tracing::debug!("Dispatching {} on {:?}", action, request.object);

        let reply = match action {
            Action::Global(global) => global_page(&ctx, &self.daos, global)?,
            Action::Page(page_action) => {
                let table = self.target_table(request, action)?;
                if matches!(page_action, PageAction::Create | PageAction::Update) {
                    self.resolve_fk_options(table).await;
                }
                let page = Page {
                    ctx: &ctx,
                    table,
                    daos: &self.daos,
                    render: RenderContext::new(&ctx.config, &ctx.localizer, &self.hooks)
                        .with_fk_cache(&self.fk_cache),
                };
                self.pages.dispatch(&page, page_action, request)?
            }
            Action::Crud(crud) => {
                let table = self.target_table(request, action)?;
                let result = handle_crud(&ctx, &self.daos, table, crud, request)?;
                if crud != CrudAction::Read && result.result != ResultCode::Failed {
                    self.fk_cache.invalidate_table(&table.name);
                }
                Reply::Json(result.to_json())
            }
        };

        if request.wrap_in_textarea() {
            return Ok(Reply::Text(format!(
                "<textarea>{}</textarea>",
                html_escape::encode_text(&reply.into_body())
            )));
        }
        Ok(reply)
    }

    fn target_table(&self, request: &AjaxRequest, action: Action) -> Result<&TableDefinition> {
        let object = request
            .object
            .as_deref()
            .ok_or_else(|| AdminError::MissingObject(action.to_string()))?;
        self.registry.get(object)
    }

    /// Fills the cache with the option lists of every foreign key of
    /// `table`. Failed fetches leave their selects loading.
    async fn resolve_fk_options(&self, table: &TableDefinition) {
        for field in table.fields.values() {
            let Some(key) = FkKey::for_field(table, field) else {
                continue;
            };
            let outcome = self
                .fk_cache
                .resolve(&key, || async {
                    fk_options(&self.registry, &self.daos, &key.other_table)
                })
                .await;
            if let Ok(FkFetchOutcome::Superseded) = outcome {
                tracing::debug!("Options for {} superseded", key);
            }
        }
    }
}
