//! API request types for communication between API and runtime

use std::fmt;

use admin_core::error::AdminError;
use indexmap::IndexMap;

use crate::ResponseSender;

/// Parameters decoded from a query string or form body, in arrival order.
pub type Params = IndexMap<String, String>;

/// Actions served regardless of the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Help,
    Home,
    Calendar,
}

/// Per-table page actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    Manager,
    Update,
    View,
    Create,
    Order,
    FkData,
    Upload,
    Send,
}

impl PageAction {
    pub const ALL: [PageAction; 8] = [
        PageAction::Manager,
        PageAction::Update,
        PageAction::View,
        PageAction::Create,
        PageAction::Order,
        PageAction::FkData,
        PageAction::Upload,
        PageAction::Send,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageAction::Manager => "Manager",
            PageAction::Update => "Update",
            PageAction::View => "View",
            PageAction::Create => "Create",
            PageAction::Order => "Order",
            PageAction::FkData => "FkData",
            PageAction::Upload => "Upload",
            PageAction::Send => "Send",
        }
    }
}

/// Generic DAO-backed actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    Create,
    Read,
    Update,
    QuickEditUpdate,
    Delete,
    DeleteMultiple,
}

impl CrudAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Create => "create",
            CrudAction::Read => "read",
            CrudAction::Update => "update",
            CrudAction::QuickEditUpdate => "quickEditupdate",
            CrudAction::Delete => "delete",
            CrudAction::DeleteMultiple => "deleteMultiple",
        }
    }
}

/// Action resolved once from the request's action name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Global(GlobalAction),
    Page(PageAction),
    Crud(CrudAction),
}

impl Action {
    /// Resolves an action name. Names outside the closed set are rejected.
    pub fn parse(name: &str) -> Result<Self, AdminError> {
        let action = match name {
            "help" => Action::Global(GlobalAction::Help),
            "home" => Action::Global(GlobalAction::Home),
            "calendar" => Action::Global(GlobalAction::Calendar),
            "create" => Action::Crud(CrudAction::Create),
            "read" => Action::Crud(CrudAction::Read),
            "update" => Action::Crud(CrudAction::Update),
            "quickEditupdate" => Action::Crud(CrudAction::QuickEditUpdate),
            "delete" => Action::Crud(CrudAction::Delete),
            "deleteMultiple" => Action::Crud(CrudAction::DeleteMultiple),
            other => PageAction::ALL
                .iter()
                .find(|p| p.as_str() == other)
                .map(|p| Action::Page(*p))
                .ok_or_else(|| AdminError::UnknownAction(other.to_string()))?,
        };
        Ok(action)
    }

    /// Whether the action needs an `object` naming the target table.
    pub fn needs_table(&self) -> bool {
        !matches!(self, Action::Global(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Global(GlobalAction::Help) => f.write_str("help"),
            Action::Global(GlobalAction::Home) => f.write_str("home"),
            Action::Global(GlobalAction::Calendar) => f.write_str("calendar"),
            Action::Page(p) => f.write_str(p.as_str()),
            Action::Crud(c) => f.write_str(c.as_str()),
        }
    }
}

/// A dispatch request against `(object, action)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AjaxRequest {
    pub object: Option<String>,
    pub action: String,
    /// Every parameter, including `object` and the action
    pub params: Params,
    /// Authenticated user, if any
    pub user: Option<String>,
    /// Requested language, if any
    pub language: Option<String>,
}

impl AjaxRequest {
    /// Builds a request from decoded parameters. `jackaction` wins over the
    /// legacy `action` key.
    pub fn from_params(params: Params) -> Result<Self, AdminError> {
        let action = params
            .get("jackaction")
            .or_else(|| params.get("action"))
            .filter(|a| !a.is_empty())
            .cloned()
            .ok_or_else(|| AdminError::InvalidParameter {
                name: "jackaction".to_string(),
                reason: "no action given".to_string(),
            })?;
        let object = params.get("object").filter(|o| !o.is_empty()).cloned();
        let language = params.get("lang").filter(|l| !l.is_empty()).cloned();
        Ok(Self {
            object,
            action,
            params,
            user: None,
            language,
        })
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Whether the response should be wrapped for an iframe upload.
    pub fn wrap_in_textarea(&self) -> bool {
        self.param("wta") == Some("1")
    }
}

/// Paged grid listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub object: String,
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub rows: usize,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    /// Quick-search field, possibly `Table.member`
    pub field: Option<String>,
    pub value: Option<String>,
    pub search_option: Option<String>,
    pub search_type: Option<String>,
    pub fk_value: Option<String>,
    pub enum_value: Option<String>,
    pub date_value: Option<String>,
    /// Render cells as markup instead of raw payloads (`format=html`)
    pub formatted: bool,
    pub user: Option<String>,
}

impl GridRequest {
    /// Builds a request from decoded parameters.
    ///
    /// # Arguments
    /// * `params` - Decoded parameters
    /// * `default_rows` - Page size used when `rows` is absent
    pub fn from_params(params: &Params, default_rows: usize) -> Result<Self, AdminError> {
        let object = params
            .get("object")
            .filter(|o| !o.is_empty())
            .cloned()
            .ok_or_else(|| AdminError::MissingObject("grid".to_string()))?;
        let page = parse_count(params, "page")?.unwrap_or(1).max(1);
        let rows = parse_count(params, "rows")?.unwrap_or(default_rows).max(1);
        let get = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
        Ok(Self {
            object,
            page,
            rows,
            sort_field: get("sidx"),
            sort_order: get("sord"),
            field: get("field"),
            value: get("value"),
            search_option: get("searchoption"),
            search_type: get("searchtype"),
            fk_value: get("fkValue"),
            enum_value: get("enumValue"),
            date_value: get("datepickervalue"),
            formatted: params.get("format").is_some_and(|f| f == "html"),
            user: None,
        })
    }
}

fn parse_count(params: &Params, name: &str) -> Result<Option<usize>, AdminError> {
    match params.get(name).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| AdminError::InvalidParameter {
                name: name.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Calendar feed request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRequest {
    /// `ALL` or a comma list of tables
    pub object: String,
    pub user: Option<String>,
}

impl CalendarRequest {
    pub fn from_params(params: &Params) -> Self {
        Self {
            object: params
                .get("object")
                .filter(|o| !o.is_empty())
                .cloned()
                .unwrap_or_else(|| "ALL".to_string()),
            user: None,
        }
    }

    /// Every calendar table.
    pub fn all() -> Self {
        Self {
            object: "ALL".to_string(),
            user: None,
        }
    }

    /// Tables named by the request, `None` meaning every calendar table.
    pub fn tables(&self) -> Option<Vec<&str>> {
        if self.object == "ALL" {
            return None;
        }
        Some(
            self.object
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }
}

/// API request enum
#[derive(Debug)]
pub enum ApiRequest {
    /// `(object, action)` dispatch
    Ajax {
        request: AjaxRequest,
        response: ResponseSender,
    },
    /// Paged grid listing
    Grid {
        request: GridRequest,
        response: ResponseSender,
    },
    /// Newline-delimited JSON records of a grid query
    Rest {
        request: GridRequest,
        response: ResponseSender,
    },
    /// Calendar feed
    Calendar {
        request: CalendarRequest,
        response: ResponseSender,
    },
    /// Registered table names
    ListTables { response: ResponseSender },
    /// One table definition
    GetTable {
        name: String,
        response: ResponseSender,
    },
}
