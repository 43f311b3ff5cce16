//! Field-type driven rendering: edit widgets, read-only views, grid cells
//! and whole forms.

mod edit;
mod form;
mod grid;
mod hooks;
mod view;
mod widget;

pub use edit::{build_edit_widget, EditOutcome};
pub use form::{build_fields, build_form, Form, FormFields, FormMode};
pub use grid::{format_cell, CellPayload};
pub use hooks::{BuildHook, HookInput, HookRegistry};
pub use view::{build_view_fields, build_view_widget, view_content};
pub use widget::{
    priority_label, ChoiceGroup, ChoiceOption, DatePicker, DateTimePicker, FieldBlock, FileInput,
    FormElement, HiddenInput, InputKind, Priority, TextArea, TextInput, ValidationTag, ViewContent,
    ViewWidget, Widget,
};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::AdminConfig;
use crate::fk::FkOptionCache;
use crate::i18n::Localizer;
use crate::table::{FieldDefinition, TableDefinition};

/// Collaborators shared by every render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a AdminConfig,
    pub localizer: &'a Localizer,
    pub hooks: &'a HookRegistry,
    /// Resolved foreign key options; FK selects start loading without it
    pub fk_cache: Option<&'a FkOptionCache>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a AdminConfig, localizer: &'a Localizer, hooks: &'a HookRegistry) -> Self {
        Self {
            config,
            localizer,
            hooks,
            fk_cache: None,
        }
    }

    pub fn with_fk_cache(mut self, cache: &'a FkOptionCache) -> Self {
        self.fk_cache = Some(cache);
        self
    }

    /// Public URL of a stored file.
    pub fn storage_url(&self, file: &str) -> String {
        format!("{}/{}", self.config.storage_base_url, file)
    }

    /// URL of a UI image.
    pub fn image_url(&self, name: &str) -> String {
        format!("{}/{}", self.config.image_base_url, name)
    }

    /// Text shown by FK selects while their options load.
    pub fn loading_text(&self) -> String {
        self.localizer.lookup("Loading list please wait...")
    }

    /// Wraps a widget in its labelled block.
    pub(crate) fn block(&self, table: &TableDefinition, field: &FieldDefinition, widget: Widget, edit: bool) -> FormElement {
        use crate::display::Label;

        FormElement::Block(FieldBlock {
            field: field.name.clone(),
            label: self.localizer.field_label(&table.name, &field.name),
            help: self.localizer.field_help(&table.name, &field.name),
            required_marker: edit
                && field.has_label(&Label::NotNullMarker)
                && !field.has_label(&Label::PrimaryKey),
            widget,
        })
    }
}

/// Link target of a record's Update page.
pub fn update_page_href(table: &str, id: &str) -> String {
    format!(
        "ajax?jackaction=Update&object={}&id={}",
        utf8_percent_encode(table, NON_ALPHANUMERIC),
        utf8_percent_encode(id, NON_ALPHANUMERIC)
    )
}
