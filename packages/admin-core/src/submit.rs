//! Form submission: rich text flush, picker sync, validation and form
//! encoding.

use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::error::AdminError;
use crate::fk::FkSelectState;
use crate::render::{Form, FormElement, InputKind, ValidationTag, Widget};

/// Characters left unescaped by form encoding besides alphanumerics.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// A validation tag failed
    Tag(ValidationTag),
    /// Longer than the control's max length
    MaxLength(usize),
    /// Date picker text not in `dd-mm-yyyy` form
    BadDate,
}

/// A rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub violation: FieldViolation,
}

/// Submission failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// One or more fields failed validation; no request was produced
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
}

impl SubmitError {
    pub fn errors(&self) -> &[FieldError] {
        match self {
            SubmitError::Invalid(errors) => errors,
        }
    }
}

impl From<SubmitError> for AdminError {
    fn from(e: SubmitError) -> Self {
        let fields: Vec<_> = e.errors().iter().map(|f| f.field.as_str()).collect();
        AdminError::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

/// Live values of a rendered form.
///
/// Starts from the values the form was rendered with. Edits go through
/// [`FormState::set`]; rich text editors keep their own buffer until the
/// submit pipeline flushes it.
#[derive(Debug, Clone)]
pub struct FormState<'f> {
    form: &'f Form,
    values: IndexMap<String, String>,
    rich_text_buffers: HashMap<String, String>,
}

impl<'f> FormState<'f> {
    pub fn new(form: &'f Form) -> Self {
        let mut values = IndexMap::new();
        for hidden in &form.hidden {
            values.insert(hidden.name.clone(), hidden.value.clone());
        }
        for element in &form.fields.elements {
            match element {
                FormElement::Hidden(hidden) => {
                    values
                        .entry(hidden.name.clone())
                        .or_insert_with(|| hidden.value.clone());
                }
                FormElement::Block(block) => {
                    for (name, value) in initial_values(&block.widget) {
                        values.insert(name, value);
                    }
                }
            }
        }
        Self {
            form,
            values,
            rich_text_buffers: HashMap::new(),
        }
    }

    /// Sets a control value, including helper controls such as
    /// `{field}-picker` or `{field}-hour`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Types into a rich text editor; the field itself is untouched until
    /// the flush step.
    pub fn edit_rich_text(&mut self, field: impl Into<String>, html: impl Into<String>) {
        self.rich_text_buffers.insert(field.into(), html.into());
    }

    /// Runs the submit pipeline.
    ///
    /// Flushes every registered rich text editor into its field, syncs date
    /// and time helpers into their carriers, validates every control, and
    /// form-encodes the result.
    ///
    /// # Returns
    /// The encoded body, or [`SubmitError::Invalid`] listing every rejected
    /// field. Nothing is encoded when validation fails.
    pub fn prepare_submission(mut self) -> Result<String, SubmitError> {
        self.flush_rich_text();
        let mut errors = self.sync_pickers();
        errors.extend(self.validate());
        if !errors.is_empty() {
            tracing::debug!(
                "Rejected {} submission with {} invalid fields",
                self.form.table,
                errors.len()
            );
            return Err(SubmitError::Invalid(errors));
        }
        Ok(self.encode())
    }

    fn flush_rich_text(&mut self) {
        for field in &self.form.fields.rich_text {
            if let Some(html) = self.rich_text_buffers.remove(field) {
                self.values.insert(field.clone(), html);
            }
        }
    }

    fn sync_pickers(&mut self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for widget in self.form.fields.elements.iter().filter_map(FormElement::widget) {
            match widget {
                Widget::Date(picker) => {
                    let shown = self.values.shift_remove(&picker.picker_name()).unwrap_or_default();
                    let shown = shown.trim();
                    if shown.is_empty() {
                        self.values.insert(picker.name.clone(), String::new());
                    } else {
                        match NaiveDate::parse_from_str(shown, "%d-%m-%Y") {
                            Ok(date) => {
                                self.values
                                    .insert(picker.name.clone(), date.format("%Y-%m-%d").to_string());
                            }
                            Err(_) => errors.push(FieldError {
                                field: picker.name.clone(),
                                violation: FieldViolation::BadDate,
                            }),
                        }
                    }
                }
                Widget::DateTime(picker) => {
                    let hour = self.values.shift_remove(&format!("{}-hour", picker.name));
                    let minute = self.values.shift_remove(&format!("{}-minute", picker.name));
                    let ampm = self.values.shift_remove(&format!("{}-ampm", picker.name));
                    if hour.is_none() && minute.is_none() && ampm.is_none() {
                        continue;
                    }
                    let hour: u32 = hour.and_then(|h| h.trim().parse().ok()).unwrap_or(0) % 12;
                    let minute: u32 = minute.and_then(|m| m.trim().parse().ok()).unwrap_or(0) % 60;
                    let hour = if ampm.as_deref() == Some("PM") { hour + 12 } else { hour };
                    let date = self
                        .values
                        .get(&picker.name)
                        .and_then(|v| v.get(..10))
                        .map(|d| format!("{} ", d))
                        .unwrap_or_default();
                    self.values.insert(
                        picker.name.clone(),
                        format!("{}{:02}:{:02}:00", date, hour, minute),
                    );
                }
                _ => {}
            }
        }
        errors
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for widget in self.form.fields.elements.iter().filter_map(FormElement::widget) {
            if matches!(widget, Widget::View(_)) {
                continue;
            }
            let name = widget.name();
            let value = self.get(name).unwrap_or_default();

            for tag in widget.tags() {
                if !tag_accepts(*tag, value) {
                    errors.push(FieldError {
                        field: name.to_string(),
                        violation: FieldViolation::Tag(*tag),
                    });
                }
            }

            if let Widget::Text(input) = widget {
                if let Some(max) = input.max_length {
                    if value.chars().count() > max {
                        errors.push(FieldError {
                            field: name.to_string(),
                            violation: FieldViolation::MaxLength(max),
                        });
                    }
                }
            }
        }
        errors
    }

    fn encode(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, FORM_ENCODE_SET),
                    utf8_percent_encode(v, FORM_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn initial_values(widget: &Widget) -> Vec<(String, String)> {
    match widget {
        Widget::Text(input) => match input.kind {
            InputKind::Text | InputKind::Password => vec![(input.name.clone(), input.value.clone())],
        },
        Widget::Radio(group) | Widget::Select(group) => {
            vec![(group.name.clone(), group.selected().unwrap_or_default().to_string())]
        }
        Widget::ForeignKey(select) => {
            let value = match select.state {
                FkSelectState::Ready(_) => select.selected.clone().unwrap_or_default(),
                FkSelectState::Loading => String::new(),
            };
            vec![(select.name.clone(), value)]
        }
        Widget::TextArea(area) => vec![(area.name.clone(), area.value.clone())],
        Widget::Date(picker) => vec![
            (picker.name.clone(), picker.value.clone()),
            (picker.picker_name(), picker.display.clone()),
        ],
        Widget::DateTime(picker) => vec![(picker.name.clone(), picker.value.clone())],
        Widget::File(file) => vec![(file.name.clone(), file.current.clone())],
        Widget::View(_) => Vec::new(),
    }
}

fn tag_accepts(tag: ValidationTag, value: &str) -> bool {
    let value = value.trim();
    match tag {
        ValidationTag::Required => !value.is_empty(),
        _ if value.is_empty() => true,
        ValidationTag::Digits => value.chars().all(|c| c.is_ascii_digit()),
        ValidationTag::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
        ValidationTag::Email => is_email(value),
        ValidationTag::Url => url::Url::parse(value)
            .map(|u| matches!(u.scheme(), "http" | "https" | "ftp") && u.has_host())
            .unwrap_or(false),
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
