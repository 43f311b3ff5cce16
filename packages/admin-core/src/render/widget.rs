//! Rendered controls and their HTML form.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::fk::{FkSelect, FkSelectState};

/// Client-side validation tag carried as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationTag {
    Required,
    Digits,
    Number,
    Email,
    Url,
}

impl ValidationTag {
    pub fn as_class(&self) -> &'static str {
        match self {
            ValidationTag::Required => "required",
            ValidationTag::Digits => "digits",
            ValidationTag::Number => "number",
            ValidationTag::Email => "email",
            ValidationTag::Url => "url",
        }
    }
}

/// Type attribute of a single-line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Password,
}

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub id: String,
    pub name: String,
    pub kind: InputKind,
    pub value: String,
    pub max_length: Option<usize>,
    pub size: Option<usize>,
    pub tags: Vec<ValidationTag>,
}

/// One entry of a radio group or select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Exclusive choice rendered as radio buttons or a drop down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub name: String,
    pub options: Vec<ChoiceOption>,
    pub tags: Vec<ValidationTag>,
}

impl ChoiceGroup {
    /// Value of the pre-selected option.
    pub fn selected(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.as_str())
    }

    /// Option values in render order.
    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}

/// Multi-line text area, optionally hosting a rich text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    pub id: String,
    pub name: String,
    pub value: String,
    pub rich_text: bool,
    pub tags: Vec<ValidationTag>,
}

/// Hidden `yyyy-mm-dd` carrier paired with a `dd-mm-yyyy` picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    pub name: String,
    pub value: String,
    pub display: String,
    pub tags: Vec<ValidationTag>,
}

impl DatePicker {
    /// Name of the visible picker input.
    pub fn picker_name(&self) -> String {
        format!("{}-picker", self.name)
    }
}

/// Hour/minute/AM-PM composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePicker {
    pub name: String,
    pub value: String,
    pub hour: u32,
    pub minute: u32,
    pub am: bool,
    pub tags: Vec<ValidationTag>,
}

/// File upload control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub current: String,
    pub tags: Vec<ValidationTag>,
}

/// Priority level of a `priority-hml` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Maps stored values `0`/`1`/`2`.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Priority::Low),
            "1" => Some(Priority::Medium),
            "2" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            Priority::Low => "0",
            Priority::Medium => "1",
            Priority::High => "2",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Priority::Low => "jack-ui-priority-low",
            Priority::Medium => "jack-ui-priority-medium",
            Priority::High => "jack-ui-priority-high",
        }
    }
}

/// Badge text for a priority value; anything unmapped shows `-`.
pub fn priority_label(value: &str) -> &'static str {
    Priority::from_value(value).map_or("-", |p| p.as_str())
}

/// Read-only rendition of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewContent {
    /// Escaped plain text
    Text(String),
    /// Trusted markup from a rich text field
    RawHtml(String),
    Link { href: String, text: String },
    Image { src: String, width: u32 },
    Icon { src: String, enabled: bool },
    Priority(Option<Priority>),
    Rating { stars: u32, star_src: String },
}

/// Read-only field view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewWidget {
    pub name: String,
    pub content: ViewContent,
}

/// An edit-mode control.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Text(TextInput),
    Radio(ChoiceGroup),
    Select(ChoiceGroup),
    ForeignKey(FkSelect),
    TextArea(TextArea),
    Date(DatePicker),
    DateTime(DateTimePicker),
    File(FileInput),
    View(ViewWidget),
}

impl Widget {
    /// Validation tags carried by the control.
    pub fn tags(&self) -> &[ValidationTag] {
        match self {
            Widget::Text(w) => &w.tags,
            Widget::Radio(w) | Widget::Select(w) => &w.tags,
            Widget::TextArea(w) => &w.tags,
            Widget::Date(w) => &w.tags,
            Widget::DateTime(w) => &w.tags,
            Widget::File(w) => &w.tags,
            Widget::ForeignKey(w) => &w.tags,
            Widget::View(_) => &[],
        }
    }

    pub fn has_tag(&self, tag: ValidationTag) -> bool {
        self.tags().contains(&tag)
    }

    /// Name under which the control submits its value.
    pub fn name(&self) -> &str {
        match self {
            Widget::Text(w) => &w.name,
            Widget::Radio(w) | Widget::Select(w) => &w.name,
            Widget::ForeignKey(w) => &w.name,
            Widget::TextArea(w) => &w.name,
            Widget::Date(w) => &w.name,
            Widget::DateTime(w) => &w.name,
            Widget::File(w) => &w.name,
            Widget::View(w) => &w.name,
        }
    }

    pub fn to_html(&self, loading_text: &str) -> String {
        match self {
            Widget::Text(w) => text_input_html(w),
            Widget::Radio(w) => radio_html(w),
            Widget::Select(w) => select_html(w),
            Widget::ForeignKey(w) => fk_select_html(w, loading_text),
            Widget::TextArea(w) => format!(
                r#"<textarea name="{}" id="{}" class="{}">{}</textarea>"#,
                attr(&w.name),
                attr(&w.id),
                classes(
                    if w.rich_text { "jack-field rte-zone" } else { "jack-field jack-field-textarea" },
                    &w.tags
                ),
                text(&w.value)
            ),
            Widget::Date(w) => format!(
                r#"<input type="hidden" name="{}" value="{}" /><input type="text" name="{}" value="{}" class="{}" />"#,
                attr(&w.name),
                attr(&w.value),
                attr(&w.picker_name()),
                attr(&w.display),
                classes("jack-field jack-field-date", &w.tags)
            ),
            Widget::DateTime(w) => date_time_html(w),
            Widget::File(w) => format!(
                r#"<input type="hidden" name="{}" value="{}" /><input type="file" name="{}-upload" class="{}" />"#,
                attr(&w.name),
                attr(&w.current),
                attr(&w.name),
                classes("jack-field jack-field-file", &w.tags)
            ),
            Widget::View(w) => w.content.to_html(),
        }
    }
}

impl ViewContent {
    pub fn to_html(&self) -> String {
        match self {
            ViewContent::Text(t) => text(t).into_owned(),
            ViewContent::RawHtml(html) => html.clone(),
            ViewContent::Link { href, text: t } => {
                format!(r#"<a href="{}">{}</a>"#, attr(href), text(t))
            }
            ViewContent::Image { src, width } => {
                format!(r#"<img src="{}" width="{}" />"#, attr(src), width)
            }
            ViewContent::Icon { src, enabled } => format!(
                r#"<img src="{}" alt="{}" />"#,
                attr(src),
                if *enabled { "enabled" } else { "disabled" }
            ),
            ViewContent::Priority(Some(p)) => {
                format!(r#"<span class="{}">{}</span>"#, p.css_class(), p.as_str())
            }
            ViewContent::Priority(None) => "-".to_string(),
            ViewContent::Rating { stars, star_src } => {
                let mut html = format!(
                    r#"<div class="jack-ui-rating-{}" title="{}">"#,
                    stars, stars
                );
                for _ in 0..*stars {
                    let _ = write!(html, r#"<img src="{}" />"#, attr(star_src));
                }
                html.push_str("</div>");
                html
            }
        }
    }
}

fn classes(base: &str, tags: &[ValidationTag]) -> String {
    let mut out = base.to_string();
    for tag in tags {
        out.push(' ');
        out.push_str(tag.as_class());
    }
    out
}

fn text_input_html(w: &TextInput) -> String {
    let (kind, class) = match w.kind {
        InputKind::Text => ("text", "jack-field jack-field-text"),
        InputKind::Password => ("password", "jack-field jack-field-password"),
    };
    let mut html = format!(
        r#"<input type="{}" name="{}" id="{}" value="{}""#,
        kind,
        attr(&w.name),
        attr(&w.id),
        attr(&w.value)
    );
    if let Some(max) = w.max_length {
        let _ = write!(html, r#" maxlength="{}""#, max);
    }
    if let Some(size) = w.size {
        let _ = write!(html, r#" size="{}""#, size);
    }
    let _ = write!(html, r#" class="{}" />"#, classes(class, &w.tags));
    html
}

fn radio_html(w: &ChoiceGroup) -> String {
    let mut html = String::from("<div>");
    for option in &w.options {
        let _ = write!(
            html,
            r#"{}: <input type="radio" name="{}" value="{}" class="{}"{} /> "#,
            text(&option.label),
            attr(&w.name),
            attr(&option.value),
            classes("jack-field jack-field-radio", &w.tags),
            if option.selected { r#" checked="checked""# } else { "" }
        );
    }
    html.push_str("</div>");
    html
}

fn options_html(html: &mut String, options: &[ChoiceOption]) {
    for option in options {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            attr(&option.value),
            if option.selected { r#" selected="selected""# } else { "" },
            text(&option.label)
        );
    }
}

fn select_html(w: &ChoiceGroup) -> String {
    let mut html = format!(
        r#"<select name="{}" class="{}">"#,
        attr(&w.name),
        classes("jack-field jack-field-select", &w.tags)
    );
    options_html(&mut html, &w.options);
    html.push_str("</select>");
    html
}

fn fk_select_html(w: &FkSelect, loading_text: &str) -> String {
    let mut html = format!(
        r#"<select name="{}" id="{}" class="{}">"#,
        attr(&w.name),
        attr(&w.key.to_string()),
        classes("jack-field jack-field-select", &w.tags)
    );
    match &w.state {
        FkSelectState::Loading => {
            let _ = write!(html, r#"<option value="">{}</option>"#, text(loading_text));
        }
        FkSelectState::Ready(options) => {
            let mut choices = Vec::with_capacity(options.len() + 1);
            if w.include_empty {
                choices.push(ChoiceOption::new("", "", false));
            }
            choices.extend(options.iter().map(|o| {
                ChoiceOption::new(&o.id, &o.label, w.selected.as_deref() == Some(o.id.as_str()))
            }));
            options_html(&mut html, &choices);
        }
    }
    html.push_str("</select>");
    html
}

fn date_time_html(w: &DateTimePicker) -> String {
    let mut html = format!(
        r#"<input type="hidden" name="{}" value="{}" /><select name="{}-hour" class="{}">"#,
        attr(&w.name),
        attr(&w.value),
        attr(&w.name),
        classes("jack-field jack-field-hour", &w.tags)
    );
    let hours: Vec<_> = (0..12)
        .map(|h| ChoiceOption::new(h.to_string(), format!("{:02}", h), h == w.hour))
        .collect();
    options_html(&mut html, &hours);
    let _ = write!(html, r#"</select><select name="{}-minute">"#, attr(&w.name));
    let minutes: Vec<_> = (0..60)
        .map(|m| ChoiceOption::new(m.to_string(), format!("{:02}", m), m == w.minute))
        .collect();
    options_html(&mut html, &minutes);
    let _ = write!(html, r#"</select><select name="{}-ampm">"#, attr(&w.name));
    options_html(
        &mut html,
        &[
            ChoiceOption::new("AM", "AM", w.am),
            ChoiceOption::new("PM", "PM", !w.am),
        ],
    );
    html.push_str("</select>");
    html
}

/// Hidden carrier input, also used for form-level parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenInput {
    pub name: String,
    pub value: String,
}

impl HiddenInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<input type="hidden" name="{}" value="{}" />"#,
            attr(&self.name),
            attr(&self.value)
        )
    }
}

/// Labelled wrapper around one field's control.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBlock {
    pub field: String,
    /// Localized field label
    pub label: String,
    /// Localized help text, shown as a tooltip
    pub help: Option<String>,
    /// Whether the label carries the required marker
    pub required_marker: bool,
    pub widget: Widget,
}

/// One element of a rendered form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormElement {
    Hidden(HiddenInput),
    Block(FieldBlock),
}

impl FormElement {
    pub fn widget(&self) -> Option<&Widget> {
        match self {
            FormElement::Hidden(_) => None,
            FormElement::Block(block) => Some(&block.widget),
        }
    }

    pub fn widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            FormElement::Hidden(_) => None,
            FormElement::Block(block) => Some(&mut block.widget),
        }
    }

    pub fn to_html(&self, loading_text: &str) -> String {
        match self {
            FormElement::Hidden(hidden) => hidden.to_html(),
            FormElement::Block(block) => {
                let mut html = String::from(r#"<div class="jack-field-block"><label"#);
                if let Some(help) = &block.help {
                    let _ = write!(html, r#" title="{}""#, attr(help));
                }
                let _ = write!(html, ">{}", text(&block.label));
                if block.required_marker {
                    html.push_str(r#"<span class="jack-required">*</span>"#);
                }
                let _ = write!(
                    html,
                    r#"</label><div class="jack-field-wrapper">{}</div><div class="clear-left"></div></div>"#,
                    block.widget.to_html(loading_text)
                );
                html
            }
        }
    }
}
