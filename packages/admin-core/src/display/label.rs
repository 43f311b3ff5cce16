//! Presentation labels attached to tables and fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A presentation label.
///
/// Labels are matched by exact string. The known variants switch
/// rendering or validation behavior; anything else is kept verbatim as
/// [`Label::Custom`] so that table-specific code can still query it.
/// Note the case distinctions: `EMAIL`/`WEB_ADDRESS`/`NOT_NULL` drive
/// edit-mode validation while `email`/`www`/`notnull` drive read-mode
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Hidden,
    ReadOnlyEdit,
    File,
    Password,
    RichText,
    WebAddress,
    Email,
    NotNull,
    NotNullMarker,
    PrimaryKey,
    Www,
    EmailLink,
    PriorityHml,
    Rating1To10,
    FileViewAsImage,
    FileViewAsLink,
    CreationDbCreate,
    Calendar,
    CalendarStart,
    CalendarEnd,
    CalendarComplete,
    CalendarDescription,
    CalendarTitle,
    Custom(String),
}

const KNOWN: [(&str, Label); 23] = [
    ("hidden", Label::Hidden),
    ("readonlyedit", Label::ReadOnlyEdit),
    ("FILE", Label::File),
    ("pwd", Label::Password),
    ("rte", Label::RichText),
    ("WEB_ADDRESS", Label::WebAddress),
    ("EMAIL", Label::Email),
    ("NOT_NULL", Label::NotNull),
    ("notnull", Label::NotNullMarker),
    ("pk", Label::PrimaryKey),
    ("www", Label::Www),
    ("email", Label::EmailLink),
    ("priority-hml", Label::PriorityHml),
    ("rating1-10", Label::Rating1To10),
    ("fileViewAsImage", Label::FileViewAsImage),
    ("fileViewAsLink", Label::FileViewAsLink),
    ("creation-dbcreate", Label::CreationDbCreate),
    ("calendar", Label::Calendar),
    ("calendar-start", Label::CalendarStart),
    ("calendar-end", Label::CalendarEnd),
    ("calendar-complete", Label::CalendarComplete),
    ("calendar-description", Label::CalendarDescription),
    ("calendar-title", Label::CalendarTitle),
];

impl Label {
    /// Returns the label tag as written in the schema.
    pub fn as_str(&self) -> &str {
        if let Label::Custom(tag) = self {
            return tag;
        }
        KNOWN
            .iter()
            .find(|(_, label)| label == self)
            .map(|(tag, _)| *tag)
            .unwrap_or_default()
    }
}

impl From<&str> for Label {
    fn from(tag: &str) -> Self {
        KNOWN
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| Label::Custom(tag.to_string()))
    }
}

impl From<String> for Label {
    fn from(tag: String) -> Self {
        Label::from(tag.as_str())
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
