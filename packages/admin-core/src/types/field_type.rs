//! Closed set of column type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Column type tag of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Enum,
    Decimal,
    Int,
    BigInt,
    MediumInt,
    SmallInt,
    TinyInt,
    Varchar,
    Text,
    LongText,
    Timestamp,
    Date,
    DateTime,
}

impl FieldType {
    /// All type tags in declaration order.
    pub const ALL: [FieldType; 14] = [
        FieldType::Boolean,
        FieldType::Enum,
        FieldType::Decimal,
        FieldType::Int,
        FieldType::BigInt,
        FieldType::MediumInt,
        FieldType::SmallInt,
        FieldType::TinyInt,
        FieldType::Varchar,
        FieldType::Text,
        FieldType::LongText,
        FieldType::Timestamp,
        FieldType::Date,
        FieldType::DateTime,
    ];

    /// Returns the schema tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Enum => "enum",
            FieldType::Decimal => "decimal",
            FieldType::Int => "int",
            FieldType::BigInt => "bigint",
            FieldType::MediumInt => "mediumint",
            FieldType::SmallInt => "smallint",
            FieldType::TinyInt => "tinyint",
            FieldType::Varchar => "varchar",
            FieldType::Text => "text",
            FieldType::LongText => "longtext",
            FieldType::Timestamp => "timestamp",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
        }
    }

    /// Integer family. Decimal is deliberately excluded: it has its own
    /// edit widget.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldType::Int
                | FieldType::BigInt
                | FieldType::MediumInt
                | FieldType::SmallInt
                | FieldType::TinyInt
        )
    }

    /// Integer family plus decimal.
    pub fn is_number(&self) -> bool {
        self.is_integer() || *self == FieldType::Decimal
    }

    /// Single and multi-line text types.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FieldType::Varchar | FieldType::Text | FieldType::LongText
        )
    }

    /// Multi-line text types.
    pub fn is_long_text(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::LongText)
    }

    /// Date and time types.
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::Timestamp | FieldType::DateTime
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AdminError::UnknownFieldType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_tag() {
        for t in FieldType::ALL {
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = "largeint".parse::<FieldType>().unwrap_err();
        assert_eq!(err, AdminError::UnknownFieldType("largeint".to_string()));
    }

    #[test]
    fn test_families() {
        assert!(FieldType::TinyInt.is_integer());
        assert!(!FieldType::Decimal.is_integer());
        assert!(FieldType::Decimal.is_number());
        assert!(FieldType::LongText.is_text());
        assert!(!FieldType::Varchar.is_long_text());
        assert!(FieldType::Timestamp.is_date());
    }

    #[test]
    fn test_serde_uses_schema_tags() {
        let json = serde_json::to_string(&FieldType::MediumInt).unwrap();
        assert_eq!(json, "\"mediumint\"");
        let parsed: FieldType = serde_json::from_str("\"longtext\"").unwrap();
        assert_eq!(parsed, FieldType::LongText);
    }
}
