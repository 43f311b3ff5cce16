//! Primitive column types.

mod field_type;

pub use field_type::FieldType;
