//! Comparison clauses and the quick-search operator mapping.

use std::cmp::Ordering;

use serde_json::Value;

use crate::record::{compare_values, value_text, Record};

/// Comparison of a field against a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Case-insensitive pattern with `%` wildcards
    Like,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Neq => "!=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Like => "LIKE",
        }
    }
}

/// One conjunctive clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub comparison: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Evaluates the clause against a record. Missing fields read as null.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).unwrap_or(&Value::Null);
        match self.comparison {
            Comparison::Like => {
                !actual.is_null() && like(&value_text(actual), &value_text(&self.value))
            }
            Comparison::Eq => compare_values(actual, &self.value) == Ordering::Equal,
            Comparison::Neq => compare_values(actual, &self.value) != Ordering::Equal,
            Comparison::Lt => compare_values(actual, &self.value) == Ordering::Less,
            Comparison::Lte => compare_values(actual, &self.value) != Ordering::Greater,
            Comparison::Gt => compare_values(actual, &self.value) == Ordering::Greater,
            Comparison::Gte => compare_values(actual, &self.value) != Ordering::Less,
        }
    }
}

/// Case-insensitive `LIKE` with `%` matching any run of characters.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

/// Quick-search operator codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickSearchOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    BeginsWith,
    EndsWith,
    True,
    False,
}

impl QuickSearchOp {
    /// Parses an operator code. Unknown or absent codes mean equals.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.unwrap_or_default() {
            "neq" => QuickSearchOp::Neq,
            "lt" => QuickSearchOp::Lt,
            "lte" => QuickSearchOp::Lte,
            "gt" => QuickSearchOp::Gt,
            "gte" => QuickSearchOp::Gte,
            "cnt" => QuickSearchOp::Contains,
            "beg" => QuickSearchOp::BeginsWith,
            "end" => QuickSearchOp::EndsWith,
            "tru" => QuickSearchOp::True,
            "fls" => QuickSearchOp::False,
            _ => QuickSearchOp::Eq,
        }
    }
}

/// Builds the clause for a quick search.
///
/// Operator and field type compatibility is not checked; an ordered
/// comparison on a text field is evaluated literally.
///
/// # Arguments
/// * `field` - Field name
/// * `value` - Search value as entered
/// * `op` - Operator
pub fn build_condition(field: &str, value: &str, op: QuickSearchOp) -> Condition {
    let (comparison, value) = match op {
        QuickSearchOp::Contains => (Comparison::Like, Value::from(format!("%{}%", value))),
        QuickSearchOp::BeginsWith => (Comparison::Like, Value::from(format!("{}%", value))),
        QuickSearchOp::EndsWith => (Comparison::Like, Value::from(format!("%{}", value))),
        QuickSearchOp::Neq => (Comparison::Neq, Value::from(value)),
        QuickSearchOp::Lt => (Comparison::Lt, Value::from(value)),
        QuickSearchOp::Lte => (Comparison::Lte, Value::from(value)),
        QuickSearchOp::Gt => (Comparison::Gt, Value::from(value)),
        QuickSearchOp::Gte => (Comparison::Gte, Value::from(value)),
        QuickSearchOp::True => (Comparison::Eq, Value::from(1)),
        QuickSearchOp::False => (Comparison::Eq, Value::from(0)),
        QuickSearchOp::Eq => (Comparison::Eq, Value::from(value)),
    };
    tracing::debug!("Quick search: {} {} {}", field, comparison.as_sql(), value);
    Condition {
        field: field.to_string(),
        comparison,
        value,
    }
}
