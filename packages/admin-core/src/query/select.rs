//! Fluent select query evaluated over records.

use std::cmp::Ordering;

use super::condition::Condition;
use crate::record::{compare_values, Record};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses `asc`/`desc`, defaulting to ascending.
    pub fn parse(order: Option<&str>) -> Self {
        match order.map(str::trim) {
            Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Select over one table: conjunctive conditions, ordering and a window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub table: String,
    pub conditions: Vec<Condition>,
    pub order_by: Option<(String, SortOrder)>,
    pub start: usize,
    pub limit: Option<usize>,
}

impl Query {
    pub fn select(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Adds a clause joined with AND.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a record satisfies every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Filters, sorts and windows records.
    pub fn apply<I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut rows: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();

        if let Some((field, order)) = &self.order_by {
            rows.sort_by(|a, b| {
                let ord = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => compare_values(x, y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        let window = rows.into_iter().skip(self.start);
        match self.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        }
    }
}
