use super::{Placeholder, SqlText};
use crate::schema::Schema;
use crate::value::Value;

/// Conjunctive equality filter for reads.
///
/// `columns()[i] = ?` pairs with `params()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    columns: Vec<&'static str>,
    params: Vec<Value>,
}

impl FilterQuery {
    pub(crate) fn new(columns: Vec<&'static str>, params: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), params.len());
        Self { columns, params }
    }

    /// A filter that selects every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// `true` when the filter has no predicate.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// `(column, value)` predicates in canonical order.
    pub fn predicates(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.columns.iter().copied().zip(self.params.iter())
    }

    /// Clause fragment with `?` placeholders, e.g. `category = ? AND year = ?`.
    ///
    /// Empty when the filter selects every record.
    pub fn clause(&self) -> String {
        self.clause_with(Placeholder::Question)
    }

    pub fn clause_with(&self, style: Placeholder) -> String {
        let mut sql = SqlText::new(style);
        sql.push_assignments(&self.columns, " AND ");
        sql.finish()
    }

    /// Full `SELECT` over `schema`, ordered by primary key.
    pub fn to_select_sql(&self, schema: &Schema, style: Placeholder) -> String {
        let mut sql = SqlText::new(style);
        sql.push("SELECT ")
            .push(&schema.column_list())
            .push(" FROM ")
            .push(schema.table());
        if !self.is_empty() {
            sql.push(" WHERE ").push_assignments(&self.columns, " AND ");
        }
        sql.push(" ORDER BY ").push(schema.primary_key());
        sql.finish()
    }
}
