use super::{Placeholder, SqlText};
use crate::schema::Schema;
use crate::value::Value;

/// Fixed-column insert: columns, placeholders and params are sized identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    columns: Vec<&'static str>,
    params: Vec<Value>,
}

impl InsertStatement {
    pub(crate) fn new(columns: Vec<&'static str>, params: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), params.len());
        Self { columns, params }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// One `?` per column.
    pub fn placeholders(&self) -> Vec<&'static str> {
        vec!["?"; self.columns.len()]
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Value bound to `column`, if the column is part of the insert.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| &self.params[i])
    }

    /// `INSERT INTO table (cols) VALUES (...)`.
    pub fn to_sql(&self, schema: &Schema, style: Placeholder) -> String {
        let mut sql = SqlText::new(style);
        sql.push("INSERT INTO ")
            .push(schema.table())
            .push(" (")
            .push(&self.columns.join(", "))
            .push(") VALUES (");
        for i in 0..self.columns.len() {
            if i > 0 {
                sql.push(", ");
            }
            sql.push_param();
        }
        sql.push(")");
        sql.finish()
    }
}
