use super::{Placeholder, SqlText};
use crate::schema::Schema;
use crate::value::Value;

/// Partial update of one record: `SET` assignments followed by `WHERE id = ?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    id: i64,
    columns: Vec<&'static str>,
    /// Assigned values, then the id.
    params: Vec<Value>,
}

impl UpdateStatement {
    pub(crate) fn new(id: i64, columns: Vec<&'static str>, mut values: Vec<Value>) -> Self {
        debug_assert!(!columns.is_empty());
        debug_assert_eq!(columns.len(), values.len());
        values.push(Value::Integer(id));
        Self {
            id,
            columns,
            params: values,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// `field = ?` for each assigned column, e.g. `["name = ?"]`.
    pub fn set_clause(&self) -> Vec<String> {
        self.columns.iter().map(|c| format!("{c} = ?")).collect()
    }

    /// All parameters; the id is always last.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// `(column, new value)` pairs in canonical order.
    pub fn changes(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.columns.iter().copied().zip(self.params.iter())
    }

    /// `UPDATE table SET ... WHERE pk = ?`.
    pub fn to_sql(&self, schema: &Schema, style: Placeholder) -> String {
        let mut sql = SqlText::new(style);
        sql.push("UPDATE ")
            .push(schema.table())
            .push(" SET ")
            .push_assignments(&self.columns, ", ")
            .push(" WHERE ")
            .push(schema.primary_key())
            .push(" = ")
            .push_param();
        sql.finish()
    }
}
