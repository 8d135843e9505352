//! Partial query builder.
//!
//! Turns a sparse field map into a store-executable operation descriptor:
//!
//! - [`PartialQueryBuilder::build_filter`] → [`FilterQuery`] (`WHERE` clause for reads)
//! - [`PartialQueryBuilder::build_insert`] → [`InsertStatement`]
//! - [`PartialQueryBuilder::build_partial_update`] → [`UpdateStatement`]
//!
//! ## Design
//!
//! - Fields are visited in the schema's canonical order, never in input order.
//! - Values are only ever emitted as positional parameters. The canonical
//!   rendering uses `?`; [`Placeholder::Dollar`] renders `$1, $2, ...` for
//!   Postgres.
//! - Unknown input keys are ignored.
//!
//! # Example
//!
//! ```
//! use gamelib::{PartialQueryBuilder, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::games();
//! let query = json!({ "category": "platformer", "year": 1985 });
//! let filter = PartialQueryBuilder::new(&schema)
//!     .build_filter(query.as_object().unwrap())
//!     .unwrap();
//!
//! assert_eq!(filter.clause(), "category = ? AND year = ?");
//! ```

mod filter;
mod insert;
mod update;

#[cfg(test)]
mod tests;

pub use filter::FilterQuery;
pub use insert::InsertStatement;
pub use update::UpdateStatement;

use crate::error::{CatalogError, CatalogResult};
use crate::schema::Schema;
use crate::value::Value;

/// Sparse input: any subset of the schema's fields, plus keys that are ignored.
pub type SparseInput = serde_json::Map<String, serde_json::Value>;

/// Placeholder style used when rendering SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` for every parameter.
    #[default]
    Question,
    /// `$1, $2, ...` numbered in encounter order.
    Dollar,
}

/// SQL text writer that numbers placeholders as they are pushed.
pub(crate) struct SqlText {
    out: String,
    style: Placeholder,
    count: usize,
}

impl SqlText {
    pub(crate) fn new(style: Placeholder) -> Self {
        Self {
            out: String::new(),
            style,
            count: 0,
        }
    }

    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.out.push_str(sql);
        self
    }

    pub(crate) fn push_param(&mut self) -> &mut Self {
        self.count += 1;
        match self.style {
            Placeholder::Question => self.out.push('?'),
            Placeholder::Dollar => {
                use std::fmt::Write;
                let _ = write!(self.out, "${}", self.count);
            }
        }
        self
    }

    /// Render `col = ?` pairs joined by `sep`.
    pub(crate) fn push_assignments(&mut self, columns: &[&str], sep: &str) -> &mut Self {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.push(column).push(" = ").push_param();
        }
        self
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Stateless builder over one [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct PartialQueryBuilder<'s> {
    schema: &'s Schema,
}

impl<'s> PartialQueryBuilder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Build an equality filter over the optional fields present in `query`.
    ///
    /// `null` and empty-string values count as absent. No recognized field
    /// yields an empty filter that selects every record.
    pub fn build_filter(&self, query: &SparseInput) -> CatalogResult<FilterQuery> {
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for field in self.schema.optional_fields() {
            let Some(raw) = query.get(field.name()) else {
                continue;
            };
            if raw.is_null() || raw.as_str() == Some("") {
                continue;
            }
            params.push(field.coerce(raw)?);
            columns.push(field.name());
        }
        Ok(FilterQuery::new(columns, params))
    }

    /// Build an insert: every mandatory field first, then the optional fields
    /// present in `body`.
    ///
    /// A missing, `null` or blank mandatory field fails with
    /// [`CatalogError::Validation`]. Optional fields given as `null` are left out.
    pub fn build_insert(&self, body: &SparseInput) -> CatalogResult<InsertStatement> {
        let mut columns = Vec::with_capacity(self.schema.fields().len());
        let mut params = Vec::with_capacity(self.schema.fields().len());
        for field in self.schema.required_fields() {
            let value = match body.get(field.name()) {
                Some(raw) => field.coerce(raw)?,
                None => Value::Null,
            };
            if value.is_null() {
                return Err(CatalogError::validation(format!(
                    "Field '{}' is required",
                    field.name()
                )));
            }
            columns.push(field.name());
            params.push(value);
        }
        for field in self.schema.optional_fields() {
            let Some(raw) = body.get(field.name()) else {
                continue;
            };
            let value = field.coerce(raw)?;
            if value.is_null() {
                continue;
            }
            columns.push(field.name());
            params.push(value);
        }
        Ok(InsertStatement::new(columns, params))
    }

    /// Build `SET field = ?, ...` for every field present in `body`, with `id`
    /// bound last for the `WHERE` predicate.
    ///
    /// Fails with [`CatalogError::NoFields`] when `body` names no schema field.
    /// Optional fields given as `null` are cleared; a mandatory field cannot be.
    pub fn build_partial_update(
        &self,
        id: i64,
        body: &SparseInput,
    ) -> CatalogResult<UpdateStatement> {
        let mut columns = Vec::new();
        let mut values = Vec::new();
        for field in self.schema.fields() {
            let Some(raw) = body.get(field.name()) else {
                continue;
            };
            let value = field.coerce(raw)?;
            if value.is_null() && field.is_required() {
                return Err(CatalogError::validation(format!(
                    "Field '{}' cannot be null",
                    field.name()
                )));
            }
            columns.push(field.name());
            values.push(value);
        }
        if columns.is_empty() {
            return Err(CatalogError::NoFields);
        }
        Ok(UpdateStatement::new(id, columns, values))
    }
}
