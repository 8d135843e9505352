//! Catalog schema: field names, their semantic types, and canonical order.
//!
//! Field declaration order is the canonical order used by every builder
//! operation, so parameter sequences are deterministic. Mandatory fields must
//! be declared before optional ones.

use crate::error::{CatalogError, CatalogResult};
use crate::ident::validate_ident;
use crate::value::Value;
use serde_json::Value as JsonValue;

/// ESRB rating letters accepted by the `rating` field of [`Schema::games`].
pub const RATINGS: &[&str] = &["EC", "E", "E10+", "T", "M", "AO", "RP"];

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free-form text.
    Text,
    /// 64-bit integer. Numeric strings are accepted (query strings are text).
    Integer,
    /// Text restricted to a fixed set of values.
    EnumText(&'static [&'static str]),
}

impl FieldType {
    /// Column type used by the table bootstrap DDL.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text | Self::EnumText(_) => "TEXT",
            Self::Integer => "BIGINT",
        }
    }
}

/// A single schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    ty: FieldType,
    required: bool,
}

impl Field {
    /// A mandatory field.
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    /// An optional field.
    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Convert a raw JSON input value into a typed parameter.
    ///
    /// `null` becomes [`Value::Null`]; whether that is allowed is the caller's
    /// decision. Mandatory text must not be blank.
    pub fn coerce(&self, raw: &JsonValue) -> CatalogResult<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        let value = match self.ty {
            FieldType::Text => match raw {
                JsonValue::String(s) => Value::Text(s.clone()),
                _ => return Err(self.type_error("a string")),
            },
            FieldType::Integer => match raw {
                JsonValue::Number(n) => match n.as_i64() {
                    Some(v) => Value::Integer(v),
                    None => return Err(self.type_error("an integer")),
                },
                JsonValue::String(s) => match s.trim().parse::<i64>() {
                    Ok(v) => Value::Integer(v),
                    Err(_) => return Err(self.type_error("an integer")),
                },
                _ => return Err(self.type_error("an integer")),
            },
            FieldType::EnumText(allowed) => match raw {
                JsonValue::String(s) if allowed.contains(&s.as_str()) => Value::Text(s.clone()),
                _ => {
                    return Err(CatalogError::validation(format!(
                        "Field '{}' must be one of: {}",
                        self.name,
                        allowed.join(", ")
                    )));
                }
            },
        };

        if self.required && value.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Err(CatalogError::validation(format!(
                "Field '{}' must not be empty",
                self.name
            )));
        }

        Ok(value)
    }

    fn type_error(&self, expected: &str) -> CatalogError {
        CatalogError::validation(format!("Field '{}' must be {expected}", self.name))
    }
}

/// An ordered field set over one table with an integer primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table: &'static str,
    primary_key: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema, validating identifiers and field order.
    pub fn new(
        table: &'static str,
        primary_key: &'static str,
        fields: Vec<Field>,
    ) -> CatalogResult<Self> {
        validate_ident(table)?;
        validate_ident(primary_key)?;

        let mut seen_optional = false;
        for (i, field) in fields.iter().enumerate() {
            validate_ident(field.name)?;
            if field.name == primary_key {
                return Err(CatalogError::validation(format!(
                    "Field '{}' collides with the primary key",
                    field.name
                )));
            }
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(CatalogError::validation(format!(
                    "Duplicate field '{}'",
                    field.name
                )));
            }
            if field.required && seen_optional {
                return Err(CatalogError::validation(format!(
                    "Mandatory field '{}' must be declared before optional fields",
                    field.name
                )));
            }
            seen_optional |= !field.required;
        }

        if !fields.iter().any(|f| f.required) {
            return Err(CatalogError::validation(
                "Schema needs at least one mandatory field",
            ));
        }

        Ok(Self {
            table,
            primary_key,
            fields,
        })
    }

    /// The game catalog: `games(id, name, category?, year?, rating?)`.
    pub fn games() -> Self {
        Self {
            table: "games",
            primary_key: "id",
            fields: vec![
                Field::required("name", FieldType::Text),
                Field::optional("category", FieldType::Text),
                Field::optional("year", FieldType::Integer),
                Field::optional("rating", FieldType::EnumText(RATINGS)),
            ],
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    /// All fields in canonical order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.required)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Primary key followed by every field, comma-separated.
    pub fn column_list(&self) -> String {
        let mut out = String::from(self.primary_key);
        for f in &self.fields {
            out.push_str(", ");
            out.push_str(f.name);
        }
        out
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this schema.
    pub fn create_table_sql(&self) -> String {
        let mut out = format!(
            "CREATE TABLE IF NOT EXISTS {} ({} BIGSERIAL PRIMARY KEY",
            self.table, self.primary_key
        );
        for f in &self.fields {
            out.push_str(", ");
            out.push_str(f.name);
            out.push(' ');
            out.push_str(f.ty.sql_type());
            if f.required {
                out.push_str(" NOT NULL");
            }
        }
        out.push(')');
        out
    }
}
