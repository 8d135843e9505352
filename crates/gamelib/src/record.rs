//! Catalog record and row mapping.

use crate::builder::InsertStatement;
use crate::error::{CatalogError, CatalogResult};
use crate::schema::Schema;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<String>,
}

impl Game {
    /// Check that `schema` has the columns this record maps.
    ///
    /// The table name is free; the primary key must be `id` and the fields must
    /// be those of [`Schema::games`], in the same order and with the same types.
    pub fn check_schema(schema: &Schema) -> CatalogResult<()> {
        let games = Schema::games();
        if schema.primary_key() != games.primary_key() || schema.fields() != games.fields() {
            return Err(CatalogError::validation(format!(
                "Schema for '{}' does not match the game record (expected {})",
                schema.table(),
                games.column_list()
            )));
        }
        Ok(())
    }

    /// Materialize a freshly inserted record.
    pub fn from_insert(id: i64, stmt: &InsertStatement) -> CatalogResult<Self> {
        let mut game = Self {
            id,
            name: String::new(),
            category: None,
            year: None,
            rating: None,
        };
        for (column, value) in stmt.columns().iter().zip(stmt.params()) {
            game.set(column, value)?;
        }
        if game.name.is_empty() {
            return Err(CatalogError::validation("Field 'name' is required"));
        }
        Ok(game)
    }

    /// Current value of a field, `Value::Null` when unset.
    pub fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Integer(self.id)),
            "name" => Some(Value::Text(self.name.clone())),
            "category" => Some(self.category.clone().into()),
            "year" => Some(self.year.into()),
            "rating" => Some(self.rating.clone().into()),
            _ => None,
        }
    }

    /// Overwrite one field. `id` is immutable and not settable.
    pub fn set(&mut self, column: &str, value: &Value) -> CatalogResult<()> {
        let mismatch =
            || CatalogError::decode(column, format!("unexpected value {value} for this column"));
        match (column, value) {
            ("name", Value::Text(s)) => self.name = s.clone(),
            ("category", Value::Text(s)) => self.category = Some(s.clone()),
            ("category", Value::Null) => self.category = None,
            ("year", Value::Integer(v)) => self.year = Some(*v),
            ("year", Value::Null) => self.year = None,
            ("rating", Value::Text(s)) => self.rating = Some(s.clone()),
            ("rating", Value::Null) => self.rating = None,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Map a `SELECT id, name, category, year, rating` row.
    pub fn from_row(row: &Row) -> CatalogResult<Self> {
        Ok(Self {
            id: try_get(row, "id")?,
            name: try_get(row, "name")?,
            category: try_get(row, "category")?,
            year: try_get(row, "year")?,
            rating: try_get(row, "rating")?,
        })
    }
}

fn try_get<'a, T: FromSql<'a>>(row: &'a Row, column: &str) -> CatalogResult<T> {
    row.try_get(column)
        .map_err(|e| CatalogError::decode(column, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PartialQueryBuilder;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn from_insert_fills_present_fields() {
        let schema = Schema::games();
        let body = json!({ "name": "Sonic the Hedgehog", "year": 1991, "rating": "E" });
        let stmt = PartialQueryBuilder::new(&schema)
            .build_insert(body.as_object().unwrap())
            .unwrap();
        let game = Game::from_insert(3, &stmt).unwrap();
        assert_eq!(
            game,
            Game {
                id: 3,
                name: "Sonic the Hedgehog".into(),
                category: None,
                year: Some(1991),
                rating: Some("E".into()),
            }
        );
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut game = Game {
            id: 1,
            name: "Tetris".into(),
            category: Some("puzzle".into()),
            year: None,
            rating: None,
        };
        game.set("year", &Value::from(1984)).unwrap();
        game.set("category", &Value::Null).unwrap();
        assert_eq!(game.get("year"), Some(Value::Integer(1984)));
        assert_eq!(game.get("category"), Some(Value::Null));
        assert_eq!(game.get("foo"), None);

        assert!(game.set("id", &Value::from(9)).is_err());
        assert!(game.set("name", &Value::Null).is_err());
        assert!(game.set("year", &Value::from("1984")).is_err());
    }

    #[test]
    fn check_schema_accepts_renamed_table_only() {
        use crate::schema::{Field, FieldType, RATINGS};

        let renamed = Schema::new(
            "games_archive",
            "id",
            vec![
                Field::required("name", FieldType::Text),
                Field::optional("category", FieldType::Text),
                Field::optional("year", FieldType::Integer),
                Field::optional("rating", FieldType::EnumText(RATINGS)),
            ],
        )
        .unwrap();
        assert!(Game::check_schema(&renamed).is_ok());
        assert!(Game::check_schema(&Schema::games()).is_ok());

        let other_fields = Schema::new(
            "books",
            "id",
            vec![
                Field::required("title", FieldType::Text),
                Field::optional("year", FieldType::Integer),
            ],
        )
        .unwrap();
        assert!(matches!(
            Game::check_schema(&other_fields),
            Err(CatalogError::Validation(_))
        ));

        let other_key = Schema::new(
            "games",
            "game_id",
            vec![
                Field::required("name", FieldType::Text),
                Field::optional("category", FieldType::Text),
                Field::optional("year", FieldType::Integer),
                Field::optional("rating", FieldType::EnumText(RATINGS)),
            ],
        )
        .unwrap();
        assert!(Game::check_schema(&other_key).is_err());
    }

    #[test]
    fn serializes_nulls_for_missing_optionals() {
        let game = Game {
            id: 2,
            name: "Tetris".into(),
            category: None,
            year: None,
            rating: None,
        };
        assert_eq!(
            serde_json::to_value(&game).unwrap(),
            json!({ "id": 2, "name": "Tetris", "category": null, "year": null, "rating": null })
        );
    }
}
