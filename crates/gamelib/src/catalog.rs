//! Catalog operations.
//!
//! [`Catalog`] pairs the [`PartialQueryBuilder`] with a [`RecordStore`] and
//! exposes the outward operations of the game library: list with filters,
//! get, create, partial update, delete, and search by name. Each returns a
//! serializable response body or a [`CatalogError`] whose
//! [`status_code`](CatalogError::status_code) gives the HTTP equivalent.
//!
//! Builder errors short-circuit before the store is touched; store errors are
//! logged and returned unchanged.

use crate::builder::{PartialQueryBuilder, SparseInput};
use crate::error::{CatalogError, CatalogResult};
use crate::record::Game;
use crate::schema::Schema;
use crate::store::RecordStore;
use serde::Serialize;

/// Games inserted by [`Catalog::seed_defaults`] into an empty store.
pub const DEFAULT_GAMES: &[&str] = &["Mario Bros 1", "Tetris", "Sonic the Hedgehog"];

/// Body returned by [`Catalog::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub message: String,
    pub id: i64,
}

/// Body returned by [`Catalog::update`]: the fields that were written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Updated {
    pub message: String,
    #[serde(rename = "updatedFields")]
    pub updated_fields: serde_json::Map<String, serde_json::Value>,
}

/// Body returned by [`Catalog::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub message: String,
}

/// Body returned by [`Catalog::search`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
}

/// The game catalog over a record store.
#[derive(Debug)]
pub struct Catalog<S> {
    store: S,
    schema: Schema,
}

impl<S: RecordStore> Catalog<S> {
    /// Catalog over the built-in games schema.
    pub fn new(store: S) -> Self {
        Self {
            store,
            schema: Schema::games(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn builder(&self) -> PartialQueryBuilder<'_> {
        PartialQueryBuilder::new(&self.schema)
    }

    /// `GET /games?category&year&rating`
    pub async fn list(&self, query: &SparseInput) -> CatalogResult<Vec<Game>> {
        let filter = self.builder().build_filter(query)?;
        let games = self
            .store
            .select_where(&filter)
            .await
            .inspect_err(|e| store_failure("list", e))?;
        tracing::debug!(predicates = filter.len(), found = games.len(), "listed games");
        Ok(games)
    }

    /// `GET /games/:id`
    pub async fn get(&self, id: i64) -> CatalogResult<Game> {
        self.store
            .select_by_id(id)
            .await
            .inspect_err(|e| store_failure("get", e))?
            .ok_or_else(|| CatalogError::not_found(format!("Game with id {id} doesn't exist")))
    }

    /// `POST /games`
    pub async fn create(&self, body: &SparseInput) -> CatalogResult<Created> {
        let stmt = self.builder().build_insert(body)?;
        let id = self
            .store
            .insert(&stmt)
            .await
            .inspect_err(|e| store_failure("create", e))?;
        tracing::info!(id, columns = ?stmt.columns(), "game inserted");
        Ok(Created {
            message: "Game successfully inserted.".to_string(),
            id,
        })
    }

    /// `PATCH /games/:id`
    pub async fn update(&self, id: i64, body: &SparseInput) -> CatalogResult<Updated> {
        let stmt = self.builder().build_partial_update(id, body)?;
        let affected = self
            .store
            .update_where(&stmt)
            .await
            .inspect_err(|e| store_failure("update", e))?;
        if affected == 0 {
            return Err(CatalogError::not_found("Game not found."));
        }
        tracing::info!(id, columns = ?stmt.columns(), "game updated");
        let updated_fields = stmt
            .changes()
            .map(|(column, value)| (column.to_string(), serde_json::Value::from(value)))
            .collect();
        Ok(Updated {
            message: "Game successfully updated.".to_string(),
            updated_fields,
        })
    }

    /// `DELETE /games/:id`
    pub async fn delete(&self, id: i64) -> CatalogResult<Deleted> {
        let affected = self
            .store
            .delete_by_id(id)
            .await
            .inspect_err(|e| store_failure("delete", e))?;
        if affected == 0 {
            return Err(CatalogError::not_found("Game not found."));
        }
        tracing::info!(id, "game deleted");
        Ok(Deleted {
            message: format!("Game with id {id} was deleted."),
        })
    }

    /// `GET /search?game=name`. A miss is a normal result, not an error.
    pub async fn search(&self, name: &str) -> CatalogResult<SearchResult> {
        let game = self
            .store
            .select_by_name(name)
            .await
            .inspect_err(|e| store_failure("search", e))?;
        Ok(SearchResult {
            result: format!(
                "Game called '{name}' exists in library: {}",
                game.is_some()
            ),
            game,
        })
    }

    /// Insert [`DEFAULT_GAMES`] when the store is empty. Returns how many were inserted.
    pub async fn seed_defaults(&self) -> CatalogResult<u64> {
        let existing = self
            .store
            .count()
            .await
            .inspect_err(|e| store_failure("seed", e))?;
        if existing > 0 {
            return Ok(0);
        }
        let mut inserted = 0;
        for name in DEFAULT_GAMES {
            let mut body = SparseInput::new();
            body.insert("name".to_string(), serde_json::Value::from(*name));
            let stmt = self.builder().build_insert(&body)?;
            self.store
                .insert(&stmt)
                .await
                .inspect_err(|e| store_failure("seed", e))?;
            inserted += 1;
        }
        tracing::info!(inserted, "seeded default games");
        Ok(inserted)
    }
}

fn store_failure(op: &str, err: &CatalogError) {
    if !err.is_client_error() {
        tracing::error!(op, error = %err, "store operation failed");
    }
}
