use super::RecordStore;
use crate::builder::{FilterQuery, InsertStatement, UpdateStatement};
use crate::error::{CatalogError, CatalogResult};
use crate::record::Game;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Inner {
    rows: BTreeMap<i64, Game>,
    /// Last id handed out. Never decremented, so ids are not reused after delete.
    last_id: i64,
}

/// Record store backed by an ordered map keyed by id.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| CatalogError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| CatalogError::Storage("in-memory store lock poisoned".to_string()))
    }
}

fn filter_matches(filter: &FilterQuery, game: &Game) -> bool {
    filter
        .predicates()
        .all(|(column, expected)| game.get(column).as_ref() == Some(expected))
}

impl RecordStore for InMemoryStore {
    async fn insert(&self, stmt: &InsertStatement) -> CatalogResult<i64> {
        let mut inner = self.write()?;
        let id = inner.last_id + 1;
        let game = Game::from_insert(id, stmt)?;
        inner.rows.insert(id, game);
        inner.last_id = id;
        tracing::trace!(target: "gamelib.store", id, "in-memory insert");
        Ok(id)
    }

    async fn select_where(&self, filter: &FilterQuery) -> CatalogResult<Vec<Game>> {
        let inner = self.read()?;
        Ok(inner
            .rows
            .values()
            .filter(|game| filter_matches(filter, game))
            .cloned()
            .collect())
    }

    async fn select_by_id(&self, id: i64) -> CatalogResult<Option<Game>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn select_by_name(&self, name: &str) -> CatalogResult<Option<Game>> {
        Ok(self
            .read()?
            .rows
            .values()
            .find(|game| game.name == name)
            .cloned())
    }

    async fn update_where(&self, stmt: &UpdateStatement) -> CatalogResult<u64> {
        let mut inner = self.write()?;
        let Some(game) = inner.rows.get_mut(&stmt.id()) else {
            return Ok(0);
        };
        // Apply to a copy so a bad value leaves the stored row untouched.
        let mut updated = game.clone();
        for (column, value) in stmt.changes() {
            updated.set(column, value)?;
        }
        *game = updated;
        Ok(1)
    }

    async fn delete_by_id(&self, id: i64) -> CatalogResult<u64> {
        Ok(u64::from(self.write()?.rows.remove(&id).is_some()))
    }

    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.read()?.rows.len() as u64)
    }
}
