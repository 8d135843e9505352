//! Record store contract and its implementations.
//!
//! The builder decides *what* to run; a [`RecordStore`] runs it. Two stores
//! implement the same contract:
//!
//! - [`InMemoryStore`]: ordered map keyed by id, for tests and ephemeral use
//! - [`PgStore`]: PostgreSQL through a `deadpool-postgres` pool (feature `pool`)

mod memory;
#[cfg(feature = "pool")]
mod postgres;

pub use memory::InMemoryStore;
#[cfg(feature = "pool")]
pub use postgres::PgStore;

use crate::builder::{FilterQuery, InsertStatement, UpdateStatement};
use crate::error::CatalogResult;
use crate::record::Game;

/// Create/read/update/delete over catalog records.
///
/// Every operation is a single statement; concurrent writers are serialized by
/// the store itself.
pub trait RecordStore: Send + Sync {
    /// Insert a record and return the id the store assigned.
    fn insert(
        &self,
        stmt: &InsertStatement,
    ) -> impl std::future::Future<Output = CatalogResult<i64>> + Send;

    /// All records matching `filter`, ordered by id.
    fn select_where(
        &self,
        filter: &FilterQuery,
    ) -> impl std::future::Future<Output = CatalogResult<Vec<Game>>> + Send;

    /// The record with `id`, if any.
    fn select_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = CatalogResult<Option<Game>>> + Send;

    /// The lowest-id record whose name equals `name` exactly, if any.
    fn select_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = CatalogResult<Option<Game>>> + Send;

    /// Apply a partial update. Returns the number of affected rows (0 or 1).
    fn update_where(
        &self,
        stmt: &UpdateStatement,
    ) -> impl std::future::Future<Output = CatalogResult<u64>> + Send;

    /// Delete by id. Returns the number of affected rows (0 or 1).
    fn delete_by_id(&self, id: i64)
    -> impl std::future::Future<Output = CatalogResult<u64>> + Send;

    /// Number of records currently stored.
    fn count(&self) -> impl std::future::Future<Output = CatalogResult<u64>> + Send;
}
