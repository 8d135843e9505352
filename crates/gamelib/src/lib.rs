//! # gamelib
//!
//! A small game-library catalog over PostgreSQL or an in-memory store.
//!
//! ## Features
//!
//! - **Partial queries**: build filters, inserts and partial updates from a
//!   sparse JSON object, naming only the fields the caller supplied
//! - **Injection safe**: values are always bound as positional parameters;
//!   column names come from a fixed, validated schema
//! - **Deterministic SQL**: fields always appear in schema order
//!   (`name, category, year, rating`), whatever order the input used
//! - **Pluggable storage**: one [`RecordStore`] contract, two stores
//!
//! ## Query Builder
//!
//! ```ignore
//! use gamelib::{PartialQueryBuilder, Placeholder, Schema};
//!
//! let schema = Schema::games();
//! let builder = PartialQueryBuilder::new(&schema);
//!
//! let filter = builder.build_filter(&query)?;
//! assert_eq!(filter.clause(), "category = ? AND year = ?");
//!
//! let update = builder.build_partial_update(7, &body)?;
//! let sql = update.to_sql(&schema, Placeholder::Dollar);
//! ```
//!
//! ## Catalog
//!
//! ```ignore
//! use gamelib::{Catalog, InMemoryStore};
//!
//! let catalog = Catalog::new(InMemoryStore::new());
//! catalog.seed_defaults().await?;
//! let found = catalog.search("Tetris").await?;
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ident;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use builder::{
    FilterQuery, InsertStatement, PartialQueryBuilder, Placeholder, SparseInput, UpdateStatement,
};
pub use catalog::{Catalog, Created, DEFAULT_GAMES, Deleted, SearchResult, Updated};
pub use config::{CatalogConfig, DATABASE_URL_ENV, StoreKind};
pub use error::{CatalogError, CatalogResult, ErrorBody};
pub use record::Game;
pub use schema::{Field, FieldType, RATINGS, Schema};
pub use store::{InMemoryStore, RecordStore};
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
#[cfg(feature = "pool")]
pub use store::PgStore;

// Re-export deadpool_postgres for pool users
#[cfg(feature = "pool")]
pub use deadpool_postgres;
