use super::RecordStore;
use crate::builder::{FilterQuery, InsertStatement, Placeholder, UpdateStatement};
use crate::error::{CatalogError, CatalogResult};
use crate::record::Game;
use crate::schema::Schema;
use crate::value::Value;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;

/// Record store backed by PostgreSQL.
///
/// Statements are rendered with `$1, $2, ...` placeholders; parameters are
/// bound in the order the builder produced them.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
    schema: Schema,
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("table", &self.schema.table())
            .field("pool", &self.pool.status())
            .finish()
    }
}

fn params_ref(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

fn log_sql(sql: &str, param_count: usize) {
    tracing::debug!(target: "gamelib.sql", param_count, sql = %sql);
}

impl PgStore {
    /// Store over the built-in games table.
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            schema: Schema::games(),
        }
    }

    /// Store over another table with the game columns.
    ///
    /// Fails with [`CatalogError::Validation`] when `schema` does not map onto
    /// [`Game`].
    pub fn with_schema(pool: Pool, schema: Schema) -> CatalogResult<Self> {
        Game::check_schema(&schema)?;
        Ok(Self { pool, schema })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create the table if it does not exist yet.
    pub async fn ensure_table(&self) -> CatalogResult<()> {
        let ddl = self.schema.create_table_sql();
        log_sql(&ddl, 0);
        let client = self.pool.get().await?;
        client
            .batch_execute(ddl.as_str())
            .await
            .map_err(CatalogError::from_db_error)?;
        tracing::info!(table = self.schema.table(), "table ready");
        Ok(())
    }

    async fn fetch_opt(&self, sql: &str, params: &[Value]) -> CatalogResult<Option<Game>> {
        log_sql(sql, params.len());
        let client = self.pool.get().await?;
        let row = client
            .query_opt(sql, &params_ref(params))
            .await
            .map_err(CatalogError::from_db_error)?;
        row.as_ref().map(Game::from_row).transpose()
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> CatalogResult<u64> {
        log_sql(sql, params.len());
        let client = self.pool.get().await?;
        client
            .execute(sql, &params_ref(params))
            .await
            .map_err(CatalogError::from_db_error)
    }
}

impl RecordStore for PgStore {
    async fn insert(&self, stmt: &InsertStatement) -> CatalogResult<i64> {
        let mut sql = stmt.to_sql(&self.schema, Placeholder::Dollar);
        sql.push_str(" RETURNING ");
        sql.push_str(self.schema.primary_key());
        log_sql(&sql, stmt.params().len());

        let client = self.pool.get().await?;
        let row = client
            .query_one(sql.as_str(), &params_ref(stmt.params()))
            .await
            .map_err(CatalogError::from_db_error)?;
        row.try_get::<_, i64>(0)
            .map_err(|e| CatalogError::decode(self.schema.primary_key(), e.to_string()))
    }

    async fn select_where(&self, filter: &FilterQuery) -> CatalogResult<Vec<Game>> {
        let sql = filter.to_select_sql(&self.schema, Placeholder::Dollar);
        log_sql(&sql, filter.params().len());

        let client = self.pool.get().await?;
        let rows = client
            .query(sql.as_str(), &params_ref(filter.params()))
            .await
            .map_err(CatalogError::from_db_error)?;
        rows.iter().map(Game::from_row).collect()
    }

    async fn select_by_id(&self, id: i64) -> CatalogResult<Option<Game>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.schema.column_list(),
            self.schema.table(),
            self.schema.primary_key()
        );
        self.fetch_opt(&sql, &[Value::Integer(id)]).await
    }

    async fn select_by_name(&self, name: &str) -> CatalogResult<Option<Game>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE name = $1 ORDER BY {} LIMIT 1",
            self.schema.column_list(),
            self.schema.table(),
            self.schema.primary_key()
        );
        self.fetch_opt(&sql, &[Value::from(name)]).await
    }

    async fn update_where(&self, stmt: &UpdateStatement) -> CatalogResult<u64> {
        let sql = stmt.to_sql(&self.schema, Placeholder::Dollar);
        self.execute(&sql, stmt.params()).await
    }

    async fn delete_by_id(&self, id: i64) -> CatalogResult<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            self.schema.table(),
            self.schema.primary_key()
        );
        self.execute(&sql, &[Value::Integer(id)]).await
    }

    async fn count(&self) -> CatalogResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.schema.table());
        log_sql(&sql, 0);

        let client = self.pool.get().await?;
        let row = client
            .query_one(sql.as_str(), &[])
            .await
            .map_err(CatalogError::from_db_error)?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| CatalogError::decode("count", e.to_string()))?;
        Ok(count.max(0) as u64)
    }
}
