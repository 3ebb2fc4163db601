use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Create the tables, indexes and constraints if they do not exist yet.
pub async fn apply_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| StoreError::database("apply schema", e))?;
    tracing::info!("schema applied");
    Ok(())
}
