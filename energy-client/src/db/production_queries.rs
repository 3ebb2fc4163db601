use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    domain::{NewProduction, Production, ProductionFilter},
    error::{violation, StoreError, StoreResult, Violation},
    store::invalid_production,
};

const ENRICHED_COLUMNS: &str = r#"
    p.id,
    p.generator_id,
    g.capacity     AS generator_capacity,
    t.name         AS type_name,
    t.is_renewable,
    p.date,
    p.production_mw,
    p.created_at,
    p.updated_at
"#;

fn write_error(context: &'static str, new: &NewProduction, err: sqlx::Error) -> StoreError {
    match violation(&err) {
        Violation::Unique => StoreError::DuplicatePeriod {
            generator_id: new.generator_id,
            date: new.date,
        },
        Violation::ForeignKey => StoreError::ForeignKeyViolation {
            entity: "generator",
            id: new.generator_id,
        },
        Violation::Check => StoreError::InvalidRecord(err.to_string()),
        Violation::Other => StoreError::database(context, err),
    }
}

pub async fn insert_production(pool: &PgPool, new: &NewProduction) -> StoreResult<Production> {
    if let Some(reason) = invalid_production(new.production_mw) {
        return Err(StoreError::InvalidRecord(reason));
    }

    let sql = format!(
        r#"
        WITH p AS (
            INSERT INTO productions (id, generator_id, date, production_mw, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, generator_id, date, production_mw, created_at, updated_at
        )
        SELECT {ENRICHED_COLUMNS}
        FROM p
        JOIN generators g ON g.id = p.generator_id
        JOIN types t ON t.id = g.type_id
        "#
    );

    let row = sqlx::query_as::<_, Production>(&sql)
        .bind(Uuid::new_v4())
        .bind(new.generator_id)
        .bind(new.date)
        .bind(new.production_mw)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(pool)
        .await
        .map_err(|e| write_error("create production", new, e))?;

    tracing::info!(id = %row.id, generator_id = %row.generator_id, date = %row.date, "production created");
    Ok(row)
}

pub async fn find_production(pool: &PgPool, id: Uuid) -> StoreResult<Option<Production>> {
    let sql = format!(
        r#"
        SELECT {ENRICHED_COLUMNS}
        FROM productions p
        JOIN generators g ON g.id = p.generator_id
        JOIN types t ON t.id = g.type_id
        WHERE p.id = $1
        "#
    );

    sqlx::query_as::<_, Production>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| StoreError::database("get production", e))
}

pub async fn list_productions(pool: &PgPool, filter: &ProductionFilter) -> StoreResult<Vec<Production>> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(ENRICHED_COLUMNS);
    builder.push(
        r#"
        FROM productions p
        JOIN generators g ON g.id = p.generator_id
        JOIN types t ON t.id = g.type_id
        WHERE TRUE
        "#,
    );

    if let Some(generator_id) = filter.generator_id {
        builder.push(" AND p.generator_id = ").push_bind(generator_id);
    }
    if let Some(start) = filter.range.start {
        builder.push(" AND p.date >= ").push_bind(start);
    }
    if let Some(end) = filter.range.end {
        builder.push(" AND p.date <= ").push_bind(end);
    }
    builder.push(" ORDER BY p.date DESC, lower(t.name) COLLATE \"C\", p.id");

    builder
        .build_query_as::<Production>()
        .fetch_all(pool)
        .await
        .map_err(|e| StoreError::database("list productions", e))
}

pub async fn update_production(pool: &PgPool, id: Uuid, merged: &NewProduction) -> StoreResult<Option<Production>> {
    if let Some(reason) = invalid_production(merged.production_mw) {
        return Err(StoreError::InvalidRecord(reason));
    }

    let sql = format!(
        r#"
        WITH p AS (
            UPDATE productions
            SET generator_id = $2, date = $3, production_mw = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, generator_id, date, production_mw, created_at, updated_at
        )
        SELECT {ENRICHED_COLUMNS}
        FROM p
        JOIN generators g ON g.id = p.generator_id
        JOIN types t ON t.id = g.type_id
        "#
    );

    let row = sqlx::query_as::<_, Production>(&sql)
        .bind(id)
        .bind(merged.generator_id)
        .bind(merged.date)
        .bind(merged.production_mw)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(pool)
        .await
        .map_err(|e| write_error("update production", merged, e))?;

    if row.is_some() {
        tracing::info!(id = %id, "production updated");
    }
    Ok(row)
}

pub async fn delete_production(pool: &PgPool, id: Uuid) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM productions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StoreError::database("delete production", e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("production", id));
    }
    tracing::info!(id = %id, "production deleted");
    Ok(())
}
