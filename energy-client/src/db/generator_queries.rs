use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    domain::{Generator, NewGenerator},
    error::{violation, StoreError, StoreResult, Violation},
    store::invalid_capacity,
};

fn write_error(context: &'static str, new: &NewGenerator, err: sqlx::Error) -> StoreError {
    match violation(&err) {
        Violation::ForeignKey => StoreError::ForeignKeyViolation {
            entity: "type",
            id: new.type_id,
        },
        Violation::Check => StoreError::InvalidRecord(err.to_string()),
        _ => StoreError::database(context, err),
    }
}

pub async fn insert_generator(pool: &PgPool, new: &NewGenerator) -> StoreResult<Generator> {
    if let Some(reason) = invalid_capacity(new.capacity) {
        return Err(StoreError::InvalidRecord(reason));
    }

    let row = sqlx::query_as::<_, Generator>(
        r#"
        WITH inserted AS (
            INSERT INTO generators (id, type_id, capacity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, type_id, capacity, created_at, updated_at
        )
        SELECT
            i.id,
            i.type_id,
            t.name         AS type_name,
            t.description  AS type_description,
            t.is_renewable,
            i.capacity,
            i.created_at,
            i.updated_at
        FROM inserted i
        JOIN types t ON t.id = i.type_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.type_id)
    .bind(new.capacity)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(pool)
    .await
    .map_err(|e| write_error("create generator", new, e))?;

    tracing::info!(id = %row.id, type_id = %row.type_id, capacity = row.capacity, "generator created");
    Ok(row)
}

pub async fn find_generator(pool: &PgPool, id: Uuid) -> StoreResult<Option<Generator>> {
    sqlx::query_as::<_, Generator>(
        r#"
        SELECT
            g.id,
            g.type_id,
            t.name         AS type_name,
            t.description  AS type_description,
            t.is_renewable,
            g.capacity,
            g.created_at,
            g.updated_at
        FROM generators g
        JOIN types t ON t.id = g.type_id
        WHERE g.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StoreError::database("get generator", e))
}

pub async fn list_generators(pool: &PgPool, type_id: Option<Uuid>) -> StoreResult<Vec<Generator>> {
    sqlx::query_as::<_, Generator>(
        r#"
        SELECT
            g.id,
            g.type_id,
            t.name         AS type_name,
            t.description  AS type_description,
            t.is_renewable,
            g.capacity,
            g.created_at,
            g.updated_at
        FROM generators g
        JOIN types t ON t.id = g.type_id
        WHERE ($1::uuid IS NULL OR g.type_id = $1)
        ORDER BY lower(t.name) COLLATE "C", g.capacity DESC, g.id
        "#,
    )
    .bind(type_id)
    .fetch_all(pool)
    .await
    .map_err(|e| StoreError::database("list generators", e))
}

pub async fn update_generator(pool: &PgPool, id: Uuid, merged: &NewGenerator) -> StoreResult<Option<Generator>> {
    if let Some(reason) = invalid_capacity(merged.capacity) {
        return Err(StoreError::InvalidRecord(reason));
    }

    let row = sqlx::query_as::<_, Generator>(
        r#"
        WITH updated AS (
            UPDATE generators
            SET type_id = $2, capacity = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, type_id, capacity, created_at, updated_at
        )
        SELECT
            u.id,
            u.type_id,
            t.name         AS type_name,
            t.description  AS type_description,
            t.is_renewable,
            u.capacity,
            u.created_at,
            u.updated_at
        FROM updated u
        JOIN types t ON t.id = u.type_id
        "#,
    )
    .bind(id)
    .bind(merged.type_id)
    .bind(merged.capacity)
    .bind(OffsetDateTime::now_utc())
    .fetch_optional(pool)
    .await
    .map_err(|e| write_error("update generator", merged, e))?;

    if row.is_some() {
        tracing::info!(id = %id, "generator updated");
    }
    Ok(row)
}

pub async fn delete_generator(pool: &PgPool, id: Uuid) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM generators WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StoreError::database("delete generator", e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("generator", id));
    }
    tracing::info!(id = %id, "generator deleted");
    Ok(())
}
