use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    domain::{EnergyType, NewEnergyType},
    error::{violation, StoreError, StoreResult, Violation},
};

fn write_error(context: &'static str, name: &str, err: sqlx::Error) -> StoreError {
    match violation(&err) {
        Violation::Unique => StoreError::DuplicateName {
            name: name.to_string(),
        },
        Violation::Check => StoreError::InvalidRecord(err.to_string()),
        _ => StoreError::database(context, err),
    }
}

pub async fn insert_type(pool: &PgPool, new: &NewEnergyType) -> StoreResult<EnergyType> {
    let now = OffsetDateTime::now_utc();
    let row = sqlx::query_as::<_, EnergyType>(
        r#"
        INSERT INTO types (id, name, description, is_renewable, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, name, description, is_renewable, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.is_renewable)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| write_error("create type", &new.name, e))?;

    tracing::info!(id = %row.id, name = %row.name, "type created");
    Ok(row)
}

pub async fn find_type(pool: &PgPool, id: Uuid) -> StoreResult<Option<EnergyType>> {
    sqlx::query_as::<_, EnergyType>(
        r#"
        SELECT id, name, description, is_renewable, created_at, updated_at
        FROM types
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StoreError::database("get type", e))
}

pub async fn list_types(pool: &PgPool, is_renewable: Option<bool>) -> StoreResult<Vec<EnergyType>> {
    sqlx::query_as::<_, EnergyType>(
        r#"
        SELECT id, name, description, is_renewable, created_at, updated_at
        FROM types
        WHERE ($1::boolean IS NULL OR is_renewable = $1)
        ORDER BY lower(name) COLLATE "C", id
        "#,
    )
    .bind(is_renewable)
    .fetch_all(pool)
    .await
    .map_err(|e| StoreError::database("list types", e))
}

/// Returns `None` when the row disappeared since it was read.
pub async fn update_type(pool: &PgPool, id: Uuid, merged: &NewEnergyType) -> StoreResult<Option<EnergyType>> {
    let row = sqlx::query_as::<_, EnergyType>(
        r#"
        UPDATE types
        SET name = $2, description = $3, is_renewable = $4, updated_at = $5
        WHERE id = $1
        RETURNING id, name, description, is_renewable, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&merged.name)
    .bind(&merged.description)
    .bind(merged.is_renewable)
    .bind(OffsetDateTime::now_utc())
    .fetch_optional(pool)
    .await
    .map_err(|e| write_error("update type", &merged.name, e))?;

    if row.is_some() {
        tracing::info!(id = %id, "type updated");
    }
    Ok(row)
}

/// Generators and their production records go with the type (ON DELETE CASCADE).
pub async fn delete_type(pool: &PgPool, id: Uuid) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StoreError::database("delete type", e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("type", id));
    }
    tracing::info!(id = %id, "type deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fake::constraint_error;

    #[test]
    fn unique_violation_is_a_duplicate_name() {
        let err = write_error("insert type", "Solar", constraint_error(Violation::Unique));
        assert!(matches!(err, StoreError::DuplicateName { ref name } if name == "Solar"));
    }

    #[test]
    fn other_failures_keep_their_context() {
        let err = write_error("update type", "Solar", constraint_error(Violation::Other));
        assert!(matches!(err, StoreError::Database { context: "update type", .. }));
        let err = write_error("insert type", "Solar", constraint_error(Violation::Check));
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }
}
