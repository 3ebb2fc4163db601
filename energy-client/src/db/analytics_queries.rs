//! Aggregate reports over productions joined with generators and types.
//!
//! `$1` is the inclusive lower bound (NULL = unbounded), `$2` the inclusive
//! upper bound (NULL = unbounded; the API always supplies one).

use sqlx::PgPool;

use crate::{
    domain::{DailyProduction, DateRange, GeneratorEfficiency, RenewableSummary},
    error::{StoreError, StoreResult},
};

/// Daily total, renewable and non-renewable MW, newest day first.
pub async fn total_production_by_date(pool: &PgPool, range: DateRange) -> StoreResult<Vec<DailyProduction>> {
    sqlx::query_as::<_, DailyProduction>(
        r#"
        SELECT
            p.date,
            SUM(p.production_mw)                                                   AS total_production,
            COALESCE(SUM(p.production_mw) FILTER (WHERE t.is_renewable), 0)::float8     AS renewable_production,
            COALESCE(SUM(p.production_mw) FILTER (WHERE NOT t.is_renewable), 0)::float8 AS non_renewable_production
        FROM productions p
        JOIN generators g ON g.id = p.generator_id
        JOIN types t ON t.id = g.type_id
        WHERE ($1::date IS NULL OR p.date >= $1)
          AND ($2::date IS NULL OR p.date <= $2)
        GROUP BY p.date
        ORDER BY p.date DESC
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
    .map_err(|e| StoreError::database("compute total production by date", e))
}

/// Left-joins productions so idle generators still appear, with NULL
/// average and efficiency sorted last.
pub async fn generator_efficiency(pool: &PgPool, range: DateRange) -> StoreResult<Vec<GeneratorEfficiency>> {
    sqlx::query_as::<_, GeneratorEfficiency>(
        r#"
        SELECT
            g.id                                  AS generator_id,
            t.name                                AS type_name,
            g.capacity,
            COALESCE(SUM(p.production_mw), 0)::float8 AS total_production,
            AVG(p.production_mw)                  AS avg_daily_production,
            ROUND((AVG(p.production_mw) / g.capacity * 100)::numeric, 2)::float8 AS efficiency_percentage
        FROM generators g
        JOIN types t ON t.id = g.type_id
        LEFT JOIN productions p
          ON p.generator_id = g.id
         AND ($1::date IS NULL OR p.date >= $1)
         AND ($2::date IS NULL OR p.date <= $2)
        GROUP BY g.id, t.name, g.capacity
        ORDER BY efficiency_percentage DESC NULLS LAST, lower(t.name) COLLATE "C", g.id
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
    .map_err(|e| StoreError::database("compute generator efficiency", e))
}

/// Both partitions are always returned; percentages are 0 when nothing was
/// produced in range.
pub async fn renewable_summary(pool: &PgPool, range: DateRange) -> StoreResult<Vec<RenewableSummary>> {
    sqlx::query_as::<_, RenewableSummary>(
        r#"
        WITH partitions (is_renewable, energy_type) AS (
            VALUES (TRUE, 'Renewable'::text), (FALSE, 'Non-Renewable'::text)
        ),
        per_generator AS (
            SELECT
                g.id,
                g.capacity,
                t.is_renewable,
                COUNT(p.id)                       AS record_count,
                COALESCE(SUM(p.production_mw), 0) AS production
            FROM generators g
            JOIN types t ON t.id = g.type_id
            LEFT JOIN productions p
              ON p.generator_id = g.id
             AND ($1::date IS NULL OR p.date >= $1)
             AND ($2::date IS NULL OR p.date <= $2)
            GROUP BY g.id, g.capacity, t.is_renewable
        ),
        totals AS (
            SELECT
                pt.energy_type,
                COALESCE(SUM(pg.capacity), 0)::float8   AS total_capacity,
                COUNT(pg.id)                            AS generator_count,
                COALESCE(SUM(pg.production), 0)::float8 AS total_production,
                COALESCE(
                    SUM(pg.production) / NULLIF(SUM(pg.record_count), 0)::float8,
                    0
                )::float8                               AS avg_production
            FROM partitions pt
            LEFT JOIN per_generator pg ON pg.is_renewable = pt.is_renewable
            GROUP BY pt.energy_type
        )
        SELECT
            energy_type,
            total_capacity,
            generator_count,
            total_production,
            avg_production,
            CASE
                WHEN SUM(total_production) OVER () = 0 THEN 0::float8
                ELSE ROUND((total_production / SUM(total_production) OVER () * 100)::numeric, 2)::float8
            END AS percentage_of_total
        FROM totals
        ORDER BY energy_type
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
    .map_err(|e| StoreError::database("compute renewable summary", e))
}
