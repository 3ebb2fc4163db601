use anyhow::Result;
use energy_api::{config::AppConfig, observability};
use energy_client::db::schema;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    let pool = cfg
        .database
        .pool_options()
        .min_connections(0)
        .max_connections(1)
        .connect(&cfg.database.uri)
        .await?;

    // Tables, the case-insensitive name index and the (generator_id, date)
    // constraint all come from `energy-client/sql/schema.sql`.
    schema::apply_schema(&pool).await?;

    let row: (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM types),
            (SELECT COUNT(*) FROM generators),
            (SELECT COUNT(*) FROM productions)
        "#,
    )
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        types = row.0,
        generators = row.1,
        productions = row.2,
        "schema up to date"
    );

    Ok(())
}
