#[cfg(feature = "postgres")]
use anyhow::{Context, Result};
#[cfg(feature = "postgres")]
use sqlx::PgPool;
#[cfg(feature = "postgres")]
use tracing::info;

#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
const MIGRATION_SQL: &str = include_str!("../../migrations/001_initial_schema.sql");

#[cfg(feature = "postgres")]
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    for (i, statement) in split_sql_statements(MIGRATION_SQL).iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| {
                format!(
                    "Failed to execute migration statement {}: {}",
                    i + 1,
                    statement.chars().take(100).collect::<String>()
                )
            })?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Split a migration script into statements, dropping `--` comment lines.
/// The schema has no function bodies, so a trailing `;` always ends a statement.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            statements.push(current.trim().to_string());
            current.clear();
        }
    }

    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}
