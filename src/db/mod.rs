pub mod backend;
pub mod instrumented;
pub mod memory;
pub mod schema;

#[cfg(feature = "postgres")]
pub mod postgres;

use anyhow::Result;
use std::sync::Arc;

#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;

pub use backend::DatabaseBackend;
pub use instrumented::InstrumentedDatabase;
pub use memory::MemoryBackend;

/// Database connection type - polymorphic over backends
pub type Database = Arc<dyn DatabaseBackend>;

/// URL scheme selecting the in-process store
pub const MEMORY_URL_SCHEME: &str = "memory:";

/// Initialize the database backend selected by the configured URL
pub async fn init_database(config: &crate::config::DatabaseConfig) -> Result<Database> {
    let backend: Database = if config.url.starts_with(MEMORY_URL_SCHEME) {
        tracing::info!("Initializing in-memory backend");
        Arc::new(MemoryBackend::new())
    } else {
        connect_postgres(config).await?
    };

    Ok(Arc::new(InstrumentedDatabase::new(backend)) as Database)
}

#[cfg(feature = "postgres")]
async fn connect_postgres(config: &crate::config::DatabaseConfig) -> Result<Database> {
    tracing::info!("Initializing PostgreSQL backend");
    let pool = postgres::connection::create_pool(config).await?;
    postgres::connection::test_connection(&pool).await?;
    schema::run_migrations(&pool).await?;
    Ok(Arc::new(PostgresBackend::new(pool)) as Database)
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_config: &crate::config::DatabaseConfig) -> Result<Database> {
    anyhow::bail!("PostgreSQL support is not compiled in; use a memory:// DATABASE_URL")
}
