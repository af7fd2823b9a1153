/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health check and shutdown
/// - `migrations`: embedded schema migrations from the workspace `migrations/` directory
///
/// # Example
///
/// ```no_run
/// use eshop_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
