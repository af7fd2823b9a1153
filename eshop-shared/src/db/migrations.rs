/// Schema migrations
///
/// Migrations are embedded at compile time from the workspace-level
/// `migrations/` directory and applied in version order. Already-applied
/// versions are skipped, so running this on every start is safe.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}
