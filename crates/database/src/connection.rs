use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL listing store.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is loaded first if
/// present). The pool is cheap to clone and is shared by every request.
pub async fn connect() -> Result<PgPool, DbError> {
    // A missing .env file is fine as long as the variable is set some other way.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to the listing database.");
    Ok(pool)
}
