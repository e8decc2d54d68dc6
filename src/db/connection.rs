use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    let Some((protocol, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    // user:pass@host or user@host
    if let Some(at_pos) = rest.find('@') {
        let user_info = &rest[..at_pos];
        let host_and_path = &rest[at_pos + 1..];

        if let Some((username, _)) = user_info.split_once(':') {
            return format!("{}://{}:***@{}", protocol, username, host_and_path);
        }
    }

    url.to_string()
}

/// Connect to a database with a 5-second timeout and enriched error messages
///
/// The `label` describes what the connection is for (e.g. "target database")
/// and is included in error messages along with the masked URL.
pub async fn connect_to_database(url: &str, label: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {} at {}", label, mask_url_password(url)))?;
    info!("Connected to {label}");
    Ok(pool)
}

/// A pool holding exactly one connection, for work that must not share
/// sessions with anything else.
pub async fn connect_dedicated(url: &str, label: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {} at {}", label, mask_url_password(url)))
}
