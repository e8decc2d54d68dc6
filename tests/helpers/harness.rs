use sqlx::PgPool;
use uuid::Uuid;

/// Simple test instance that connects to an external PostgreSQL database
/// Requires DATABASE_URL environment variable to be set
pub struct PgTestInstance {
    pub base_url: String,
}

/// Test database with an isolated database for testing
pub struct TestDatabase {
    pool: PgPool,
    db_name: String,
    url: String,
    base_url: String,
}

impl TestDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connection string of the isolated database
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute arbitrary SQL - perfect for test setup
    pub async fn execute(&self, sql: &str) {
        use sqlx::Executor;
        self.pool
            .execute(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute SQL: {}\nError: {}", sql, e));
    }

    /// Cleanup the test database - best effort async cleanup
    pub async fn cleanup(self) {
        self.pool.close().await;

        let db_name = self.db_name.clone();
        let base_url = self.base_url.clone();

        let cleanup_future = async move {
            if let Ok(pool) = PgPool::connect(&base_url).await {
                let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", db_name);
                let _ = sqlx::query(&drop_sql).execute(&pool).await;
                pool.close().await;
            }
        };

        // Timeout after 5 seconds to prevent hanging
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), cleanup_future).await;
    }
}

impl PgTestInstance {
    pub async fn new() -> Self {
        // Load .env file for test environment configuration
        dotenv::dotenv().ok();

        let base_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL environment variable is required for database tests");

        // Verify we can connect to the database
        let test_pool = PgPool::connect(&base_url).await.expect(
            "Failed to connect to test database. Make sure PostgreSQL is running and DATABASE_URL is correct.",
        );
        test_pool.close().await;

        Self { base_url }
    }

    pub async fn create_test_database(&self) -> TestDatabase {
        let db_name = format!("pgmend_test_{}", Uuid::new_v4().simple());

        let base_pool = PgPool::connect(&self.base_url)
            .await
            .expect("Failed to connect to PostgreSQL for database creation");

        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&base_pool)
            .await
            .expect("Failed to create test database");

        base_pool.close().await;

        let url = if let Some(last_slash) = self.base_url.rfind('/') {
            format!("{}/{}", &self.base_url[..last_slash], db_name)
        } else {
            format!("{}/{}", self.base_url, db_name)
        };

        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to newly created test database");

        TestDatabase {
            pool,
            db_name,
            url,
            base_url: self.base_url.clone(),
        }
    }
}

/// Run a test with automatic database cleanup
///
/// # Example
/// ```ignore
/// #[tokio::test(flavor = "multi_thread")]
/// async fn test_something() {
///     with_test_db(async |db| {
///         db.execute("CREATE TABLE users (id INT)").await;
///         let structure = introspect(db.pool()).await.unwrap();
///         assert!(structure.schemas["public"].tables.contains_key("users"));
///     }).await;
/// }
/// ```
pub async fn with_test_db<F, R>(test_fn: F) -> R
where
    F: std::ops::AsyncFnOnce(&TestDatabase) -> R,
{
    let pg = PgTestInstance::new().await;
    let db = pg.create_test_database().await;

    let result = test_fn(&db).await;

    // Cleanup happens here - best effort (ignore errors)
    db.cleanup().await;

    result
}
