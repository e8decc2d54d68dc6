//! Normalization oracle backed by a live PostgreSQL server.
//!
//! Each request builds a scratch temporary table shaped like the owning
//! table, attaches the expression to it, reads back PostgreSQL's own
//! rendering and rolls everything back. Nothing outlives the request.

use crate::catalog::normalize::{ColumnShape, NormalizedClause, Normalizer};
use crate::db::connection::connect_dedicated;
use crate::error::BoxError;
use crate::render::quote_ident;
use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use sqlx::{PgConnection, PgPool};
use tokio::runtime::Handle;
use tracing::debug;

const SCRATCH_TABLE: &str = "pgmend_normalize";
const SCRATCH_OBJECT: &str = "pgmend_normalize_expr";

/// Runs on its own single-connection pool so its transactions never
/// interleave with introspection queries.
pub struct PgNormalizer {
    pool: PgPool,
    handle: Handle,
}

impl PgNormalizer {
    /// Must be called from within a multi-threaded tokio runtime; requests
    /// block the calling worker thread while they run.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = connect_dedicated(url, "normalization database").await?;
        Ok(Self {
            pool,
            handle: Handle::current(),
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn run<F>(&self, columns: &[ColumnShape], attach: F) -> Result<NormalizedClause, BoxError>
    where
        F: AsyncFnOnce(&mut PgConnection) -> Result<NormalizedClause>,
    {
        let result = tokio::task::block_in_place(|| {
            self.handle.block_on(async {
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .context("Failed to open normalization transaction")?;
                sqlx::query(&scratch_table_sql(columns))
                    .execute(&mut *tx)
                    .await
                    .context("Failed to create scratch table")?;
                let normalized = attach(&mut *tx).await;
                tx.rollback()
                    .await
                    .context("Failed to roll back normalization transaction")?;
                normalized
            })
        });
        result.map_err(Into::into)
    }
}

fn scratch_table_sql(columns: &[ColumnShape]) -> String {
    let definitions = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.data_type))
        .join(", ");
    format!("CREATE TEMPORARY TABLE {SCRATCH_TABLE} ({definitions})")
}

/// `pg_get_constraintdef()` style clauses carry their own `CHECK` keyword.
fn bare_check_clause(clause: &str) -> &str {
    let trimmed = clause.trim();
    match (trimmed.get(..5), trimmed.get(5..)) {
        (Some(keyword), Some(rest))
            if keyword.eq_ignore_ascii_case("check")
                && rest.starts_with(|c: char| c == '(' || c.is_whitespace()) =>
        {
            rest.trim()
        }
        _ => trimmed,
    }
}

impl Normalizer for PgNormalizer {
    fn normalize_check_clause(
        &self,
        columns: &[ColumnShape],
        clause: &str,
    ) -> Result<NormalizedClause, BoxError> {
        let clause = bare_check_clause(clause).to_string();
        debug!("Normalizing check clause {clause}");
        self.run(columns, async move |conn: &mut PgConnection| {
            sqlx::query(&format!(
                "ALTER TABLE {SCRATCH_TABLE} ADD CONSTRAINT {SCRATCH_OBJECT} CHECK ({clause})"
            ))
            .execute(&mut *conn)
            .await
            .context("PostgreSQL rejected the check clause")?;

            let (text, column_names): (String, Vec<String>) = sqlx::query_as(&format!(
                r#"
                SELECT pg_get_expr(con.conbin, con.conrelid),
                       ARRAY(
                           SELECT a.attname::text
                           FROM pg_attribute a
                           WHERE a.attrelid = con.conrelid AND a.attnum = ANY (con.conkey)
                           ORDER BY a.attnum
                       )
                FROM pg_constraint con
                WHERE con.conrelid = 'pg_temp.{SCRATCH_TABLE}'::regclass
                  AND con.conname = '{SCRATCH_OBJECT}'
                "#
            ))
            .fetch_one(&mut *conn)
            .await
            .context("Failed to read back the check clause")?;

            Ok(NormalizedClause { text, column_names })
        })
    }

    fn normalize_trigger_condition(
        &self,
        columns: &[ColumnShape],
        condition: &str,
    ) -> Result<NormalizedClause, BoxError> {
        let condition = condition.trim().to_string();
        debug!("Normalizing trigger condition {condition}");
        self.run(columns, async move |conn: &mut PgConnection| {
            sqlx::query(&format!(
                "CREATE FUNCTION pg_temp.{SCRATCH_OBJECT}() RETURNS trigger \
                 LANGUAGE plpgsql AS $$BEGIN RETURN NULL; END$$"
            ))
            .execute(&mut *conn)
            .await
            .context("Failed to create scratch trigger function")?;

            // BEFORE UPDATE ... FOR EACH ROW admits both OLD and NEW.
            sqlx::query(&format!(
                "CREATE TRIGGER {SCRATCH_OBJECT} BEFORE UPDATE ON {SCRATCH_TABLE} \
                 FOR EACH ROW WHEN ({condition}) EXECUTE FUNCTION pg_temp.{SCRATCH_OBJECT}()"
            ))
            .execute(&mut *conn)
            .await
            .context("PostgreSQL rejected the trigger condition")?;

            let (text, column_names): (Option<String>, Vec<String>) = sqlx::query_as(&format!(
                r#"
                SELECT (
                           SELECT tr.action_condition::text
                           FROM information_schema.triggers tr
                           WHERE tr.trigger_name = '{SCRATCH_OBJECT}'
                             AND tr.event_object_table = '{SCRATCH_TABLE}'
                           LIMIT 1
                       ),
                       ARRAY(
                           SELECT a.attname::text
                           FROM pg_depend d
                           JOIN pg_attribute a
                             ON a.attrelid = d.refobjid AND a.attnum = d.refobjsubid
                           WHERE d.classid = 'pg_trigger'::regclass
                             AND d.objid = t.oid
                             AND d.refobjsubid > 0
                           ORDER BY a.attnum
                       )
                FROM pg_trigger t
                WHERE t.tgrelid = 'pg_temp.{SCRATCH_TABLE}'::regclass
                  AND t.tgname = '{SCRATCH_OBJECT}'
                "#
            ))
            .fetch_one(&mut *conn)
            .await
            .context("Failed to read back the trigger condition")?;

            let text = text.ok_or_else(|| anyhow!("trigger condition was not recorded"))?;
            Ok(NormalizedClause { text, column_names })
        })
    }
}
