//! Template-aware query methods for sqlx executors.

use oxide_sqlblock::{render, Context, SqlValue};
use sqlx::postgres::{PgPoolOptions, PgQueryResult, PgRow};
use sqlx::{Decode, Executor, PgConnection, PgPool, Postgres, Row, Type};
use tracing::debug;

use crate::bind::bind_params;
use crate::error::Result;

/// Renders `template` and logs the outcome.
fn prepare(template: &str, context: &Context) -> Result<(String, Vec<SqlValue>)> {
    let (sql, params) = render(template, context)?;
    debug!(sql = %sql, params = params.len(), "Executing rendered SQL");
    Ok((sql, params))
}

/// Query methods taking a template and a [`Context`] instead of raw SQL.
///
/// Implemented for every PostgreSQL executor: `&PgPool` and
/// `&mut PgConnection`, which also covers transactions through `&mut *tx`.
///
/// ```no_run
/// use oxide_sqlblock::{var, Context, SqlExpr};
/// use oxide_sqlblock_pg::BuildPgExecutor;
///
/// # async fn run(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let ctx = Context::new().with("cond", var("age")?.gt(18));
/// let count: Option<i64> = pool
///     .fetchval_b("SELECT COUNT(*) FROM users WHERE :cond", &ctx)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[allow(async_fn_in_trait)]
pub trait BuildPgExecutor<'c>: Executor<'c, Database = Postgres> + Sized {
    /// Runs a statement, returning the command result.
    async fn execute_b(self, template: &str, context: &Context) -> Result<PgQueryResult> {
        let (sql, params) = prepare(template, context)?;
        let query = bind_params(sqlx::query(&sql), params)?;
        Ok(query.execute(self).await?)
    }

    /// Runs a query, returning every row.
    async fn fetch_b(self, template: &str, context: &Context) -> Result<Vec<PgRow>> {
        let (sql, params) = prepare(template, context)?;
        let query = bind_params(sqlx::query(&sql), params)?;
        Ok(query.fetch_all(self).await?)
    }

    /// Runs a query, returning the first row, if any.
    async fn fetchrow_b(self, template: &str, context: &Context) -> Result<Option<PgRow>> {
        let (sql, params) = prepare(template, context)?;
        let query = bind_params(sqlx::query(&sql), params)?;
        Ok(query.fetch_optional(self).await?)
    }

    /// Runs a query, returning the first column of the first row, if any.
    async fn fetchval_b<T>(self, template: &str, context: &Context) -> Result<Option<T>>
    where
        T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
    {
        let row = self.fetchrow_b(template, context).await?;
        Ok(row.map(|row| row.try_get::<T, _>(0)).transpose()?)
    }
}

impl<'c, E> BuildPgExecutor<'c> for E where E: Executor<'c, Database = Postgres> {}

/// Renders and runs `template` once per context on a single connection,
/// returning the total number of affected rows.
///
/// Stops at the first failing statement; wrap the connection in a
/// transaction to make the batch atomic.
///
/// # Errors
///
/// Returns the first render, binding or database error.
pub async fn execute_many_b<'a, I>(conn: &mut PgConnection, template: &str, contexts: I) -> Result<u64>
where
    I: IntoIterator<Item = &'a Context>,
{
    let mut affected = 0;
    for context in contexts {
        affected += (&mut *conn).execute_b(template, context).await?.rows_affected();
    }
    Ok(affected)
}

/// Opens a connection pool with default options.
///
/// Use [`PgPoolOptions`] directly for anything else.
///
/// # Errors
///
/// Returns [`crate::PgError::Database`] if the database cannot be reached.
pub async fn connect_b(url: &str) -> Result<PgPool> {
    Ok(PgPoolOptions::new().connect(url).await?)
}
