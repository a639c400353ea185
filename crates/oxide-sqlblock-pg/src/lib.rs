//! # oxide-sqlblock-pg
//!
//! Runs `oxide-sqlblock` templates on PostgreSQL through sqlx.
//!
//! Import [`BuildPgExecutor`] to get `execute_b`, `fetch_b`, `fetchrow_b`
//! and `fetchval_b` on pools, connections and transactions. Each call
//! renders the template, binds the parameters in placeholder order and
//! forwards to the matching sqlx primitive.
//!
//! ```no_run
//! use oxide_sqlblock::{Context, Values};
//! use oxide_sqlblock_pg::{connect_b, BuildPgExecutor};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect_b("postgres://localhost/app").await?;
//! let ctx = Context::new().with("v", Values::named([("name", "Frank"), ("team", "blue")])?);
//! pool.execute_b("INSERT INTO users (:v__names) VALUES :v", &ctx).await?;
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod error;
pub mod executor;

pub use bind::{bind_params, PgQuery};
pub use error::{PgError, Result};
pub use executor::{connect_b, execute_many_b, BuildPgExecutor};
