//! Read-only access to the ERP's MySQL schema.
//!
//! This is the alternative backend for deployments that can reach the
//! database directly. Every statement is a parameterized `SELECT` built in
//! [`queries`], and rows come back as JSON objects via [`rows`]. Results
//! reduce to the same [`Outcome`] as the HTTP gateway, so tools render them
//! identically.

pub mod queries;
mod rows;

use std::time::Duration;

use serde_json::Value;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, warn};

use crate::mcp::{db::queries::Statement, error::ErpError, outcome::Outcome};

/// Status reported for statements the database refused or we could not decode.
const DATABASE_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Prepares the connection pool without connecting. The first query opens
    /// a connection, so an unreachable server surfaces as a `NetworkError`
    /// outcome rather than a startup failure.
    ///
    /// # Errors
    /// Returns `ErpError::Config` when `url` is not a MySQL connection URL.
    pub fn connect_lazy(url: &str, acquire_timeout: Duration) -> Result<Self, ErpError> {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)
            .map_err(|e| ErpError::Config(format!("ERP_DB_URL: {e}")))?;
        Ok(Self { pool })
    }

    /// Runs `statement` and returns every row as a JSON array. No rows is an
    /// empty array.
    pub async fn fetch_all(&self, query: &str, mut statement: Statement) -> Outcome {
        debug!(query, "running ERP database query");
        let fetched = match statement.build().fetch_all(&self.pool).await {
            Ok(fetched) => fetched,
            Err(e) => return failure(query, &e),
        };
        match fetched.iter().map(rows::to_json).collect::<Result<Vec<_>, _>>() {
            Ok(rows) => Outcome::success(Value::Array(rows)),
            Err(e) => failure(query, &e),
        }
    }

    /// Runs `statement` and returns its first row as a JSON object.
    ///
    /// # Errors
    /// Returns `ErpError::NotFound` carrying `missing` when there is no row.
    pub async fn fetch_one(
        &self,
        query: &str,
        mut statement: Statement,
        missing: &str,
    ) -> Result<Outcome, ErpError> {
        debug!(query, "running ERP database query");
        let row = match statement.build().fetch_optional(&self.pool).await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(ErpError::NotFound(missing.to_string())),
            Err(e) => return Ok(failure(query, &e)),
        };
        Ok(rows::to_json(&row).map_or_else(|e| failure(query, &e), Outcome::success))
    }
}

/// Connectivity problems are network errors; anything the server rejected
/// or we failed to decode is a server error.
fn failure(query: &str, error: &sqlx::Error) -> Outcome {
    warn!(query, error = %error, "ERP database query failed");
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Outcome::network(format!("database unavailable: {error}")),
        sqlx::Error::Database(db) => Outcome::ServerError {
            status_code: DATABASE_FAILURE_STATUS,
            message: db.message().to_string(),
        },
        other => Outcome::ServerError {
            status_code: DATABASE_FAILURE_STATUS,
            message: other.to_string(),
        },
    }
}
