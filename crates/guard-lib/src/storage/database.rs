// ============================
// crates/guard-lib/src/storage/database.rs
// ============================
//! SQL identity storage over a sqlx SQLite pool.
//!
//! Uniqueness is enforced by the table's unique indexes, so concurrent
//! inserts never race the check: the losing insert surfaces as a
//! unique-violation error. Transient backend failures degrade to
//! `Ok(false)`/`None` per the [`IdentityStore`] contract.
use std::str::FromStr;

use anyhow::Context;
use authgate_common::IdentityRecord;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::warn;

use super::{normalize, IdentityStore, StorageError};

const CREATE_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS players (
        id integer PRIMARY KEY,
        email text UNIQUE,
        password text NOT NULL,
        identity_key text UNIQUE NOT NULL,
        username text UNIQUE NOT NULL,
        banned integer DEFAULT 0
    )";

// Probing the full column set fails fast when a table named `players`
// already exists with a different shape.
const SCHEMA_PROBE: &str =
    "SELECT id, email, password, identity_key, username, banned FROM players LIMIT 1";

const INSERT: &str = "\
    INSERT INTO players (email, password, identity_key, username, banned)
    VALUES (?, ?, ?, ?, ?)";

const SELECT_BY_EMAIL: &str = "\
    SELECT id, email, password, identity_key, username, banned FROM players
    WHERE email = ?";

const SELECT_BY_USERNAME: &str = "\
    SELECT id, email, password, identity_key, username, banned FROM players
    WHERE username = ?";

const SELECT_BY_EITHER: &str = "\
    SELECT id, email, password, identity_key, username, banned FROM players
    WHERE email = ? OR username = ?";

/// SQL implementation of the [`IdentityStore`] trait.
pub struct DatabaseStore {
    pool: SqlitePool,
}

impl DatabaseStore {
    /// Connect to `url` (e.g. `sqlite:authgate.db`), creating the database
    /// file when missing, then verify the schema.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url: {url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to open identity database")?;
        Self::new(pool).await
    }

    /// Wrap an existing pool, creating the `players` table when absent and
    /// failing fast if an incompatible table is already there.
    pub async fn new(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .context("failed to create players table")?;
        sqlx::query(SCHEMA_PROBE)
            .fetch_optional(&pool)
            .await
            .context("players table has an incompatible schema")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl IdentityStore for DatabaseStore {
    async fn add(&self, record: &IdentityRecord) -> Result<bool, StorageError> {
        let result = sqlx::query(INSERT)
            .bind(record.email())
            .bind(&record.password_hash)
            .bind(&record.identity_key)
            .bind(&record.username)
            .bind(record.banned)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Err(StorageError::AlreadyExists),
            Err(err) => {
                warn!(error = %err, "identity insert failed, treating backend as unavailable");
                Ok(false)
            }
        }
    }

    async fn find(&self, email: Option<&str>, username: Option<&str>) -> Option<IdentityRecord> {
        let email = normalize(email);
        let username = normalize(username);
        let query = match (email, username) {
            (None, None) => return None,
            (Some(email), None) => sqlx::query(SELECT_BY_EMAIL).bind(email),
            (None, Some(username)) => sqlx::query(SELECT_BY_USERNAME).bind(username),
            (Some(email), Some(username)) => {
                sqlx::query(SELECT_BY_EITHER).bind(email).bind(username)
            }
        };
        match query.fetch_optional(&self.pool).await {
            Ok(row) => row.map(|row| record_from_row(&row)),
            Err(err) => {
                warn!(error = %err, "identity lookup failed");
                None
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> IdentityRecord {
    IdentityRecord {
        id: row.get("id"),
        username: row.get("username"),
        identity_key: row.get("identity_key"),
        email: row.get("email"),
        password_hash: row.get("password"),
        banned: row.get("banned"),
    }
}
