use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

mod cities;
mod contact_methods;
mod error;
mod people;
mod schema;
mod trips;

pub use error::{StoreError, StoreResult};

/// Durable storage for people, cities, contact methods and trips.
///
/// Rows go in and come out literally. Cross-table consistency is the
/// caller's job, except for the two cascade deletes that need a transaction.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open_at(path: &Path) -> StoreResult<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create tables if they don't exist. Safe to call on every start.
    pub fn initialize(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", schema::SCHEMA))?;
        Ok(())
    }

    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Storage(e))
    }

    #[allow(dead_code)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ==================== COLUMN CODECS ====================

/// Unknown enum tag in a stored row
fn bad_tag(column: &str, tag: &str) -> rusqlite::Error {
    let msg = format!("unknown {} '{}'", column, tag);
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, msg.into())
}

/// Helper to convert UUID parse errors to rusqlite errors
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
    })
}

fn parse_opt_uuid(s: Option<String>) -> rusqlite::Result<Option<Uuid>> {
    s.as_deref().map(parse_uuid).transpose()
}

fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_opt_timestamp(s: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    s.as_deref().map(parse_timestamp).transpose()
}

fn encode_uuids(ids: &[Uuid]) -> StoreResult<String> {
    Ok(serde_json::to_string(ids)?)
}

/// NULL and empty text both decode to an empty list
fn decode_uuids(s: Option<String>) -> rusqlite::Result<Vec<Uuid>> {
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))),
    }
}

#[cfg(test)]
pub(crate) fn test_db() -> Database {
    let db = Database::open_memory().unwrap();
    db.initialize().unwrap();
    db
}
