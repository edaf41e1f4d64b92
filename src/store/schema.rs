//! SQLite schema for the collections table

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::StorageError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new database schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else {
        info!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &Connection) -> Result<i32, StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )
    .map_err(|e| StorageError::Database(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()
        .map_err(|e| StorageError::Database(format!("Failed to read schema_version: {}", e)))?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| StorageError::Database(format!("Failed to clear schema_version: {}", e)))?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])
        .map_err(|e| StorageError::Database(format!("Failed to set schema_version: {}", e)))?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(COLLECTIONS_SCHEMA)
        .map_err(|e| StorageError::Database(format!("Failed to create collections table: {}", e)))
}

/// One row per collection key, value is the serialized JSON array
const COLLECTIONS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_unreadable_version_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL);
             INSERT INTO schema_version (version) VALUES ('not a number');",
        )
        .unwrap();

        let err = init_schema(&conn).unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
