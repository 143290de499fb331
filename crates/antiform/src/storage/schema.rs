//! `SQLite` schema definitions for durable storage.

/// SQL statement to create the key/value table backing durable storage.
pub const CREATE_LOCAL_STORAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_LOCAL_STORAGE_TABLE, CREATE_METADATA_TABLE];
