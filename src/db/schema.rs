//! SQL DDL for the local SQLite backend.
//! The MySQL `album` table is provisioned outside this service.

/// SQLite schema mirroring the MySQL `album` table:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `price` REAL (DECIMAL(5,2) on MySQL)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS album (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(128) NOT NULL,
    artist VARCHAR(255) NOT NULL,
    price REAL NOT NULL
);
"#;
