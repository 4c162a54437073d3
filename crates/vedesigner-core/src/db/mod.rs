//! SQLite storage behind [`LocalStore`](crate::client::LocalStore).
//!
//! Plans are stored as JSON documents, so the local store accepts exactly
//! the shapes the Plan API exchanges. A field update rewrites only the named
//! top-level keys of one document inside a transaction.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod plan_queries;
pub mod profile_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and brings the schema up to date.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
