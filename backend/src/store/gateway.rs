//! # Store Gateway
//!
//! Opens the document store for one command invocation.
//!
//! 1.  **Credential check**: the credential blob must parse as a service-account key
//!     for the requested project, with a client email and private key present.
//!     Anything else is reported as `LiaisonError::Auth` and never retried, since
//!     credentials are process-wide configuration.
//! 2.  **Connection**: the SQLite database is opened and its schema ensured.
//! 3.  **Release**: the connection is closed by [`StoreConnection::close`] or, on any
//!     early return, when the value goes out of scope.

use super::{DocumentStore, Filter, StoreFailure, StoredDocument};
use crate::credentials::ServiceAccountKey;
use crate::errors::{ErrorContext, LiaisonError};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS documents (
        seq        INTEGER PRIMARY KEY AUTOINCREMENT,
        collection TEXT NOT NULL,
        id         TEXT NOT NULL,
        data       TEXT NOT NULL,
        UNIQUE (collection, id)
    );
";

/// An open, short-lived connection to the document store.
pub struct StoreConnection {
    conn: Connection,
    project: String,
}

impl StoreConnection {
    pub fn open(path: impl AsRef<Path>, project: &str, credentials: &[u8]) -> Result<Self, LiaisonError> {
        check_credentials(project, credentials)?;
        let conn = Connection::open(path.as_ref()).map_err(|e| open_failure(project, e))?;
        Self::init(conn, project)
    }

    /// Same checks as [`StoreConnection::open`], backed by a private in-memory database.
    pub fn open_in_memory(project: &str, credentials: &[u8]) -> Result<Self, LiaisonError> {
        check_credentials(project, credentials)?;
        let conn = Connection::open_in_memory().map_err(|e| open_failure(project, e))?;
        Self::init(conn, project)
    }

    fn init(conn: Connection, project: &str) -> Result<Self, LiaisonError> {
        conn.execute_batch(SCHEMA).map_err(|e| open_failure(project, e))?;
        debug!("opened document store for project {project}");
        Ok(Self {
            conn,
            project: project.to_string(),
        })
    }

    /// Closes the connection, logging rather than surfacing a failed close.
    pub fn close(self) {
        let project = self.project;
        if let Err((_, e)) = self.conn.close() {
            warn!("could not close document store for project {project}: {e}");
        }
    }
}

fn check_credentials(project: &str, credentials: &[u8]) -> Result<(), LiaisonError> {
    let auth_error = |log: String| LiaisonError::Auth(ErrorContext::new("open_store", log));

    let key: ServiceAccountKey = serde_json::from_slice(credentials)
        .map_err(|e| auth_error(format!("credentials are not a service-account key: {e}")))?;
    if key.project_id != project {
        return Err(auth_error(format!(
            "credentials belong to project {:?}, not {project:?}",
            key.project_id
        )));
    }
    if key.client_email.is_empty() || key.private_key.is_empty() {
        return Err(auth_error("credentials lack a client email or private key".to_string()));
    }
    Ok(())
}

fn open_failure(project: &str, e: rusqlite::Error) -> LiaisonError {
    LiaisonError::store(
        ErrorContext::new("open_store", format!("could not initialize connection for {project}")),
        e.into(),
    )
}

impl DocumentStore for StoreConnection {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreFailure> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    fn set(&self, collection: &str, id: &str, data: &Value) -> Result<(), StoreFailure> {
        self.conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data",
            params![collection, id, data.to_string()],
        )?;
        Ok(())
    }

    fn add(&self, collection: &str, data: &Value) -> Result<String, StoreFailure> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)",
            params![collection, &id, data.to_string()],
        )?;
        Ok(id)
    }

    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, StoreFailure> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, data FROM documents WHERE collection = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            let data: Value = serde_json::from_str(&raw)?;
            if filters.iter().all(|filter| filter.matches(&data)) {
                matches.push(StoredDocument { id, data });
            }
        }
        Ok(matches)
    }
}
