use super::StoreFailure;
use common::model::mapping::AccountMapping;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable voice identity to account identity cache with plain get/put semantics.
pub trait MappingStore {
    fn get(&self, voice_identity: &str) -> Result<Option<AccountMapping>, StoreFailure>;
    fn put(&self, mapping: &AccountMapping) -> Result<(), StoreFailure>;
}

/// Mapping store kept in its own SQLite database, apart from the documents.
pub struct SqliteMappingStore {
    conn: Connection,
}

impl SqliteMappingStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreFailure> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreFailure> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreFailure> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_mappings (
                voice_identity   TEXT PRIMARY KEY,
                account_identity TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }
}

impl MappingStore for SqliteMappingStore {
    fn get(&self, voice_identity: &str) -> Result<Option<AccountMapping>, StoreFailure> {
        let mapping = self
            .conn
            .query_row(
                "SELECT voice_identity, account_identity FROM user_mappings WHERE voice_identity = ?1",
                params![voice_identity],
                |row| {
                    Ok(AccountMapping {
                        voice_identity: row.get(0)?,
                        account_identity: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(mapping)
    }

    fn put(&self, mapping: &AccountMapping) -> Result<(), StoreFailure> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_mappings (voice_identity, account_identity) VALUES (?1, ?2)",
            params![&mapping.voice_identity, &mapping.account_identity],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_overwrites_by_voice_identity() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        assert_eq!(store.get("voice-1").unwrap(), None);

        for account in ["acct-1", "acct-2"] {
            store
                .put(&AccountMapping {
                    voice_identity: "voice-1".to_string(),
                    account_identity: account.to_string(),
                })
                .unwrap();
        }

        let mapping = store.get("voice-1").unwrap().unwrap();
        assert_eq!(mapping.account_identity, "acct-2");
    }
}
