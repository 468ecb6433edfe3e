//! Preference repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store ordered string-value lists under application-scoped keys.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `replace_values` swaps the full list in a single transaction; readers
//!   observe either the old list or the new one, never a mix.
//! - `get_values` returns values in the order they were written.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PREFERENCE_TABLE: &str = "preference_values";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for preference persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was not opened through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/value preference storage holding an ordered value list per key.
pub trait PreferenceStore {
    /// Returns all values stored under `key`, in write order. Missing keys
    /// yield an empty list.
    fn get_values(&self, key: &str) -> RepoResult<Vec<String>>;
    /// Replaces every value stored under `key` with `values`.
    fn replace_values(&mut self, key: &str, values: &[String]) -> RepoResult<()>;
    /// Deletes `key` and all of its values.
    fn remove_key(&mut self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed preference store owning its connection.
pub struct SqlitePreferenceStore {
    conn: Connection,
}

impl SqlitePreferenceStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` when the preference table does not exist.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(&conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [PREFERENCE_TABLE],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(RepoError::MissingRequiredTable(PREFERENCE_TABLE));
        }

        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get_values(&self, key: &str) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT value
             FROM preference_values
             WHERE pref_key = ?1
             ORDER BY position ASC;",
        )?;
        let values = stmt
            .query_map([key], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    fn replace_values(&mut self, key: &str, values: &[String]) -> RepoResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM preference_values WHERE pref_key = ?1;", [key])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO preference_values (pref_key, position, value)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, value) in values.iter().enumerate() {
                insert.execute(params![key, position as i64, value.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_key(&mut self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM preference_values WHERE pref_key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PreferenceStore, SqlitePreferenceStore};
    use crate::db::open_db_in_memory;

    fn store() -> SqlitePreferenceStore {
        SqlitePreferenceStore::try_new(open_db_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn missing_key_reads_as_empty() {
        let store = store();
        assert!(store.get_values("nothing").unwrap().is_empty());
    }

    #[test]
    fn replace_keeps_order_and_duplicates() {
        let mut store = store();
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        store.replace_values("k", &values).unwrap();
        assert_eq!(store.get_values("k").unwrap(), values);

        store.replace_values("k", &["z".to_string()]).unwrap();
        assert_eq!(store.get_values("k").unwrap(), vec!["z".to_string()]);
    }

    #[test]
    fn keys_are_isolated() {
        let mut store = store();
        store.replace_values("one", &["1".to_string()]).unwrap();
        store.replace_values("two", &["2".to_string()]).unwrap();
        store.remove_key("one").unwrap();

        assert!(store.get_values("one").unwrap().is_empty());
        assert_eq!(store.get_values("two").unwrap(), vec!["2".to_string()]);
    }
}
