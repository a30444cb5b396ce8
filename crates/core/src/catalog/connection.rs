//! Catalog connection management with pragma configuration.
//!
//! Opens the SQLite database, applies pragmas (WAL mode, foreign keys), and
//! makes sure the Director and Movie tables exist.

use super::schema;
use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Catalog database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct CatalogDb {
    pub(crate) conn: Connection,
}

impl CatalogDb {
    /// Open a catalog at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas, and creates
    /// any missing tables. Existing rows are left alone.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory catalog for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        schema::ensure(&conn).await?;

        Ok(Self { conn })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_open_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie_director.sqlite");

        let db = CatalogDb::open(&path).await.unwrap();
        db.conn
            .call(|conn| conn.execute("INSERT INTO Director (LastName, FirstName) VALUES ('Doe', 'Jane')", []))
            .await
            .unwrap();
        drop(db);

        let reopened = CatalogDb::open(&path).await.unwrap();
        let count: i64 = reopened
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM Director", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
