//! Director/Movie schema.
//!
//! There are no migrations: a batch load drops both tables and recreates
//! them from `sql/schema.sql`.

use super::connection::CatalogDb;
use crate::Error;
use tokio_rusqlite::Connection;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Movie references Director, so it goes first.
const DROP_TABLES: &str = "DROP TABLE IF EXISTS Movie;
     DROP TABLE IF EXISTS Director;";

/// Create any missing tables and indexes.
pub(crate) async fn ensure(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(SCHEMA)?;
        Ok(())
    })
    .await
    .map_err(Error::from)
}

impl CatalogDb {
    /// Drop and recreate the Director and Movie tables.
    pub async fn create_schema(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute_batch(DROP_TABLES)?;
                tx.execute_batch(SCHEMA)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!("recreated catalog schema");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_exists(db: &CatalogDb, name: &'static str) -> bool {
        db.conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                    [name],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_created_on_open() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        assert!(table_exists(&db, "Director").await);
        assert!(table_exists(&db, "Movie").await);
    }

    #[tokio::test]
    async fn test_create_schema_drops_rows() {
        let db = CatalogDb::open_in_memory().await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO Director (LastName, FirstName) VALUES ('Doe', 'Jane');
                     INSERT INTO Movie (Title, Year, Rating, DirectorId) VALUES ('Frozen', 2013, 7.4, 1);",
                )
            })
            .await
            .unwrap();

        db.create_schema().await.unwrap();
        db.create_schema().await.unwrap();

        let (directors, movies): (i64, i64) = db
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT (SELECT COUNT(*) FROM Director), (SELECT COUNT(*) FROM Movie)",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
            })
            .await
            .unwrap();
        assert_eq!((directors, movies), (0, 0));
    }
}
