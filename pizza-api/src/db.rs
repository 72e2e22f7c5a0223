use std::sync::{Arc, Mutex};

use diesel::{prelude::*, sqlite::SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::ApiError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Error connecting to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: ConnectionError,
    },
    #[error("Failed to configure connection: {0}")]
    Configure(#[from] diesel::result::Error),
    #[error("Failed to run migrations: {0}")]
    Migration(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DatabaseError> {
    let mut conn =
        SqliteConnection::establish(database_url).map_err(|source| DatabaseError::Connection {
            url: database_url.to_string(),
            source,
        })?;
    // SQLite leaves foreign key enforcement off unless asked, per connection.
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
    Ok(conn)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(DatabaseError::Migration)?;
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}

/// The single store connection shared by every request.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl Database {
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Connects, enables foreign keys and brings the schema up to date.
    pub fn open(database_url: &str) -> Result<Self, DatabaseError> {
        let mut conn = establish_connection(database_url)?;
        run_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    pub fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::InternalError("database connection poisoned".to_string()))?;
        f(&mut *conn)
    }

    /// Runs `f` on the blocking thread pool so store I/O does not stall the
    /// async workers.
    pub async fn interact<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.run(f))
            .await
            .map_err(|e| ApiError::InternalError(format!("database task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{self, pizzas, restaurant_pizzas, restaurants};
    use crate::seed::seed;

    fn seeded() -> Database {
        let db = Database::open(":memory:").unwrap();
        db.run(|conn| Ok(seed(conn)?)).unwrap();
        db
    }

    #[test]
    fn open_in_memory_applies_schema() {
        let db = Database::open(":memory:").unwrap();
        let count = db
            .run(|conn| Ok(schema::restaurants::table.count().get_result::<i64>(conn)?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = establish_connection(":memory:").unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();
    }

    #[test]
    fn store_rejects_orphan_join_records() {
        let mut conn = establish_connection(":memory:").unwrap();
        run_migrations(&mut conn).unwrap();
        let result = diesel::sql_query(
            "INSERT INTO restaurant_pizzas (price, pizza_id, restaurant_id) VALUES (10, 1, 1)",
        )
        .execute(&mut conn);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_url_reports_connection_error() {
        let result = establish_connection("/nonexistent-dir/definitely/missing/app.db");
        assert!(matches!(result, Err(DatabaseError::Connection { .. })));
    }

    #[test]
    fn deleting_a_pizza_cascades_to_its_join_records() {
        let db = seeded();
        let (orphans, remaining) = db
            .run(|conn| {
                diesel::delete(pizzas::table.find(1)).execute(conn)?;
                let orphans = restaurant_pizzas::table
                    .filter(restaurant_pizzas::pizza_id.eq(1))
                    .count()
                    .get_result::<i64>(conn)?;
                let remaining = restaurant_pizzas::table.count().get_result::<i64>(conn)?;
                Ok((orphans, remaining))
            })
            .unwrap();

        assert_eq!(orphans, 0);
        assert_eq!(remaining, 2);
    }

    #[test]
    fn deleting_a_restaurant_directly_cascades_to_its_join_records() {
        let db = seeded();
        let (orphans, remaining) = db
            .run(|conn| {
                diesel::delete(restaurants::table.find(1)).execute(conn)?;
                let orphans = restaurant_pizzas::table
                    .filter(restaurant_pizzas::restaurant_id.eq(1))
                    .count()
                    .get_result::<i64>(conn)?;
                let remaining = restaurant_pizzas::table.count().get_result::<i64>(conn)?;
                Ok((orphans, remaining))
            })
            .unwrap();

        assert_eq!(orphans, 0);
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn interact_runs_off_the_async_worker() {
        let db = seeded();
        let count = db
            .interact(|conn| Ok(pizzas::table.count().get_result::<i64>(conn)?))
            .await
            .unwrap();
        assert_eq!(count, 3);
    }
}
