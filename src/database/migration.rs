use crate::database::DbConn;
use crate::error::AppResult;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const CREATE_SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)
"#;

/// Deal images shipped after the initial schema; kept as a migration so
/// databases created before image support upgrade in place.
const CREATE_DEAL_IMAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS deal_images (
    deal_id INTEGER PRIMARY KEY
  , url TEXT NOT NULL
  , created_at TEXT DEFAULT (datetime('now'))
  , FOREIGN KEY (deal_id) REFERENCES deals(id) ON DELETE CASCADE
)
"#;

const CREATE_DEAL_IMAGES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_deal_images_deal ON deal_images(deal_id)";

/// Check if a table exists
fn table_exists(conn: &DbConn, table: &str) -> AppResult<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Get current schema version from database
fn get_schema_version(conn: &DbConn) -> AppResult<i32> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Record a migration as applied
fn record_migration(conn: &DbConn, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &DbConn) -> AppResult<()> {
    conn.execute_batch(CREATE_SCHEMA_VERSION_TABLE)?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        record_migration(conn, 1)?;
    }

    Ok(())
}

/// Migration v1: deal image table and its index
fn migrate_v1(conn: &DbConn) -> AppResult<()> {
    conn.execute_batch(CREATE_DEAL_IMAGES_TABLE)?;
    conn.execute(CREATE_DEAL_IMAGES_INDEX, [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::init_database;
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;

    fn create_test_conn() -> DbConn {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create test database pool");

        let conn = pool.get().expect("Failed to get connection from pool");
        init_database(&conn).expect("Failed to initialize test database schema");
        conn
    }

    #[test]
    fn test_migration_creates_deal_images_table() {
        let conn = create_test_conn();

        run_migrations(&conn).expect("Migration should succeed");

        assert!(
            table_exists(&conn, "deal_images").unwrap(),
            "deal_images table should exist after migration"
        );
    }

    #[test]
    fn test_migration_records_schema_version() {
        let conn = create_test_conn();

        run_migrations(&conn).expect("Migration should succeed");

        assert!(table_exists(&conn, "schema_version").unwrap());
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let conn = create_test_conn();

        run_migrations(&conn).expect("First migration should succeed");
        run_migrations(&conn).expect("Second migration should succeed (idempotent)");

        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_deal_images_cascade_on_deal_delete() {
        let conn = create_test_conn();
        run_migrations(&conn).expect("Migration should succeed");

        conn.execute(
            "INSERT INTO users (id, name, email, hashed_password, user_type) VALUES (1, 'r', 'r@example.com', 'x', 'restaurant')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO deals (id, restaurant_id, title, description, quantity, original_price, updated_price, pickup_start, pickup_end)
             VALUES (1, 1, 't', 'd', 1, 10.0, 5.0, '2025-06-01T17:00:00', '2025-06-01T20:00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO deal_images (deal_id, url) VALUES (1, 'https://img.example/1.jpg')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM deals WHERE id = 1", []).unwrap();

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM deal_images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "deal image rows should cascade with the deal");
    }
}
