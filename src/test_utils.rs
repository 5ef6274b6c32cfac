#![cfg(test)]

use crate::app::create_app;
use crate::config::Config;
use crate::database::{init_database, run_migrations, DbPool};
use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

static USER_ID_COUNTER: AtomicI64 = AtomicI64::new(1);
static DEAL_ID_COUNTER: AtomicI64 = AtomicI64::new(1);

/// Create an in-memory SQLite database pool with full schema applied
pub fn create_test_db() -> DbPool {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .expect("Failed to create test database pool");

    let conn = pool.get().expect("Failed to get connection from pool");
    init_database(&conn).expect("Failed to initialize test database schema");
    run_migrations(&conn).expect("Failed to run test database migrations");

    pool
}

/// Create a test app with in-memory database
pub fn create_test_app() -> (Router, DbPool) {
    let pool = create_test_db();
    let config = Arc::new(Config::default());
    let app = create_app(config, pool.clone());
    (app, pool)
}

/// Test fixture: create a user without a stored coordinate
pub fn create_test_user(pool: &DbPool, name: &str, email: &str, user_type: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    let user_id = USER_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

    conn.execute(
        "INSERT INTO users (id, name, email, hashed_password, user_type, is_active)
         VALUES (?, ?, ?, ?, ?, 1)",
        rusqlite::params![user_id, name, email, "hashed_password_placeholder", user_type],
    )
    .expect("Failed to insert test user");

    user_id
}

/// Test fixture: create a user with a stored coordinate
pub fn create_test_user_with_location(
    pool: &DbPool,
    name: &str,
    email: &str,
    user_type: &str,
    latitude: f64,
    longitude: f64,
) -> i64 {
    let user_id = create_test_user(pool, name, email, user_type);

    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "UPDATE users SET latitude = ?, longitude = ? WHERE id = ?",
        rusqlite::params![latitude, longitude, user_id],
    )
    .expect("Failed to set test user location");

    user_id
}

/// Test fixture: create an unclaimed deal priced 15.99 -> 6.99, quantity 3
pub fn create_test_deal(pool: &DbPool, restaurant_id: i64, title: &str) -> i64 {
    let conn = pool.get().expect("Failed to get connection");
    let deal_id = DEAL_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

    conn.execute(
        "INSERT INTO deals (
            id, restaurant_id, title, description, quantity,
            original_price, updated_price, pickup_start, pickup_end, claimed
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
        rusqlite::params![
            deal_id,
            restaurant_id,
            title,
            "Surplus portions",
            3,
            15.99,
            6.99,
            "2025-06-01T17:00:00",
            "2025-06-01T20:00:00",
        ],
    )
    .expect("Failed to insert test deal");

    deal_id
}

pub fn mark_deal_claimed(pool: &DbPool, deal_id: i64) {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "UPDATE deals SET claimed = 1 WHERE id = ?",
        rusqlite::params![deal_id],
    )
    .expect("Failed to mark test deal claimed");
}

pub fn set_deal_image(pool: &DbPool, deal_id: i64, url: &str) {
    let conn = pool.get().expect("Failed to get connection");
    conn.execute(
        "INSERT OR REPLACE INTO deal_images (deal_id, url) VALUES (?, ?)",
        rusqlite::params![deal_id, url],
    )
    .expect("Failed to set test deal image");
}
