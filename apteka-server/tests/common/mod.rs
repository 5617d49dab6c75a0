#![allow(dead_code)]

//! Shared test fixtures: in-memory database and row helpers

use apteka_server::state::AppState;
use shared::util::now_millis;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");

    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        pool,
        jwt_secret: "test-secret".to_string(),
        status_advance_delay_ms: 60_000,
    }
}

pub async fn insert_product(pool: &SqlitePool, title: &str, price: f64, stock: i64) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (title, price, stock, category, created_at) VALUES (?, ?, ?, 'Painkillers', ?) RETURNING id",
    )
    .bind(title)
    .bind(price)
    .bind(stock)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .expect("insert product");
    id
}

pub async fn insert_user(pool: &SqlitePool, phone: &str, password_hash: &str, is_admin: bool) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (phone, password, is_admin, profile_updated_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(phone)
    .bind(password_hash)
    .bind(is_admin)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .expect("insert user");
    id
}

pub async fn product_stock(pool: &SqlitePool, id: i64) -> i64 {
    let (stock,): (i64,) = sqlx::query_as("SELECT stock FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("read stock");
    stock
}

pub async fn table_count(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows");
    count
}
