//! tests/mod.rs
//! Utilidades compartidas por las pruebas: base en memoria y logins firmados.

mod session_tests;

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::services::auth_service::{data_check_string, TelegramAuthService};

pub const TEST_BOT_TOKEN: &str = "123456:TEST-bot-token";

/// Mismo esquema que crea el bot de monitoreo.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE channels (
        channel_id INTEGER PRIMARY KEY,
        owner_id INTEGER,
        channel_name TEXT,
        is_power_on INTEGER DEFAULT 0,
        last_request_time REAL,
        timezone TEXT
    )"#,
    r#"CREATE TABLE history (
        channel_id INTEGER,
        timestamp REAL,
        status INTEGER
    )"#,
];

pub async fn create_schema(pool: &Pool<Sqlite>) {
    for stmt in SCHEMA {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .expect("Failed to create schema");
    }
}

/// Pool en memoria con una sola conexión (si no, cada conexión ve otra base).
pub async fn memory_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    create_schema(&pool).await;
    pool
}

pub async fn insert_channel(
    pool: &Pool<Sqlite>,
    channel_id: i64,
    owner_id: Option<i64>,
    name: Option<&str>,
    power_on: bool,
    timezone: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO channels (channel_id, owner_id, channel_name, is_power_on, last_request_time, timezone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(channel_id)
    .bind(owner_id)
    .bind(name)
    .bind(power_on as i64)
    .bind(Utc::now().timestamp() as f64)
    .bind(timezone)
    .execute(pool)
    .await
    .expect("Failed to insert channel");
}

pub async fn insert_history(pool: &Pool<Sqlite>, channel_id: i64, timestamp: f64, status: i64) {
    sqlx::query("INSERT INTO history (channel_id, timestamp, status) VALUES (?1, ?2, ?3)")
        .bind(channel_id)
        .bind(timestamp)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to insert history");
}

/// Payload como el que manda el widget, firmado con el token de pruebas.
pub fn signed_payload(
    auth: &TelegramAuthService,
    user_id: i64,
    auth_date: i64,
) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = [
        ("id", user_id.to_string()),
        ("first_name", "Olena".to_string()),
        ("username", format!("user{}", user_id)),
        ("auth_date", auth_date.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let hash = auth
        .sign(&data_check_string(&fields))
        .expect("Failed to sign payload");
    fields.insert("hash".to_string(), hex::encode(hash));
    fields
}

pub fn to_query_string(fields: &HashMap<String, String>) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
