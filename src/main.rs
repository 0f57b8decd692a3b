use std::time::Duration;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::dashboard_config::DashboardConfig;
use crate::logger::init_logger;
use crate::services::auth_service::TelegramAuthService;
use crate::services::channel_service::ChannelService;
use crate::services::session_service::SessionService;
use crate::services::status_service::StatusService;

mod app;
mod config;
mod error;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

/// El bot escribe en el mismo archivo: esperamos el lock en vez de fallar.
const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Abre la base del bot en modo solo lectura. Nunca migramos ni escribimos.
async fn setup_database(db_file: &str) -> Result<Pool<Sqlite>> {
    log::info!("Conectando a SQLite (solo lectura) en {}", db_file);

    let options = SqliteConnectOptions::new()
        .filename(db_file)
        .read_only(true)
        .busy_timeout(DB_BUSY_TIMEOUT);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .with_context(|| format!("No se pudo abrir la base de datos {}", db_file))?;

    Ok(db_pool)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = match DashboardConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Configuración inválida: {:#}", e);
            std::process::exit(1);
        }
    };
    log::debug!("{:?}", config);

    let db_pool = match setup_database(&config.db_file).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let auth_service = TelegramAuthService::new(&config.bot_token, config.auth_max_age);
    let session_service = SessionService::new(config.session_ttl);
    let channel_service = ChannelService::new(db_pool.clone(), config.default_timezone);
    let status_service = StatusService::new(db_pool.clone());

    let _purge_task = session_service.spawn_purge_task();

    if config.bot_username.is_empty() {
        log::warn!("BOT_USERNAME vacío: el widget de login no funcionará");
    }

    let bind = (config.bind_host.clone(), config.port);
    log::info!("Levantando servidor en {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(session_service.clone()))
            .app_data(web::Data::new(channel_service.clone()))
            .app_data(web::Data::new(status_service.clone()))
            .service(Files::new("/static", &config.static_dir))
            .configure(app::init_app)
    })
    .bind(bind)?
    .run()
    .await
}
