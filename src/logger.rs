//! logger.rs
//! Logger del dashboard (env_logger). sqlx se deja en `warn` para no
//! inundar el log con cada SELECT sobre la base del bot.

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Filtro efectivo: `RUST_LOG` si viene definido y no vacío.
fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

pub fn init_logger() {
    let filter = log_filter(std::env::var("RUST_LOG").ok());

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    log::debug!("Logger inicializado con filtro '{}'", filter);
}
