//! app.rs
use crate::error::DashboardError;
use crate::handlers::{auth_handler, channel_handler, dashboard_handler, stats_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    // El único parámetro de ruta es el id de canal: si no parsea, no existe.
    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        log::debug!("Path inválido en {}: {}", req.path(), err);
        DashboardError::ChannelNotFound.into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        DashboardError::BadRequest(err.to_string()).into()
    }))
    .route("/", web::get().to(dashboard_handler::index_endpoint))
    .service(
        web::scope("/auth")
            .route(
                "/telegram",
                web::get().to(auth_handler::telegram_callback_endpoint),
            )
            .route("/logout", web::post().to(auth_handler::logout_endpoint)),
    )
    .service(
        web::scope("/api")
            .route("/me", web::get().to(auth_handler::me_endpoint))
            .route(
                "/channels",
                web::get().to(channel_handler::list_channels_endpoint),
            )
            .route(
                "/stats/{channel_id}",
                web::get().to(stats_handler::channel_stats_endpoint),
            ),
    );
}
