//! handlers/stats_handler.rs
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::{
    error::DashboardError,
    handlers::auth_handler::CurrentSession,
    models::status_model::{StatsQuery, TimeRange},
    services::{channel_service::ChannelService, status_service::StatusService},
};

/// GET /api/stats/{channel_id}?range=24h|3d|7d|14d|30d
pub async fn channel_stats_endpoint(
    session: CurrentSession,
    path: web::Path<i64>,
    query: web::Query<StatsQuery>,
    channel_service: web::Data<ChannelService>,
    status_service: web::Data<StatusService>,
) -> Result<HttpResponse, DashboardError> {
    let channel_id = path.into_inner();
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse::<TimeRange>().map_err(DashboardError::BadRequest)?,
        None => TimeRange::default(),
    };

    let channel = channel_service
        .get_owned(channel_id, session.0.user.id)
        .await?
        .ok_or_else(|| {
            log::warn!(
                "Usuario {} pidió el canal {} sin ser dueño (o no existe)",
                session.0.user.id,
                channel_id
            );
            DashboardError::ChannelNotFound
        })?;

    let tz = channel_service.timezone_for(&channel);
    let stats = status_service
        .channel_stats(&channel, tz, range, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(stats))
}
