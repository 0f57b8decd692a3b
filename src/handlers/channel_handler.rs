//! handlers/channel_handler.rs
use actix_web::{web, HttpResponse};

use crate::{
    error::DashboardError,
    handlers::auth_handler::CurrentSession,
    models::channel_model::ChannelSummary,
    services::channel_service::ChannelService,
};

/// GET /api/channels
/// Solo los canales del usuario de la sesión.
pub async fn list_channels_endpoint(
    session: CurrentSession,
    channel_service: web::Data<ChannelService>,
) -> Result<HttpResponse, DashboardError> {
    let owner_id = session.0.user.id;
    let channels = channel_service.list_owned(owner_id).await?;

    let summaries: Vec<ChannelSummary> = channels
        .iter()
        .map(|ch| ChannelSummary::from_record(ch, channel_service.timezone_for(ch).name()))
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}
