//! error.rs
//! Errores que cruzan la frontera HTTP.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::auth_service::AuthError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Authentication required")]
    Unauthorized,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Channel not found")]
    ChannelNotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Unauthorized | DashboardError::Auth(_) => StatusCode::UNAUTHORIZED,
            DashboardError::ChannelNotFound => StatusCode::NOT_FOUND,
            DashboardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DashboardError::Internal(e) = self {
            // el detalle va al log, no al cliente
            log::error!("Error interno: {:?}", e);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}
