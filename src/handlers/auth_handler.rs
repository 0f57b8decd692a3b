//! handlers/auth_handler.rs
//! Callback del Telegram Login Widget, logout y el extractor de sesión.

use std::collections::HashMap;

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::Payload,
    http::header,
    web, FromRequest, HttpRequest, HttpResponse,
};
use anyhow::anyhow;
use futures_util::future::{FutureExt, LocalBoxFuture};

use crate::{
    config::dashboard_config::DashboardConfig,
    error::DashboardError,
    models::auth_model::Session,
    services::{auth_service::TelegramAuthService, session_service::SessionService},
};

pub const SESSION_COOKIE: &str = "light_session";

/// Sesión válida del request; si no hay, el handler responde 401.
/// Como `Option<CurrentSession>` sirve para rutas con sesión opcional.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequest for CurrentSession {
    type Error = DashboardError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let sessions = req.app_data::<web::Data<SessionService>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        async move {
            let sessions = sessions
                .ok_or_else(|| DashboardError::Internal(anyhow!("SessionService no registrado")))?;
            let token = token.ok_or(DashboardError::Unauthorized)?;
            sessions
                .get(&token)
                .await
                .map(CurrentSession)
                .ok_or(DashboardError::Unauthorized)
        }
        .boxed_local()
    }
}

/// GET /auth/telegram
/// Todos los parámetros del query forman parte de la firma.
pub async fn telegram_callback_endpoint(
    auth_service: web::Data<TelegramAuthService>,
    session_service: web::Data<SessionService>,
    config: web::Data<DashboardConfig>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, DashboardError> {
    let fields = query.into_inner();

    let login = auth_service.verify(&fields).map_err(|e| {
        log::warn!("Login de Telegram rechazado: {}", e);
        e
    })?;
    log::info!(
        "Login verificado para usuario {} (auth_date {})",
        login.user().id,
        login.auth_date().to_rfc3339()
    );

    let session = session_service.create(&login).await;
    let cookie = Cookie::build(SESSION_COOKIE, session.token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds(session_service.ttl().num_seconds()))
        .finish();

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish())
}

/// POST /auth/logout
pub async fn logout_endpoint(
    req: HttpRequest,
    session_service: web::Data<SessionService>,
) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if session_service.destroy(cookie.value()).await {
            log::info!("Sesión cerrada");
        }
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::SeeOther()
        .append_header((header::LOCATION, "/"))
        .cookie(removal)
        .finish()
}

/// GET /api/me
pub async fn me_endpoint(session: CurrentSession) -> HttpResponse {
    HttpResponse::Ok().json(&session.0)
}
