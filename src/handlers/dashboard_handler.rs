//! handlers/dashboard_handler.rs
//! Página principal: dashboard si hay sesión, login en caso contrario.

use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::{http::header::ContentType, web, HttpRequest, HttpResponse};
use anyhow::Context;

use crate::{
    config::dashboard_config::DashboardConfig, error::DashboardError,
    handlers::auth_handler::CurrentSession,
};

const LOGIN_TEMPLATE: &str = include_str!("../../static/login.html");

/// GET /
pub async fn index_endpoint(
    req: HttpRequest,
    session: Option<CurrentSession>,
    config: web::Data<DashboardConfig>,
) -> Result<HttpResponse, DashboardError> {
    if session.is_none() {
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render_login_page(&config.bot_username)));
    }

    let index_path = PathBuf::from(&config.static_dir).join("index.html");
    let file = NamedFile::open_async(&index_path)
        .await
        .with_context(|| format!("No se pudo abrir {:?}", index_path))?;

    Ok(file.into_response(&req))
}

/// Los usernames de bots solo admiten letras, dígitos y '_'.
pub fn render_login_page(bot_username: &str) -> String {
    let safe: String = bot_username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    LOGIN_TEMPLATE.replace("{{BOT_USERNAME}}", &safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_strips_unsafe_username() {
        let html = render_login_page("bot\"><script>alert(1)</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains(r#"data-telegram-login="botscriptalert1script""#));
    }
}
