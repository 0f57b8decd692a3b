//! models/auth_model.rs
//! Identidad de Telegram y sesiones del dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usuario tal como lo firma el Login Widget de Telegram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(skip)]
    pub token: String,
    pub user: TelegramUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
