//! services/session_service.rs
//! Sesiones del dashboard, en memoria del proceso.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::auth_model::Session;
use crate::services::auth_service::VerifiedLogin;

/// Cada cuánto se barren las sesiones vencidas.
pub const PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(600);

#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(ttl: Duration) -> Self {
        SessionService {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Crea la sesión para un login ya verificado.
    pub async fn create(&self, login: &VerifiedLogin) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user: login.user().clone(),
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        log::info!(
            "Sesión creada para usuario {} (expira {})",
            session.user.id,
            session.expires_at.to_rfc3339()
        );
        session
    }

    /// Devuelve la sesión si existe y no ha vencido; las vencidas se eliminan.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if !s.is_expired_at(now) => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // vencida
        self.sessions.write().await.remove(token);
        log::debug!("Sesión vencida descartada");
        None
    }

    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Elimina todas las sesiones vencidas y devuelve cuántas se borraron.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    /// Tarea de fondo que barre sesiones vencidas cada `PURGE_INTERVAL`.
    pub fn spawn_purge_task(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let removed = service.purge_expired().await;
                if removed > 0 {
                    log::info!("{} sesiones vencidas eliminadas", removed);
                }
            }
        })
    }
}
