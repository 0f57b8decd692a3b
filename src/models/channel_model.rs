//! models/channel_model.rs
//! Canales monitoreados (escritos por el bot externo; aquí solo se leen).

use serde::Serialize;

/// Fila de la tabla `channels` tal como la deja el bot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRecord {
    pub channel_id: i64,
    pub owner_id: Option<i64>,
    pub channel_name: Option<String>,
    pub is_power_on: Option<i64>,
    pub last_request_time: Option<f64>, // unix seconds
    pub timezone: Option<String>,
}

impl ChannelRecord {
    /// Nombre para mostrar; si el bot no guardó uno usamos "Channel <id>".
    pub fn display_name(&self) -> String {
        match self.channel_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Channel {}", self.channel_id),
        }
    }

    pub fn is_online(&self) -> bool {
        self.is_power_on.unwrap_or(0) != 0
    }
}

/// Elemento de GET /api/channels
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub id: i64,
    pub name: String,
    pub status: String, // "online" | "offline"
    pub last_ping: Option<f64>,
    pub timezone: String,
}

impl ChannelSummary {
    pub fn from_record(record: &ChannelRecord, timezone: &str) -> Self {
        ChannelSummary {
            id: record.channel_id,
            name: record.display_name(),
            status: if record.is_online() { "online" } else { "offline" }.to_string(),
            last_ping: record.last_request_time,
            timezone: timezone.to_string(),
        }
    }
}
