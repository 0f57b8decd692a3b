use anyhow::{Context, Result};
use chrono_tz::Tz;
use sqlx::{Pool, Sqlite};

use crate::models::channel_model::ChannelRecord;

const CHANNEL_COLUMNS: &str = r#"
    channel_id,
    owner_id,
    channel_name,
    CAST(is_power_on AS INTEGER) AS is_power_on,
    CAST(last_request_time AS REAL) AS last_request_time,
    timezone
"#;

#[derive(Clone)]
pub struct ChannelService {
    db_pool: Pool<Sqlite>,
    default_timezone: Tz,
}

impl ChannelService {
    pub fn new(db_pool: Pool<Sqlite>, default_timezone: Tz) -> Self {
        ChannelService {
            db_pool,
            default_timezone,
        }
    }

    /// Canales cuyo dueño es `owner_id`.
    pub async fn list_owned(&self, owner_id: i64) -> Result<Vec<ChannelRecord>> {
        let sql = format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE owner_id = ?1 ORDER BY channel_id"
        );

        let rows = sqlx::query_as::<_, ChannelRecord>(&sql)
            .bind(owner_id)
            .fetch_all(&self.db_pool)
            .await
            .context("Error listando canales")?;

        Ok(rows)
    }

    /// Devuelve el canal solo si pertenece a `owner_id`.
    /// `None` tanto si no existe como si es de otro usuario.
    pub async fn get_owned(&self, channel_id: i64, owner_id: i64) -> Result<Option<ChannelRecord>> {
        let sql = format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE channel_id = ?1 AND owner_id = ?2"
        );

        let row = sqlx::query_as::<_, ChannelRecord>(&sql)
            .bind(channel_id)
            .bind(owner_id)
            .fetch_optional(&self.db_pool)
            .await
            .context("Error consultando canal")?;

        debug_assert!(row.as_ref().map_or(true, |ch| ch.owner_id == Some(owner_id)));
        Ok(row)
    }

    /// Zona horaria efectiva del canal.
    pub fn timezone_for(&self, channel: &ChannelRecord) -> Tz {
        match channel.timezone.as_deref().map(str::trim) {
            None | Some("") => self.default_timezone,
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                log::warn!(
                    "Zona horaria inválida '{}' en canal {}, usando UTC",
                    name,
                    channel.channel_id
                );
                Tz::UTC
            }),
        }
    }
}
