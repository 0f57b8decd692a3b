//! services/status_service.rs
//! Historial de estados por canal y cálculo de uptime/downtime.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::{Pool, Sqlite};

use crate::models::channel_model::ChannelRecord;
use crate::models::status_model::{
    ComputedStats, DailyStats, StatsResponse, StatusRecord, TimeRange, TimelinePoint,
};

#[derive(Clone)]
pub struct StatusService {
    db_pool: Pool<Sqlite>,
}

impl StatusService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        StatusService { db_pool }
    }

    /// Registros con `from <= timestamp <= to`, en orden cronológico.
    pub async fn history_in_window(
        &self,
        channel_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<StatusRecord>> {
        let rows = sqlx::query_as::<_, StatusRecord>(
            r#"
            SELECT
                CAST(timestamp AS REAL) AS timestamp,
                CAST(status AS INTEGER) AS status
            FROM history
            WHERE channel_id = ?1
              AND timestamp >= ?2
              AND timestamp <= ?3
            ORDER BY timestamp
            "#,
        )
        .bind(channel_id)
        .bind(to_secs(from))
        .bind(to_secs(to))
        .fetch_all(&self.db_pool)
        .await
        .context("Error consultando historial")?;

        Ok(rows)
    }

    /// Arma la respuesta completa de estadísticas para un canal ya autorizado.
    pub async fn channel_stats(
        &self,
        channel: &ChannelRecord,
        tz: Tz,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<StatsResponse> {
        let from = now - range.duration();
        let records = self
            .history_in_window(channel.channel_id, from, now)
            .await?;

        log::debug!(
            "Canal {}: {} registros en ventana {}",
            channel.channel_id,
            records.len(),
            range
        );

        let computed = compute_stats(&records, to_secs(from), to_secs(now), tz);

        Ok(StatsResponse {
            channel_id: channel.channel_id,
            range,
            from: from.timestamp_millis(),
            to: now.timestamp_millis(),
            timezone: tz.name().to_string(),
            timeline: computed.timeline,
            daily: computed.daily,
            totals: computed.totals,
        })
    }
}

/// Calcula timeline, uptime/downtime por día local y totales.
///
/// Cada registro mantiene su estado hasta el siguiente; el último lo mantiene
/// hasta `to`. Lo anterior al primer registro de la ventana no se cuenta.
/// Los intervalos que cruzan la medianoche local se parten en dos días.
pub fn compute_stats(records: &[StatusRecord], from: f64, to: f64, tz: Tz) -> ComputedStats {
    let mut out = ComputedStats::default();

    for (i, rec) in records.iter().enumerate() {
        out.timeline.push(TimelinePoint {
            time: (rec.timestamp * 1000.0).round() as i64,
            status: i64::from(rec.is_up()),
        });

        let previous_up = i == 0 || records[i - 1].is_up();
        if !rec.is_up() && previous_up {
            out.totals.outages += 1;
        }

        let start = rec.timestamp.max(from);
        let end = records
            .get(i + 1)
            .map(|next| next.timestamp)
            .unwrap_or(to)
            .min(to);
        if end <= start {
            continue;
        }

        let up = rec.is_up();
        if up {
            out.totals.uptime += end - start;
        } else {
            out.totals.downtime += end - start;
        }
        split_by_local_day(start, end, tz, |day, secs| {
            let entry = out.daily.entry(day).or_insert_with(DailyStats::default);
            if up {
                entry.uptime += secs;
            } else {
                entry.downtime += secs;
            }
        });
    }

    out
}

/// Reparte `[start, end)` entre los días locales de `tz` que cubre.
fn split_by_local_day<F>(start: f64, end: f64, tz: Tz, mut add: F)
where
    F: FnMut(String, f64),
{
    let mut cursor = start;
    while cursor < end {
        let Some(local) = from_secs(cursor).map(|dt| dt.with_timezone(&tz)) else {
            return;
        };
        let day = local.date_naive();
        let seg_end = match next_local_midnight(day, tz) {
            Some(midnight) if midnight > cursor => midnight.min(end),
            _ => end,
        };
        add(day.format("%Y-%m-%d").to_string(), seg_end - cursor);
        cursor = seg_end;
    }
}

/// Inicio (en segundos unix) del día local siguiente a `day`.
fn next_local_midnight(day: NaiveDate, tz: Tz) -> Option<f64> {
    let midnight = day.succ_opt()?.and_hms_opt(0, 0, 0)?;
    // En zonas donde el cambio de horario cae a medianoche, el día empieza a la 01:00.
    let start = tz
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())?;
    Some(start.timestamp_millis() as f64 / 1000.0)
}

fn to_secs(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}

fn from_secs(secs: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt((secs * 1000.0).floor() as i64).single()
}
