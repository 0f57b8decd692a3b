//! models/status_model.rs
//! Historial de estados (up/down) y las series que consume el frontend.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize, Serializer};

/// Fila de la tabla `history`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StatusRecord {
    pub timestamp: f64, // unix seconds
    pub status: i64,    // 1 = hay luz, 0 = no hay
}

impl StatusRecord {
    pub fn is_up(&self) -> bool {
        self.status != 0
    }
}

/// Ventanas de tiempo que acepta el dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Day,
    ThreeDays,
    #[default]
    Week,
    TwoWeeks,
    Month,
}

impl TimeRange {
    pub fn duration(self) -> Duration {
        match self {
            TimeRange::Day => Duration::hours(24),
            TimeRange::ThreeDays => Duration::days(3),
            TimeRange::Week => Duration::days(7),
            TimeRange::TwoWeeks => Duration::days(14),
            TimeRange::Month => Duration::days(30),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::ThreeDays => "3d",
            TimeRange::Week => "7d",
            TimeRange::TwoWeeks => "14d",
            TimeRange::Month => "30d",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeRange::Day),
            "3d" => Ok(TimeRange::ThreeDays),
            "7d" => Ok(TimeRange::Week),
            "14d" => Ok(TimeRange::TwoWeeks),
            "30d" => Ok(TimeRange::Month),
            other => Err(format!(
                "Unsupported range '{}', expected one of 24h, 3d, 7d, 14d, 30d",
                other
            )),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Query de GET /api/stats/{channel_id}
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub time: i64, // ms, para Chart.js
    pub status: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyStats {
    pub uptime: f64,   // segundos
    pub downtime: f64, // segundos
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsTotals {
    pub uptime: f64,
    pub downtime: f64,
    pub outages: u32,
}

/// Resultado puro del cálculo (sin datos del canal).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStats {
    pub timeline: Vec<TimelinePoint>,
    pub daily: BTreeMap<String, DailyStats>,
    pub totals: StatsTotals,
}

/// Respuesta de GET /api/stats/{channel_id}
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub channel_id: i64,
    pub range: TimeRange,
    pub from: i64, // ms
    pub to: i64,   // ms
    pub timezone: String,
    pub timeline: Vec<TimelinePoint>,
    pub daily: BTreeMap<String, DailyStats>,
    pub totals: StatsTotals,
}
