//! config/dashboard_config.rs
//! Configuración global del dashboard, leída de variables de entorno (o de un .env).

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use chrono_tz::Tz;

pub const DEFAULT_DB_FILE: &str = "/var/lib/light_status/config.db";
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_AUTH_MAX_AGE_SECS: i64 = 86_400;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;
pub const DEFAULT_STATIC_DIR: &str = "./static";
/// Tope para ventanas y TTL configurables: 10 años.
pub const MAX_DURATION_SECS: i64 = 10 * 365 * 86_400;

#[derive(Clone)]
pub struct DashboardConfig {
    /// Token del bot; es el secreto compartido para verificar el login de Telegram.
    pub bot_token: String,
    /// Usuario del bot que se pinta en el widget de login.
    pub bot_username: String,
    pub db_file: String,
    pub bind_host: String,
    pub port: u16,
    /// Ventana de frescura de `auth_date`.
    pub auth_max_age: Duration,
    pub session_ttl: Duration,
    /// Zona horaria para canales que no tienen una propia.
    pub default_timezone: Tz,
    pub static_dir: String,
    pub cookie_secure: bool,
}

// El token nunca debe aparecer en logs.
impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("bot_token", &"<redacted>")
            .field("bot_username", &self.bot_username)
            .field("db_file", &self.db_file)
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("auth_max_age", &self.auth_max_age.num_seconds())
            .field("session_ttl", &self.session_ttl.num_seconds())
            .field("default_timezone", &self.default_timezone.name())
            .field("static_dir", &self.static_dir)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl DashboardConfig {
    /// Lee la configuración del entorno del proceso.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que `from_env`, pero con una función de búsqueda inyectable (útil en tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("BOT_TOKEN no está definido"))?;

        let default_timezone = match lookup("DEFAULT_TIMEZONE") {
            Some(name) => Tz::from_str(name.trim())
                .map_err(|e| anyhow!("DEFAULT_TIMEZONE inválido '{}': {}", name, e))?,
            None => chrono_tz::Europe::Kyiv,
        };

        Ok(DashboardConfig {
            bot_token,
            bot_username: lookup("BOT_USERNAME").unwrap_or_default(),
            db_file: lookup("DB_FILE").unwrap_or_else(|| DEFAULT_DB_FILE.to_string()),
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            auth_max_age: parse_secs(&lookup, "AUTH_MAX_AGE_SECS", DEFAULT_AUTH_MAX_AGE_SECS)?,
            session_ttl: parse_secs(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            default_timezone,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            cookie_secure: parse_var(&lookup, "COOKIE_SECURE", false)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valor inválido para {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

/// Segundos en `[0, MAX_DURATION_SECS]` como `Duration`.
fn parse_secs<F>(lookup: &F, key: &str, default: i64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: i64 = parse_var(lookup, key, default)?;
    if !(0..=MAX_DURATION_SECS).contains(&secs) {
        return Err(anyhow!(
            "Valor fuera de rango para {}: {} (0..={})",
            key,
            secs,
            MAX_DURATION_SECS
        ));
    }
    Duration::try_seconds(secs).with_context(|| format!("Valor fuera de rango para {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_only_token_is_set() {
        let cfg = DashboardConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(cfg.db_file, DEFAULT_DB_FILE);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.auth_max_age, Duration::seconds(86_400));
        assert_eq!(cfg.default_timezone, chrono_tz::Europe::Kyiv);
        assert!(!cfg.cookie_secure);
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(DashboardConfig::from_lookup(lookup_from(&[])).is_err());
        assert!(DashboardConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = DashboardConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn huge_or_negative_durations_name_the_variable() {
        for (key, value) in [
            ("AUTH_MAX_AGE_SECS", "9300000000000000"),
            ("SESSION_TTL_SECS", "10000000000000"),
            ("SESSION_TTL_SECS", "-1"),
        ] {
            let err = DashboardConfig::from_lookup(lookup_from(&[
                ("BOT_TOKEN", "123:abc"),
                (key, value),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains(key), "{}={}: {}", key, value, err);
        }

        let cfg = DashboardConfig::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("SESSION_TTL_SECS", "3600"),
        ]))
        .unwrap();
        assert_eq!(cfg.session_ttl, Duration::hours(1));
    }

    #[test]
    fn debug_hides_token() {
        let cfg =
            DashboardConfig::from_lookup(lookup_from(&[("BOT_TOKEN", "super-secret")])).unwrap();
        assert!(!format!("{:?}", cfg).contains("super-secret"));
    }
}
