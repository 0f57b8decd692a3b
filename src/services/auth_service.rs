//! services/auth_service.rs
//! Verificación del payload del Telegram Login Widget.
//!
//! El widget firma todos los campos que envía: se ordenan como `key=value`,
//! se unen con `\n` y se calcula HMAC-SHA256 con `SHA256(bot_token)` como llave.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use openssl::{hash::MessageDigest, memcmp, pkey::PKey, sign::Signer};
use thiserror::Error;

use crate::models::auth_model::TelegramUser;

/// Tolerancia para relojes adelantados.
const MAX_CLOCK_SKEW_SECS: i64 = 60;
const HASH_HEX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login payload has no hash")]
    MissingHash,
    #[error("Login hash is malformed")]
    MalformedHash,
    #[error("Login signature does not match")]
    SignatureMismatch,
    #[error("Login payload has no '{0}' field")]
    MissingField(&'static str),
    #[error("Login field '{0}' is invalid")]
    InvalidField(&'static str),
    #[error("Login has expired")]
    Expired,
    #[error("Login auth_date is in the future")]
    FromFuture,
    #[error("Crypto error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),
}

/// Login cuya firma y frescura ya fueron comprobadas.
/// Solo `TelegramAuthService::verify` lo construye, así que una sesión
/// nunca existe sin haber pasado la verificación.
#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    user: TelegramUser,
    auth_date: DateTime<Utc>,
}

impl VerifiedLogin {
    pub fn user(&self) -> &TelegramUser {
        &self.user
    }

    pub fn auth_date(&self) -> DateTime<Utc> {
        self.auth_date
    }
}

#[derive(Clone)]
pub struct TelegramAuthService {
    secret_key: [u8; 32],
    max_age: Duration,
}

impl TelegramAuthService {
    pub fn new(bot_token: &str, max_age: Duration) -> Self {
        TelegramAuthService {
            secret_key: openssl::sha::sha256(bot_token.as_bytes()),
            max_age,
        }
    }

    /// Verifica el payload recibido en el callback contra el reloj actual.
    pub fn verify(&self, fields: &HashMap<String, String>) -> Result<VerifiedLogin, AuthError> {
        self.verify_at(fields, Utc::now())
    }

    pub fn verify_at(
        &self,
        fields: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<VerifiedLogin, AuthError> {
        let received = fields.get("hash").ok_or(AuthError::MissingHash)?;
        if received.len() != HASH_HEX_LEN {
            return Err(AuthError::MalformedHash);
        }
        let received = hex::decode(received).map_err(|_| AuthError::MalformedHash)?;

        let expected = self.sign(&data_check_string(fields))?;
        // memcmp::eq exige el mismo largo; ya está garantizado arriba.
        if !memcmp::eq(&expected, &received) {
            return Err(AuthError::SignatureMismatch);
        }

        let auth_ts = parse_i64(fields, "auth_date")?;
        let auth_date = Utc
            .timestamp_opt(auth_ts, 0)
            .single()
            .ok_or(AuthError::InvalidField("auth_date"))?;

        if now - auth_date > self.max_age {
            return Err(AuthError::Expired);
        }
        if auth_date - now > Duration::seconds(MAX_CLOCK_SKEW_SECS) {
            return Err(AuthError::FromFuture);
        }

        let user = TelegramUser {
            id: parse_i64(fields, "id")?,
            first_name: fields.get("first_name").cloned().unwrap_or_default(),
            last_name: fields.get("last_name").cloned(),
            username: fields.get("username").cloned(),
            photo_url: fields.get("photo_url").cloned(),
        };

        Ok(VerifiedLogin { user, auth_date })
    }

    /// HMAC-SHA256 del data-check-string con la llave derivada del token.
    pub fn sign(&self, data_check_string: &str) -> Result<Vec<u8>, AuthError> {
        let key = PKey::hmac(&self.secret_key)?;
        let mut signer = Signer::new(MessageDigest::sha256(), &key)?;
        signer.update(data_check_string.as_bytes())?;
        Ok(signer.sign_to_vec()?)
    }
}

/// Todos los campos menos `hash`, ordenados por clave, como `key=value` unidos por `\n`.
pub fn data_check_string(fields: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&String, &String)> =
        fields.iter().filter(|(k, _)| k.as_str() != "hash").collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_i64(fields: &HashMap<String, String>, key: &'static str) -> Result<i64, AuthError> {
    fields
        .get(key)
        .ok_or(AuthError::MissingField(key))?
        .trim()
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidField(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_string_is_sorted_and_skips_hash() {
        let fields: HashMap<String, String> = [
            ("username", "ivan"),
            ("id", "42"),
            ("hash", "ffff"),
            ("auth_date", "1700000000"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(
            data_check_string(&fields),
            "auth_date=1700000000\nid=42\nusername=ivan"
        );
    }

    #[test]
    fn signature_matches_reference_hmac() {
        let service = TelegramAuthService::new("token", Duration::days(1));
        let sig = service.sign("auth_date=1\nid=1").unwrap();
        assert_eq!(
            hex::encode(sig),
            "95e15ce904465b851f22319be7cada4afa44e0a264d056b32d1b07fde4addc5a"
        );
    }
}
