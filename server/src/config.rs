use std::{fmt, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// `cookie::Key` needs 64 bytes of key material.
const MIN_COOKIE_SECRET_BYTES: usize = 64;

const DEFAULT_SESSION_TTL_MINUTES: i64 = 8 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which record store backs the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Mock,
    Live,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Mock => "mock",
            StoreKind::Live => "live",
        }
    }
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(StoreKind::Mock),
            "live" => Ok(StoreKind::Live),
            other => Err(anyhow!("unknown RECORD_STORE {other:?}; expected mock or live")),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub cookie_key: Key,
    pub cors_allowed_origins: Vec<String>,
    pub store: StoreKind,
    pub session_ttl: chrono::Duration,
    pub request_timeout: Duration,
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Defaults around an explicit cookie key.
    pub fn new(cookie_key: Key) -> Self {
        Self {
            cookie_key,
            cors_allowed_origins: vec!["http://localhost:3000".into()],
            store: StoreKind::Mock,
            session_ttl: chrono::Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secure_cookies: true,
        }
    }

    pub fn load() -> Result<Self> {
        let cookie_secret =
            std::env::var("COOKIE_SECRET_BASE64").context("COOKIE_SECRET_BASE64 missing")?;
        let mut config = Self::new(decode_cookie_key(&cookie_secret)?);

        if let Ok(raw) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = split_list(&raw);
        }
        if let Ok(raw) = std::env::var("RECORD_STORE") {
            config.store = raw.parse()?;
        }
        if let Some(minutes) = env_parse::<i64>("SESSION_TTL_MINUTES")? {
            config.session_ttl = session_ttl(minutes)?;
        }
        if let Some(secs) = env_parse::<u64>("REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Ok(raw) = std::env::var("SECURE_COOKIES") {
            config.secure_cookies = parse_flag(&raw);
        }
        Ok(config)
    }
}

fn decode_cookie_key(encoded: &str) -> Result<Key> {
    let secret_bytes = STANDARD
        .decode(encoded.trim())
        .context("invalid COOKIE_SECRET_BASE64")?;
    if secret_bytes.len() < MIN_COOKIE_SECRET_BYTES {
        return Err(anyhow!(
            "COOKIE_SECRET_BASE64 must decode to at least {MIN_COOKIE_SECRET_BYTES} bytes"
        ));
    }
    Ok(Key::from(&secret_bytes[..MIN_COOKIE_SECRET_BYTES]))
}

/// Sessions must expire, and their expiry must fit in a timestamp.
fn session_ttl(minutes: i64) -> Result<chrono::Duration> {
    if minutes <= 0 {
        return Err(anyhow!("SESSION_TTL_MINUTES must be positive"));
    }
    let ttl = chrono::Duration::try_minutes(minutes)
        .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| anyhow!("SESSION_TTL_MINUTES {minutes} is out of range"))?;
    Ok(ttl)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| anyhow!("invalid {key}: {err}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_kind() {
        assert_eq!("mock".parse::<StoreKind>().unwrap(), StoreKind::Mock);
        assert_eq!(" LIVE ".parse::<StoreKind>().unwrap(), StoreKind::Live);
        assert!("odbc".parse::<StoreKind>().is_err());
    }

    #[test]
    fn cookie_key_needs_enough_material() {
        let short = STANDARD.encode([7u8; 32]);
        assert!(decode_cookie_key(&short).is_err());
        let long = STANDARD.encode([7u8; 64]);
        assert!(decode_cookie_key(&long).is_ok());
        assert!(decode_cookie_key("not base64!").is_err());
    }

    #[test]
    fn session_ttl_must_be_representable() {
        assert_eq!(session_ttl(90).unwrap(), chrono::Duration::minutes(90));
        assert!(session_ttl(0).is_err());
        assert!(session_ttl(-5).is_err());
        assert!(session_ttl(1_000_000_000_000).is_err());
        assert!(session_ttl(i64::MAX).is_err());
    }

    #[test]
    fn splits_origin_lists() {
        assert_eq!(
            split_list(" http://a.test, ,http://b.test "),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn parses_flags() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn defaults_use_mock_store() {
        let config = AppConfig::new(Key::from(&[1u8; 64]));
        assert_eq!(config.store, StoreKind::Mock);
        assert!(config.secure_cookies);
        assert_eq!(config.session_ttl, chrono::Duration::minutes(480));
    }
}
