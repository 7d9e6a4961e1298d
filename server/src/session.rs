//! Request-scoped identity carried in an encrypted cookie.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::{DateTime, Utc};
use products_hr::LoginSummary;
use serde::{Deserialize, Serialize};
use time::Duration as TimeDuration;

use crate::{config::AppConfig, http::HttpError};

pub const SESSION_COOKIE: &str = "portal_session";

/// Who is signed in. Every data handler checks its path against this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub employee_number: i64,
    pub internal_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// `None` when `ttl` pushes the expiry past the representable range.
    pub fn issue(employee_number: i64, internal_id: i64, ttl: chrono::Duration) -> Option<Self> {
        Some(Self {
            employee_number,
            internal_id,
            expires_at: Utc::now().checked_add_signed(ttl)?,
        })
    }

    pub fn from_login(summary: &LoginSummary, ttl: chrono::Duration) -> Option<Self> {
        let employee_number = summary.id.parse().ok()?;
        Self::issue(employee_number, summary.hidden_id, ttl)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub fn session_cookie(identity: &Identity, config: &AppConfig) -> serde_json::Result<Cookie<'static>> {
    let max_age = TimeDuration::seconds(config.session_ttl.num_seconds());
    Ok(Cookie::build((SESSION_COOKIE, serde_json::to_string(identity)?))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build())
}

pub fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

/// Decode and validate the identity cookie.
pub fn load_identity(jar: &PrivateCookieJar) -> Result<Identity, HttpError> {
    let cookie = jar
        .get(SESSION_COOKIE)
        .ok_or_else(|| HttpError::unauthorized("Not signed in"))?;
    let identity: Identity = serde_json::from_str(cookie.value())
        .map_err(|_| HttpError::unauthorized("Invalid session"))?;
    if identity.is_expired(Utc::now()) {
        return Err(HttpError::unauthorized("Session expired"));
    }
    Ok(identity)
}
