use std::fmt::Display;
use std::str::FromStr;

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};

pub const SESSION_COOKIE: &str = "session";

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub fn sign_session_id(id: &str, secret: &str) -> String {
    let hash = Sha256::digest(format!("{secret}.{id}").as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Builds the Set-Cookie value carrying a signed session handle.
pub fn session_cookie(id: &str, secret: &str) -> String {
    format!(
        "{SESSION_COOKIE}={id}.{sig}; Path=/; HttpOnly; SameSite=Lax",
        sig = sign_session_id(id, secret)
    )
}

/// Verifies a `<id>.<signature>` cookie value and returns the session handle.
pub fn verify_session_value(value: &str, secret: &str) -> Option<String> {
    let (id, sig) = value.rsplit_once('.')?;
    if !id.is_empty() && sig == sign_session_id(id, secret) {
        Some(id.to_string())
    } else {
        None
    }
}

/// Extracts and verifies the session handle from request headers.
pub fn session_from_headers(headers: &HeaderMap, secret: &str) -> Option<String> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookies) = cookie_header.to_str() else {
            continue;
        };
        for cookie in cookies.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == SESSION_COOKIE {
                    if let Some(id) = verify_session_value(value, secret) {
                        return Some(id);
                    }
                }
            }
        }
    }
    None
}

/// Deserializes an optional form field, mapping the empty string a browser
/// submits for an untouched input to `None`.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
