//! Refresh-token cookie handling.
//!
//! The refresh token travels exclusively in the `rt` cookie: HTTP-only so
//! scripts cannot read it, `SameSite=None; Secure` so the browser sends it
//! cross-site over HTTPS only. It is never part of a JSON body.

use axum::http::header::{COOKIE, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};

pub const REFRESH_COOKIE_NAME: &str = "rt";

/// Builds the `Set-Cookie` value carrying a freshly minted refresh token.
/// `Max-Age` matches the token's own expiry.
pub fn refresh_cookie(token: &str, max_age_seconds: u64) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{REFRESH_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=None; Secure; Max-Age={max_age_seconds}"
    ))
}

/// Builds the `Set-Cookie` value that expires the refresh cookie.
pub fn clear_refresh_cookie() -> HeaderValue {
    HeaderValue::from_static("rt=; Path=/; HttpOnly; SameSite=None; Secure; Max-Age=0")
}

/// Reads the refresh token out of the request's `Cookie` header, if any.
pub fn refresh_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let Some(key) = parts.next() else { continue };
        // Flag-style segments without `=` are skipped, not fatal.
        let Some(val) = parts.next() else { continue };
        if key.trim() == REFRESH_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}
