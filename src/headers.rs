//! Outbound request header construction.
//!
//! Every API call carries a fixed cache policy and a fresh correlation id
//! so server-side logs can be tied back to one client request. The id is
//! a trace handle, not a credential — it is not generated from a secure
//! source and must never gate anything.

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};

use crate::clock::epoch_millis;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Header carrying a CAPTCHA token when one was issued for the call.
pub const CAPTCHA_TOKEN_HEADER: &str = "x-captcha-token";

/// Base-36 digits per random id fragment.
const FRAGMENT_DIGITS: u32 = 8;

/// Produce a correlation id for one outbound request.
///
/// Base-36 of the current epoch milliseconds followed by two independent
/// random fragments, joined by `-`. Unique with high probability within a
/// process and roughly time-ordered; the alphabet is `[0-9a-z-]`, so the
/// value is always header-safe.
pub fn correlation_id() -> String {
    let mut rng = rand::thread_rng();
    let bound = 36u64.pow(FRAGMENT_DIGITS);
    format!(
        "{}-{}-{}",
        to_base36(u128::from(epoch_millis())),
        to_base36(u128::from(rng.gen_range(0..bound))),
        to_base36(u128::from(rng.gen_range(0..bound))),
    )
}

/// Build the standard header set for one outbound API call.
///
/// Always contains `Cache-Control: no-store` and a fresh non-empty
/// correlation id. The CAPTCHA header is present iff `captcha_token` is a
/// non-empty string; it is never emitted with an empty value. Tokens with
/// non-header-safe bytes are omitted rather than failing the call.
pub fn build_request_headers(captcha_token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let id = correlation_id();
    // The id alphabet cannot produce an invalid header value.
    let id_value = HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("0"));
    headers.insert(REQUEST_ID_HEADER, id_value);

    if let Some(token) = captcha_token {
        let token = token.trim();
        if !token.is_empty() {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(CAPTCHA_TOKEN_HEADER, value);
            }
        }
    }
    headers
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
