//! Token cookie transport.
//!
//! The signed token travels in a single named cookie; a bare `token` header
//! is accepted as a fallback for non-browser clients.

use axum::http::{HeaderMap, HeaderValue};

pub const TOKEN_COOKIE: &str = "token";

/// Pull the raw token from the request, cookie first, then header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = parse_cookie(headers, TOKEN_COOKIE) {
        return Some(token);
    }
    headers
        .get(TOKEN_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

/// `Set-Cookie` value for a fresh session token. `max_age` mirrors the
/// token ttl so cookie and credential expire together.
pub fn set_token_cookie(token: &str, max_age_secs: i64, secure: bool) -> HeaderValue {
    let mut value = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, max_age_secs
    );
    if secure {
        value.push_str("; Secure");
    }
    HeaderValue::from_str(&value).expect("cookie value is header-safe")
}

/// `Set-Cookie` value that discards the client-held token.
pub fn clear_token_cookie(secure: bool) -> HeaderValue {
    let mut value = format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Strict; Path=/",
        TOKEN_COOKIE
    );
    if secure {
        value.push_str("; Secure");
    }
    HeaderValue::from_str(&value).expect("cookie value is header-safe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_wins_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("a=1; token=from-cookie; b=2"));
        headers.insert("token", HeaderValue::from_static("from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn header_fallback_applies() {
        let mut headers = HeaderMap::new();
        headers.insert("token", HeaderValue::from_static("from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn absent_token_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn secure_flag_controls_cookie_attribute() {
        let secure = set_token_cookie("abc", 60, true);
        assert!(secure.to_str().unwrap().contains("; Secure"));

        let plain = set_token_cookie("abc", 60, false);
        assert!(!plain.to_str().unwrap().contains("; Secure"));
        assert!(plain.to_str().unwrap().contains("Max-Age=60"));
    }
}
