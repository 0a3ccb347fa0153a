// src/common/cookies.rs
//! Cookie construction and parsing shared by the login flow and the session guard

use axum::http::{header, HeaderMap};
use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, SameSite};

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "session";

/// Lifetime of the transient OAuth state cookie
pub const STATE_COOKIE_MAX_AGE_SECS: i64 = 10 * 60;

/// Name of the provider-scoped OAuth state cookie
pub fn state_cookie_name(provider: &str) -> String {
    format!("{}_oauth_state", provider)
}

/// HTTP-only, same-site-lax cookie scoped to the whole site
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that instructs the browser to drop `name`
pub fn clear_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Value of the first cookie called `name` in the request's Cookie headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw.to_string()).flatten())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_build_cookie_attributes() {
        let rendered = build_cookie(SESSION_COOKIE, "abc", 60, true).to_string();
        assert!(rendered.starts_with("session=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=60"));
    }

    #[test]
    fn test_insecure_cookie_in_development() {
        let rendered = build_cookie(SESSION_COOKIE, "abc", 60, false).to_string();
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let rendered = clear_cookie("google_oauth_state", true).to_string();
        assert!(rendered.starts_with("google_oauth_state="));
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=s3cr3t; other=1"),
        );
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("s3cr3t".to_string()));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("google_oauth_state=xyz"));
        assert_eq!(
            read_cookie(&headers, &state_cookie_name("google")),
            Some("xyz".to_string())
        );
    }
}
