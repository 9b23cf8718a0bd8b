//! Cookie reading and construction on raw HTTP headers.
//!
//! The three auth cookies are the only cookies in the service; these two
//! helpers parse and build them directly on the header values.

use axum::http::HeaderMap;

use super::token::PrincipalKind;

/// Extracts a named cookie's value from the `Cookie` request header.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

    for pair in header.split(';') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if key == name {
            return Some(value.to_string());
        }
    }

    None
}

/// Builds the `Set-Cookie` value carrying a kind-scoped token.
/// HTTP-only always; SameSite and Max-Age follow the kind.
pub fn auth_cookie(kind: PrincipalKind, token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite={}; Max-Age={}; Path=/",
        kind.cookie_name(),
        token,
        kind.same_site(),
        kind.ttl_seconds(),
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_read_cookie_single() {
        let headers = headers_with("hr_token=abc123");
        assert_eq!(read_cookie(&headers, "hr_token").as_deref(), Some("abc123"));
        assert_eq!(read_cookie(&headers, "candidate_token"), None);
    }

    #[test]
    fn test_read_cookie_among_many() {
        let headers = headers_with("theme=dark; candidate_token=tok.en.value; lang=en");
        assert_eq!(
            read_cookie(&headers, "candidate_token").as_deref(),
            Some("tok.en.value")
        );
    }

    #[test]
    fn test_read_cookie_missing_header() {
        assert_eq!(read_cookie(&HeaderMap::new(), "hr_token"), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie(PrincipalKind::SiteAdmin, "t0k", false);
        assert_eq!(
            cookie,
            "admin_token=t0k; HttpOnly; SameSite=Strict; Max-Age=86400; Path=/"
        );

        let cookie = auth_cookie(PrincipalKind::Candidate, "t0k", true);
        assert!(cookie.starts_with("candidate_token=t0k; HttpOnly; SameSite=Lax; Max-Age=604800"));
        assert!(cookie.ends_with("; Secure"));
    }
}
