//! GM session gate: a shared password mints an opaque cookie token held in
//! an in-memory set. This is a privilege toggle, not a security system.

use std::collections::HashSet;

use axum::http::{header, HeaderMap};
use tokio::sync::Mutex;
use uuid::Uuid;

pub(crate) const SESSION_COOKIE: &str = "gm_session";

#[derive(Default)]
pub(crate) struct GmSessions {
    tokens: Mutex<HashSet<String>>,
}

impl GmSessions {
    pub(crate) async fn issue(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.lock().await.insert(token.clone());
        token
    }

    pub(crate) async fn revoke(&self, token: &str) {
        self.tokens.lock().await.remove(token);
    }

    pub(crate) async fn is_valid(&self, token: &str) -> bool {
        self.tokens.lock().await.contains(token)
    }
}

/// Pulls the GM session token out of the Cookie header, if any.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

pub(crate) async fn is_gm(headers: &HeaderMap, sessions: &GmSessions) -> bool {
    match session_token(headers) {
        Some(token) => sessions.is_valid(&token).await,
        None => false,
    }
}

pub(crate) fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub(crate) fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[tokio::test]
    async fn issued_tokens_validate_until_revoked() {
        let sessions = GmSessions::default();
        let token = sessions.issue().await;
        assert!(sessions.is_valid(&token).await);
        sessions.revoke(&token).await;
        assert!(!sessions.is_valid(&token).await);
    }

    #[test]
    fn token_parsed_from_multi_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; gm_session=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_cookie_yields_no_token() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
    }
}
