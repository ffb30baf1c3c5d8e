//! Optional shared-secret gate for `GET /run`.
//!
//! When a credential is configured the caller must send it verbatim in the
//! `X-API-Key` header. With no credential the endpoint is open. The expected
//! key is captured once at startup and injected as a [`RunKey`] extension.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

/// Request header carrying the caller's credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extension type carrying the expected credential (`None` = open), injected
/// into the router layer so [`require_run_key`] can access it without
/// touching `AppState`.
#[derive(Clone, Debug, Default)]
pub struct RunKey(pub Option<String>);

impl RunKey {
    /// Build from a possibly empty configured key.
    pub fn new(key: Option<&str>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(str::to_string))
    }
}

/// Axum middleware that rejects requests whose `X-API-Key` header does not
/// match the configured [`RunKey`].
///
/// # Error responses
///
/// - `401 Unauthorized` with `{"error":"unauthorized"}`: header missing,
///   empty, or not equal to the configured key
/// - `500 Internal Server Error`: [`RunKey`] extension not found (misconfiguration)
pub async fn require_run_key(request: Request, next: Next) -> Response {
    let expected = match request.extensions().get::<RunKey>() {
        Some(key) => key.0.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Server configuration error"})),
            )
                .into_response();
        }
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .map(axum::http::HeaderValue::as_bytes);

    if !is_authorized(expected.as_deref().map(str::as_bytes), provided) {
        debug!("Rejected {} without a valid API key", request.uri().path());
        return unauthorized();
    }

    next.run(request).await
}

/// Decide whether `provided` satisfies `expected`.
///
/// An absent or empty `expected` authorizes everything. Otherwise the header
/// must be present and byte-for-byte equal. Raw header bytes are compared, so
/// keys outside visible ASCII still match.
pub fn is_authorized(expected: Option<&[u8]>, provided: Option<&[u8]>) -> bool {
    match expected {
        None | Some(b"") => true,
        Some(key) => match provided {
            Some(p) if !p.is_empty() => constant_time_eq(key, p),
            _ => false,
        },
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized"})),
    )
        .into_response()
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
///
/// Always iterates over the full length of `expected` regardless of `provided`
/// length, so an attacker cannot determine the key length from response times.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    for (i, e) in expected.iter().enumerate() {
        let p = provided.get(i).copied().unwrap_or(0xff);
        diff |= e ^ p;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<&[u8]> {
        Some(s.as_bytes())
    }

    #[test]
    fn test_open_when_no_key() {
        assert!(is_authorized(None, None));
        assert!(is_authorized(None, some("anything")));
        assert!(is_authorized(some(""), None));
    }

    #[test]
    fn test_missing_or_empty_header_rejected() {
        assert!(!is_authorized(some("secret"), None));
        assert!(!is_authorized(some("secret"), some("")));
    }

    #[test]
    fn test_exact_match_only() {
        assert!(is_authorized(some("secret"), some("secret")));
        assert!(!is_authorized(some("secret"), some("wrong")));
        assert!(!is_authorized(some("secret"), some("Secret")));
        assert!(!is_authorized(some("secret"), some("secret ")));
        assert!(!is_authorized(some("secret"), some("secre")));
    }

    #[test]
    fn test_non_ascii_key() {
        assert!(is_authorized(some("sécret"), some("sécret")));
        assert!(!is_authorized(some("sécret"), some("sécreT")));
        let one_byte_off = [b's', 0xc3, 0xa9, b'c', b'r', b'e', b's'];
        assert!(!is_authorized(some("sécret"), Some(&one_byte_off[..])));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(!constant_time_eq(b"abc", b""));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_run_key_ignores_empty() {
        assert!(RunKey::new(Some("")).0.is_none());
        assert!(RunKey::new(None).0.is_none());
        assert_eq!(RunKey::new(Some("k")).0.as_deref(), Some("k"));
    }
}
