//! Admin bearer-token check for mutating endpoints.
//!
//! The core only needs a yes/no: is this caller allowed to mutate
//! quizzes? Token comparison is constant-time so the check does not leak
//! prefix length. With no ADMIN_TOKEN configured, mutating endpoints are
//! unavailable (503) rather than open.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::warn;

use crate::error::AppError;

pub fn authorize_admin(headers: &HeaderMap, admin_token: Option<&str>) -> Result<(), AppError> {
    let Some(expected) = admin_token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Err(AppError::AuthNotConfigured);
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => {
            warn!(target: "anaume_backend", "Rejected admin request");
            Err(AppError::Unauthorized)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn accepts_the_configured_token() {
        let h = headers_with("Bearer s3cret");
        assert!(authorize_admin(&h, Some("s3cret")).is_ok());
    }

    #[test]
    fn rejects_wrong_or_missing_tokens() {
        let h = headers_with("Bearer nope");
        assert!(matches!(
            authorize_admin(&h, Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize_admin(&HeaderMap::new(), Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
        // Scheme must be Bearer.
        let h = headers_with("Basic s3cret");
        assert!(matches!(
            authorize_admin(&h, Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn unconfigured_token_disables_the_endpoint() {
        let h = headers_with("Bearer anything");
        assert!(matches!(
            authorize_admin(&h, None),
            Err(AppError::AuthNotConfigured)
        ));
        assert!(matches!(
            authorize_admin(&h, Some("   ")),
            Err(AppError::AuthNotConfigured)
        ));
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
