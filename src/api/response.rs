/*
 * Responsibility
 * - Verdict → (HTTP status, stable code, message) の変換
 * - `{"code": <int>, "message": <string>}` での描画
 * - Basic 失敗時の WWW-Authenticate challenge
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::auth::{AuthFailure, Scheme, Verdict};

pub const BASIC_CHALLENGE: &str = r#"Basic realm="Restricted Area""#;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Uniform outcome of every endpoint.
#[derive(Debug)]
pub struct AuthResponse {
    status: StatusCode,
    failure: Option<AuthFailure>,
    message: String,
    challenge: bool,
}

/// Status for a failure. Independent of the scheme.
pub fn status_for(failure: AuthFailure) -> StatusCode {
    match failure {
        AuthFailure::Missing
        | AuthFailure::Malformed
        | AuthFailure::Mismatch
        | AuthFailure::SignatureInvalid
        | AuthFailure::Expired
        | AuthFailure::UnexpectedAlgorithm => StatusCode::UNAUTHORIZED,
        AuthFailure::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            failure: None,
            message: message.into(),
            challenge: false,
        }
    }

    pub fn failed(failure: AuthFailure, message: impl Into<String>) -> Self {
        Self {
            status: status_for(failure),
            failure: Some(failure),
            message: message.into(),
            challenge: false,
        }
    }

    pub fn from_verdict(scheme: Scheme, verdict: &Verdict) -> Self {
        match verdict {
            Ok(_) => Self::ok(format!("{}: authentication succeeded.", scheme.label())),
            Err(failure) => {
                let mut res = Self::failed(
                    *failure,
                    format!("{}: authentication failed ({}).", scheme.label(), failure),
                );
                res.challenge = scheme.issues_challenge();
                res
            }
        }
    }

    /// Stable machine-readable code; `OK` on success.
    pub fn code(&self) -> &'static str {
        self.failure.map(|f| f.code()).unwrap_or("OK")
    }
}

impl IntoResponse for AuthResponse {
    fn into_response(self) -> Response {
        let body = StatusBody {
            code: self.status.as_u16(),
            message: self.message,
            reason: self.failure.map(|f| f.code()),
        };

        let mut res = (self.status, Json(body)).into_response();
        if self.challenge {
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::verdict::Authenticated;

    const FAILURES: [AuthFailure; 7] = [
        AuthFailure::Missing,
        AuthFailure::Malformed,
        AuthFailure::Mismatch,
        AuthFailure::SignatureInvalid,
        AuthFailure::Expired,
        AuthFailure::UnexpectedAlgorithm,
        AuthFailure::InternalError,
    ];

    #[test]
    fn status_mapping_is_scheme_independent() {
        for failure in FAILURES {
            let expected = if failure == AuthFailure::InternalError {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::UNAUTHORIZED
            };
            for scheme in Scheme::ALL {
                let res = AuthResponse::from_verdict(scheme, &Err(failure));
                assert_eq!(res.status, expected, "{scheme} / {failure:?}");
                assert_eq!(res.code(), failure.code());
            }
        }
    }

    #[test]
    fn codes_are_distinct() {
        let mut codes: Vec<_> = FAILURES.iter().map(|f| f.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), FAILURES.len());
    }

    #[test]
    fn success_is_200_without_challenge() {
        for scheme in Scheme::ALL {
            let res = AuthResponse::from_verdict(scheme, &Ok(Authenticated::new(scheme)));
            assert_eq!(res.status, StatusCode::OK);
            assert_eq!(res.code(), "OK");
            assert!(!res.challenge);
            assert!(res.message.starts_with(scheme.label()));
        }
    }

    #[test]
    fn only_basic_failures_challenge() {
        for scheme in Scheme::ALL {
            let res = AuthResponse::from_verdict(scheme, &Err(AuthFailure::Mismatch));
            assert_eq!(res.challenge, scheme == Scheme::Basic);

            let http = res.into_response();
            assert_eq!(
                http.headers().contains_key(header::WWW_AUTHENTICATE),
                scheme == Scheme::Basic
            );
        }
    }
}
