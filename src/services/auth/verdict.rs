use std::fmt;

use thiserror::Error;

use super::signed_token::SignedTokenClaims;

/// One authentication method exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Basic,
    StaticBearer,
    ApiKey,
    SignedToken,
}

impl Scheme {
    #[cfg(test)]
    pub const ALL: [Scheme; 4] = [
        Scheme::Basic,
        Scheme::StaticBearer,
        Scheme::ApiKey,
        Scheme::SignedToken,
    ];

    /// Name used in response messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Scheme::Basic => "Basic Auth",
            Scheme::StaticBearer => "Token Auth",
            Scheme::ApiKey => "API Key Auth",
            Scheme::SignedToken => "JWT Auth",
        }
    }

    /// Only Basic asks the client to prompt for credentials.
    pub fn issues_challenge(&self) -> bool {
        matches!(self, Scheme::Basic)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a verification did not authenticate.
///
/// Display strings are deliberately generic: they go straight into the
/// response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("credentials not provided")]
    Missing,
    #[error("credentials malformed")]
    Malformed,
    #[error("invalid credentials")]
    Mismatch,
    #[error("invalid token signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,
    #[error("internal error")]
    InternalError,
}

impl AuthFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "MISSING_CREDENTIALS",
            AuthFailure::Malformed => "MALFORMED_CREDENTIALS",
            AuthFailure::Mismatch => "INVALID_CREDENTIALS",
            AuthFailure::SignatureInvalid => "INVALID_SIGNATURE",
            AuthFailure::Expired => "TOKEN_EXPIRED",
            AuthFailure::UnexpectedAlgorithm => "UNEXPECTED_ALGORITHM",
            AuthFailure::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Successful verification. Claims are only present for signed tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    pub scheme: Scheme,
    pub claims: Option<SignedTokenClaims>,
}

impl Authenticated {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            claims: None,
        }
    }

    pub fn with_claims(claims: SignedTokenClaims) -> Self {
        Self {
            scheme: Scheme::SignedToken,
            claims: Some(claims),
        }
    }
}

/// Outcome of exactly one verification call.
pub type Verdict = Result<Authenticated, AuthFailure>;
