//! Credential extraction from request headers.
//!
//! Extraction only reads the request. Whatever the client sent is kept
//! verbatim; nothing is trimmed or normalised before comparison.

use axum::http::{HeaderMap, HeaderName, header};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::verdict::{AuthFailure, Scheme};

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

const BEARER_PREFIX: &str = "Bearer ";
const BASIC_PREFIX: &str = "basic ";

/// Credential material, tagged by scheme.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    UsernamePassword { username: Vec<u8>, password: Vec<u8> },
    OpaqueToken(Vec<u8>),
    OpaqueKey(Vec<u8>),
    SignedTokenString(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print credential material
        let kind = match self {
            Credential::UsernamePassword { .. } => "UsernamePassword",
            Credential::OpaqueToken(_) => "OpaqueToken",
            Credential::OpaqueKey(_) => "OpaqueKey",
            Credential::SignedTokenString(_) => "SignedTokenString",
        };
        f.debug_tuple("Credential").field(&kind).finish()
    }
}

impl Credential {
    /// Pull the credential for `scheme` out of the request headers.
    pub fn extract(scheme: Scheme, headers: &HeaderMap) -> Result<Self, AuthFailure> {
        match scheme {
            Scheme::Basic => {
                let (username, password) = basic_auth(headers)?;
                Ok(Credential::UsernamePassword { username, password })
            }
            Scheme::StaticBearer => {
                bearer_token(headers).map(|t| Credential::OpaqueToken(t.as_bytes().to_vec()))
            }
            Scheme::ApiKey => headers
                .get(API_KEY_HEADER)
                .map(|v| Credential::OpaqueKey(v.as_bytes().to_vec()))
                .ok_or(AuthFailure::Missing),
            Scheme::SignedToken => {
                bearer_token(headers).map(|t| Credential::SignedTokenString(t.to_string()))
            }
        }
    }
}

/// `Authorization: Bearer <token>`; the remainder after the prefix is returned as-is.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::Missing)?;
    let value = value.to_str().map_err(|_| AuthFailure::Malformed)?;

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthFailure::Malformed)
}

/// `Authorization: Basic base64(username:password)`.
///
/// The scheme name is matched case-insensitively, the password is everything
/// after the first `:`.
pub fn basic_auth(headers: &HeaderMap) -> Result<(Vec<u8>, Vec<u8>), AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::Missing)?
        .as_bytes();

    if value.len() < BASIC_PREFIX.len()
        || !value[..BASIC_PREFIX.len()].eq_ignore_ascii_case(BASIC_PREFIX.as_bytes())
    {
        return Err(AuthFailure::Malformed);
    }

    let decoded = STANDARD
        .decode(&value[BASIC_PREFIX.len()..])
        .map_err(|_| AuthFailure::Malformed)?;

    let colon = decoded
        .iter()
        .position(|b| *b == b':')
        .ok_or(AuthFailure::Malformed)?;

    let username = decoded[..colon].to_vec();
    let password = decoded[colon + 1..].to_vec();
    Ok((username, password))
}
