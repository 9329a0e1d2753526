//! HS256 signed tokens (JWT): verification and issuance.
//!
//! The declared algorithm is read from the raw header segment before
//! `jsonwebtoken` sees the token, so `none`, asymmetric algorithms and
//! other HMAC widths are refused as `UnexpectedAlgorithm` without touching
//! the signature. Expiry is checked here against a caller-supplied clock
//! instead of jsonwebtoken's own `exp` validation, which keeps the boundary
//! (`now >= exp` is expired) exact and testable.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::secret_store::Secret;
use super::verdict::AuthFailure;

const SUPPORTED_ALG: &str = "HS256";

/// Decoded payload of a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTokenClaims {
    pub expires_at: i64,
    pub claims: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    sub: &'a str,
    username: &'a str,
    iat: i64,
    exp: i64,
    jti: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    alg: String,
}

/// HMAC-SHA256 token verifier/issuer.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SignedTokenVerifier {
    enabled: bool,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SignedTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SignedTokenVerifier")
            .field("enabled", &self.enabled)
            .field("algorithm", &SUPPORTED_ALG)
            .finish()
    }
}

impl SignedTokenVerifier {
    pub fn new(signing_secret: &Secret) -> Self {
        let secret = signing_secret.expose();

        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked by `check_expiry` against an explicit clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            enabled: signing_secret.is_enabled(),
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify `token` as of `now` (unix seconds).
    ///
    /// Order matters: envelope, then algorithm, then signature, then expiry.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SignedTokenClaims, AuthFailure> {
        let header = parse_envelope(token)?;

        if header.alg != SUPPORTED_ALG {
            return Err(AuthFailure::UnexpectedAlgorithm);
        }

        // No trust material: nothing can carry a valid signature.
        if !self.enabled {
            return Err(AuthFailure::SignatureInvalid);
        }

        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::InvalidSignature => AuthFailure::SignatureInvalid,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        AuthFailure::UnexpectedAlgorithm
                    }
                    ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                        AuthFailure::Malformed
                    }
                    _ => AuthFailure::InternalError,
                })?;

        let expires_at = check_expiry(&data.claims, now)?;

        Ok(SignedTokenClaims {
            expires_at,
            claims: data.claims,
        })
    }

    pub fn issue(&self, subject: &str, ttl_seconds: u64) -> Result<String, AuthFailure> {
        self.issue_at(subject, ttl_seconds, chrono::Utc::now().timestamp())
    }

    /// Sign a token for `subject` valid from `now` for `ttl_seconds`.
    pub fn issue_at(&self, subject: &str, ttl_seconds: u64, now: i64) -> Result<String, AuthFailure> {
        // Never sign with an empty key.
        if !self.enabled {
            return Err(AuthFailure::InternalError);
        }

        let ttl = i64::try_from(ttl_seconds).map_err(|_| AuthFailure::InternalError)?;
        let claims = IssuedClaims {
            sub: subject,
            username: subject,
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|_| AuthFailure::InternalError)
    }
}

/// Split into three segments, check the payload decodes, return the header.
fn parse_envelope(token: &str) -> Result<EnvelopeHeader, AuthFailure> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthFailure::Malformed);
    };

    if header.is_empty() || payload.is_empty() {
        return Err(AuthFailure::Malformed);
    }

    let decode = |segment: &str| {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| AuthFailure::Malformed)
    };

    // payload must at least be a JSON object
    serde_json::from_slice::<Map<String, Value>>(&decode(payload)?)
        .map_err(|_| AuthFailure::Malformed)?;

    serde_json::from_slice(&decode(header)?).map_err(|_| AuthFailure::Malformed)
}

/// Missing or non-numeric `exp` counts as already expired.
fn check_expiry(claims: &Map<String, Value>, now: i64) -> Result<i64, AuthFailure> {
    let exp = claims
        .get("exp")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or(AuthFailure::Expired)?;

    if now >= exp {
        return Err(AuthFailure::Expired);
    }
    Ok(exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const T0: i64 = 1_700_000_000;
    const HOUR: u64 = 3600;

    fn verifier(secret: &str) -> SignedTokenVerifier {
        SignedTokenVerifier::new(&Secret::new(secret))
    }

    fn raw_token(header: &Value, payload: &Value, signature: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            signature
        )
    }

    fn sign_with(alg: Algorithm, secret: &str, claims: &Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let v = verifier("top-secret");
        let token = v.issue_at("DemoUser", HOUR, T0).unwrap();

        let claims = v.verify_at(&token, T0).unwrap();
        assert_eq!(claims.claims.get("sub"), Some(&json!("DemoUser")));
        assert_eq!(claims.claims.get("username"), Some(&json!("DemoUser")));
        assert_eq!(claims.expires_at, T0 + HOUR as i64);
    }

    #[test]
    fn expiry_boundary_one_hour() {
        let v = verifier("top-secret");
        let token = v.issue_at("DemoUser", HOUR, T0).unwrap();

        assert!(v.verify_at(&token, T0 + 59 * 60).is_ok());
        assert_eq!(
            v.verify_at(&token, T0 + 61 * 60),
            Err(AuthFailure::Expired)
        );
        // at exactly exp the token is no longer valid
        assert_eq!(
            v.verify_at(&token, T0 + HOUR as i64),
            Err(AuthFailure::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let token = verifier("other-secret").issue_at("DemoUser", HOUR, T0).unwrap();
        assert_eq!(
            verifier("top-secret").verify_at(&token, T0),
            Err(AuthFailure::SignatureInvalid)
        );
    }

    #[test]
    fn other_hmac_width_is_unexpected_algorithm() {
        // Correctly signed with the right secret, just not HS256.
        let token = sign_with(
            Algorithm::HS512,
            "top-secret",
            &json!({"sub": "DemoUser", "exp": T0 + 60}),
        );
        assert_eq!(
            verifier("top-secret").verify_at(&token, T0),
            Err(AuthFailure::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn none_and_asymmetric_algorithms_are_refused() {
        let payload = json!({"sub": "DemoUser", "exp": T0 + 60});
        let v = verifier("top-secret");

        let none = raw_token(&json!({"alg": "none", "typ": "JWT"}), &payload, "");
        assert_eq!(v.verify_at(&none, T0), Err(AuthFailure::UnexpectedAlgorithm));

        let rs = raw_token(&json!({"alg": "RS256", "typ": "JWT"}), &payload, "c2ln");
        assert_eq!(v.verify_at(&rs, T0), Err(AuthFailure::UnexpectedAlgorithm));
    }

    #[test]
    fn algorithm_is_checked_before_signature() {
        // Garbage signature, bad algorithm: the algorithm wins.
        let token = raw_token(
            &json!({"alg": "HS384"}),
            &json!({"exp": T0 + 60}),
            "AAAA",
        );
        assert_eq!(
            verifier("top-secret").verify_at(&token, T0),
            Err(AuthFailure::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn missing_exp_fails_closed() {
        let token = sign_with(Algorithm::HS256, "top-secret", &json!({"sub": "DemoUser"}));
        assert_eq!(
            verifier("top-secret").verify_at(&token, T0),
            Err(AuthFailure::Expired)
        );
    }

    #[test]
    fn past_exp_is_expired() {
        let token = sign_with(
            Algorithm::HS256,
            "top-secret",
            &json!({"sub": "DemoUser", "exp": T0 - 1}),
        );
        assert_eq!(
            verifier("top-secret").verify_at(&token, T0),
            Err(AuthFailure::Expired)
        );
    }

    #[test]
    fn structural_garbage_is_malformed() {
        let v = verifier("top-secret");
        for token in ["", "abc", "a.b", "a.b.c.d", "..", "!!.??.sig"] {
            assert_eq!(v.verify_at(token, T0), Err(AuthFailure::Malformed), "{token:?}");
        }

        let no_alg = raw_token(&json!({"typ": "JWT"}), &json!({"exp": T0 + 60}), "sig");
        assert_eq!(v.verify_at(&no_alg, T0), Err(AuthFailure::Malformed));
    }

    #[test]
    fn disabled_secret_never_verifies_or_issues() {
        let disabled = SignedTokenVerifier::new(&Secret::default());

        let token = sign_with(Algorithm::HS256, "whatever", &json!({"exp": T0 + 60}));
        assert_eq!(
            disabled.verify_at(&token, T0),
            Err(AuthFailure::SignatureInvalid)
        );
        assert_eq!(
            disabled.issue_at("DemoUser", HOUR, T0),
            Err(AuthFailure::InternalError)
        );
    }
}
