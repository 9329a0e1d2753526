use axum::http::HeaderMap;

use super::credential::Credential;
use super::secret_store::SecretStore;
use super::signed_token::SignedTokenVerifier;
use super::verdict::{AuthFailure, Authenticated, Scheme, Verdict};

/// Single entry point for every scheme.
///
/// Holds the immutable `SecretStore` plus the signing keys derived from it.
/// Verification is synchronous and touches no shared mutable state, so one
/// instance is shared by all in-flight requests.
#[derive(Clone, Debug)]
pub struct Authenticator {
    store: SecretStore,
    tokens: SignedTokenVerifier,
}

impl Authenticator {
    pub fn new(store: SecretStore) -> Self {
        let tokens = SignedTokenVerifier::new(&store.signing_secret);
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &SignedTokenVerifier {
        &self.tokens
    }

    pub fn verify(&self, scheme: Scheme, headers: &HeaderMap) -> Verdict {
        self.verify_at(scheme, headers, chrono::Utc::now().timestamp())
    }

    /// Extract the credential for `scheme` and check it against the store.
    /// `now` only matters for signed tokens.
    pub fn verify_at(&self, scheme: Scheme, headers: &HeaderMap, now: i64) -> Verdict {
        let credential = Credential::extract(scheme, headers)?;
        self.verify_credential(credential, now)
    }

    pub fn verify_credential(&self, credential: Credential, now: i64) -> Verdict {
        match credential {
            Credential::UsernamePassword { username, password } => {
                let basic = &self.store.basic;
                // evaluate both halves, then combine
                let user_ok = basic.username.matches(&username);
                let pass_ok = basic.password.matches(&password);
                accept_if((user_ok & pass_ok).into(), Scheme::Basic)
            }
            Credential::OpaqueToken(token) => accept_if(
                self.store.bearer_token.matches(&token).into(),
                Scheme::StaticBearer,
            ),
            Credential::OpaqueKey(key) => {
                accept_if(self.store.api_key.matches(&key).into(), Scheme::ApiKey)
            }
            Credential::SignedTokenString(token) => self
                .tokens
                .verify_at(&token, now)
                .map(Authenticated::with_claims),
        }
    }
}

fn accept_if(matched: bool, scheme: Scheme) -> Verdict {
    if matched {
        Ok(Authenticated::new(scheme))
    } else {
        Err(AuthFailure::Mismatch)
    }
}
