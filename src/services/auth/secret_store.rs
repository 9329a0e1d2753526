//! Trust material for every scheme.
//!
//! Built once from `Config` at start-up and shared read-only (behind `Arc`)
//! for the lifetime of the process. An empty value disables its scheme.

use std::fmt;

use subtle::Choice;

use super::compare;

/// A single secret value. Never printed.
#[derive(Clone, Default)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self(value.into())
    }

    pub fn is_enabled(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Constant-time match. A disabled secret never matches, not even an
    /// empty presented value.
    pub fn matches(&self, presented: &[u8]) -> Choice {
        compare::ct_eq(presented, &self.0) & Choice::from(self.is_enabled() as u8)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_enabled() {
            f.write_str("Secret(***)")
        } else {
            f.write_str("Secret(<disabled>)")
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BasicCredentials {
    pub username: Secret,
    pub password: Secret,
}

impl BasicCredentials {
    /// Both halves must be configured for Basic to be usable.
    pub fn is_enabled(&self) -> bool {
        self.username.is_enabled() && self.password.is_enabled()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SecretStore {
    pub basic: BasicCredentials,
    pub bearer_token: Secret,
    pub api_key: Secret,
    pub signing_secret: Secret,
}

impl SecretStore {
    pub fn new(
        basic_username: impl Into<Vec<u8>>,
        basic_password: impl Into<Vec<u8>>,
        bearer_token: impl Into<Vec<u8>>,
        api_key: impl Into<Vec<u8>>,
        signing_secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            basic: BasicCredentials {
                username: Secret::new(basic_username),
                password: Secret::new(basic_password),
            },
            bearer_token: Secret::new(bearer_token),
            api_key: Secret::new(api_key),
            signing_secret: Secret::new(signing_secret),
        }
    }

    /// Schemes that can never succeed with the current material.
    pub fn disabled_schemes(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.basic.is_enabled() {
            out.push("basic");
        }
        if !self.bearer_token.is_enabled() {
            out.push("token");
        }
        if !self.api_key.is_enabled() {
            out.push("apikey");
        }
        if !self.signing_secret.is_enabled() {
            out.push("jwt");
        }
        out
    }
}
