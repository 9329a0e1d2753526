/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc で cheap)
 * - 起動後は read-only (lock 不要)
 */
use std::sync::Arc;

use crate::services::auth::Authenticator;

/// Parameters for tokens handed out by `/generate-jwt`.
#[derive(Clone, Debug)]
pub struct IssuancePolicy {
    pub subject: String,
    pub ttl_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub issuance: Arc<IssuancePolicy>,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>, issuance: IssuancePolicy) -> Self {
        Self {
            auth,
            issuance: Arc::new(issuance),
        }
    }
}
