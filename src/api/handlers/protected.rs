//! One handler per protected endpoint, all funnelled through `authenticate`.
//!
//! The verifier itself never logs; outcomes are recorded here at `debug`
//! with the scheme and reason code only.

use axum::{extract::State, http::HeaderMap};

use crate::api::response::AuthResponse;
use crate::services::auth::Scheme;
use crate::state::AppState;

fn authenticate(state: &AppState, scheme: Scheme, headers: &HeaderMap) -> AuthResponse {
    let verdict = state.auth.verify(scheme, headers);
    let res = AuthResponse::from_verdict(scheme, &verdict);

    tracing::debug!(scheme = %scheme, code = res.code(), "credential verified");
    res
}

pub async fn basic(State(state): State<AppState>, headers: HeaderMap) -> AuthResponse {
    authenticate(&state, Scheme::Basic, &headers)
}

pub async fn token(State(state): State<AppState>, headers: HeaderMap) -> AuthResponse {
    authenticate(&state, Scheme::StaticBearer, &headers)
}

pub async fn api_key(State(state): State<AppState>, headers: HeaderMap) -> AuthResponse {
    authenticate(&state, Scheme::ApiKey, &headers)
}

pub async fn jwt(State(state): State<AppState>, headers: HeaderMap) -> AuthResponse {
    authenticate(&state, Scheme::SignedToken, &headers)
}
