use axum::extract::State;

use crate::api::response::AuthResponse;
use crate::state::AppState;

/// Issue a demo token for the configured subject.
///
/// Test convenience only: the token comes back in `message`.
pub async fn generate_jwt(State(state): State<AppState>) -> AuthResponse {
    let issuance = &state.issuance;

    match state
        .auth
        .tokens()
        .issue(&issuance.subject, issuance.ttl_seconds)
    {
        Ok(token) => AuthResponse::ok(token),
        Err(err) => {
            tracing::error!(code = err.code(), "failed to issue token");
            AuthResponse::failed(err, "Token generation failed.")
        }
    }
}
