use crate::api::response::AuthResponse;

/// No credentials required.
pub async fn public() -> AuthResponse {
    AuthResponse::ok("Public endpoint: access granted.")
}
