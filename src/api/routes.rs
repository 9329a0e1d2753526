/*
 * Responsibility
 * - URL 構造を定義 (path → scheme)
 * - 認証エンドポイントは method を問わない
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::handlers::{health::health, protected, public::public, token::generate_jwt};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/public", any(public))
        .route("/basic", any(protected::basic))
        .route("/token", any(protected::token))
        .route("/apikey", any(protected::api_key))
        .route("/jwt", any(protected::jwt))
        .route("/generate-jwt", any(generate_jwt))
}
