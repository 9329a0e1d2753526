/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → SecretStore / Authenticator 生成 → Router 組み立て
 * - Middleware の適用 (request id / trace / timeout / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::auth::Authenticator;
use crate::state::{AppState, IssuancePolicy};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,multi_auth_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash so it gets noticed; production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config);
    let app = build_router(state, Duration::from_secs(config.request_timeout_seconds));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: config.addr,
            source,
        })?;
    axum::serve(listener, app).await.map_err(AppError::Serve)?;

    Ok(())
}

fn build_state(config: &Config) -> AppState {
    let store = config.secret_store();

    for scheme in store.disabled_schemes() {
        tracing::warn!(scheme, "no trust material configured; scheme disabled");
    }

    let auth = Arc::new(Authenticator::new(store));
    let issuance = IssuancePolicy {
        subject: config.jwt_subject.clone(),
        ttl_seconds: config.jwt_ttl_seconds,
    };

    AppState::new(auth, issuance)
}

fn build_router(state: AppState, timeout: Duration) -> Router {
    let router = api::routes().with_state(state);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, timeout)
}
