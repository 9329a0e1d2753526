/*
 * Responsibility
 * - 起動時 (config / bind / serve) のエラー定義
 * - リクエスト単位の認証失敗は services::auth::AuthFailure 側で扱う
 */
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
