/*
 * Responsibility
 * - 環境変数の読み込み (PORT, 各 scheme の secret, token 発行設定)
 * - 数値のバリデーション (不正なら起動失敗)
 * - secret が空の scheme は無効扱い (起動は止めない)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::SecretStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub basic_auth_username: String,
    pub basic_auth_password: String,
    pub static_token: String,
    pub api_key: String,
    pub jwt_secret: String,

    // Issued by /generate-jwt
    pub jwt_subject: String,
    pub jwt_ttl_seconds: u64,

    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_subject", &self.jwt_subject)
            .field("jwt_ttl_seconds", &self.jwt_ttl_seconds)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(lookup("PORT"), "PORT", 8080)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        // Secrets are taken verbatim. Missing means "scheme disabled".
        let secret = |key: &str| lookup(key).unwrap_or_default();

        let jwt_subject = lookup("JWT_SUBJECT")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "DemoUser".to_string());

        let jwt_ttl_seconds = parse_or(lookup("JWT_TTL_SECONDS"), "JWT_TTL_SECONDS", 3600)?;
        if jwt_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("JWT_TTL_SECONDS"));
        }

        let request_timeout_seconds = parse_or(
            lookup("REQUEST_TIMEOUT_SECONDS"),
            "REQUEST_TIMEOUT_SECONDS",
            30,
        )?;

        Ok(Self {
            addr,
            app_env,
            basic_auth_username: secret("BASIC_AUTH_USERNAME"),
            basic_auth_password: secret("BASIC_AUTH_PASSWORD"),
            static_token: secret("MY_TOKEN"),
            api_key: secret("MY_API_KEY"),
            jwt_secret: secret("MY_JWT_SECRET"),
            jwt_subject,
            jwt_ttl_seconds,
            request_timeout_seconds,
        })
    }

    pub fn secret_store(&self) -> SecretStore {
        SecretStore::new(
            self.basic_auth_username.as_str(),
            self.basic_auth_password.as_str(),
            self.static_token.as_str(),
            self.api_key.as_str(),
            self.jwt_secret.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_empty_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.jwt_subject, "DemoUser");
        assert_eq!(config.jwt_ttl_seconds, 3600);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(
            config.secret_store().disabled_schemes(),
            vec!["basic", "token", "apikey", "jwt"]
        );
    }

    #[test]
    fn reads_secrets_verbatim() {
        let config = Config::from_lookup(lookup(&[
            ("BASIC_AUTH_USERNAME", "alice"),
            ("BASIC_AUTH_PASSWORD", " padded "),
            ("MY_TOKEN", "tok"),
            ("MY_API_KEY", "k-123"),
            ("MY_JWT_SECRET", "s"),
            ("APP_ENV", "PROD"),
            ("PORT", "9090"),
        ]))
        .unwrap();

        assert_eq!(config.basic_auth_password, " padded ");
        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 9090);
        assert!(config.secret_store().disabled_schemes().is_empty());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PORT", "http")])).err(),
            Some(ConfigError::Invalid("PORT"))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_TTL_SECONDS", "0")])).err(),
            Some(ConfigError::Invalid("JWT_TTL_SECONDS"))
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let config = Config::from_lookup(lookup(&[("MY_API_KEY", "k-123")])).unwrap();
        assert!(!format!("{config:?}").contains("k-123"));
    }
}
