use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::config::ServerConfig;

mod env_config;
#[cfg(test)]
mod tests;

#[derive(Debug)]
pub struct Settings {
    pub addr: SocketAddr,
    pub db_url: String,
    pub db_pool_max: u32,
    pub token_secret: String,
    pub require_token_secret: bool,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub config: ServerConfig,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_options(true)
    }

    #[must_use]
    pub fn from_env_with_options(require_token_secret: bool) -> Self {
        let addr = match env::var("QUILL_ADDR") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!(event = "config_invalid", field = "QUILL_ADDR", value = %value);
                "127.0.0.1:8080".parse().expect("default addr valid")
            }),
            Err(_) => "127.0.0.1:8080".parse().expect("default addr valid"),
        };
        let db_url = env::var("QUILL_DB_URL").unwrap_or_else(|_| "sqlite://quill.db".to_string());
        let db_pool_max = env::var("QUILL_DB_POOL_MAX")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(10);
        let access_token_ttl_seconds = env::var("QUILL_ACCESS_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(3600);
        let refresh_token_ttl_seconds = env::var("QUILL_REFRESH_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(60 * 60 * 24 * 30);
        let config_path =
            env::var("QUILL_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = env_config::load_config(&config_path);
        env_config::apply_auth_env_overrides(&mut config);
        let token_secret = if require_token_secret {
            match env_config::load_secret_env_or_file("QUILL_TOKEN_SECRET", "QUILL_TOKEN_SECRET_FILE")
            {
                Ok(Some(value)) => value,
                Ok(None) => String::new(),
                Err(err) => {
                    warn!(event = "config_invalid", field = "QUILL_TOKEN_SECRET", error = %err);
                    String::new()
                }
            }
        } else {
            String::new()
        };
        let max_body_bytes = env::var("QUILL_MAX_BODY_BYTES")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(config.server.max_body_bytes);
        config.server.max_body_bytes = max_body_bytes;

        Self {
            addr,
            db_url,
            db_pool_max,
            token_secret,
            require_token_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            config,
        }
    }
}

pub fn preflight(settings: &Settings) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();
    if settings.require_token_secret && settings.token_secret.is_empty() {
        missing.push(
            "QUILL_TOKEN_SECRET or QUILL_TOKEN_SECRET_FILE is required for token signing"
                .to_string(),
        );
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
