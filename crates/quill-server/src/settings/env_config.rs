use std::env;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::{Registration, ServerConfig};

pub(super) fn load_config(path: &str) -> ServerConfig {
    if !Path::new(path).exists() {
        return ServerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(event = "config_read_failed", path, error = %err);
            return ServerConfig::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(event = "config_parse_failed", path, error = %err);
            ServerConfig::default()
        }
    }
}

pub(super) fn apply_auth_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("QUILL_REGISTRATION") {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => config.auth.registration = Registration::Open,
            "disabled" => config.auth.registration = Registration::Disabled,
            _ => {
                warn!(event = "config_invalid", field = "QUILL_REGISTRATION", value = %value);
            }
        }
    }
    if let Ok(value) = env::var("QUILL_KDF_ITERATIONS") {
        match value.parse::<u32>() {
            Ok(parsed) if parsed > 0 => config.auth.kdf.iterations = parsed,
            _ => {
                warn!(event = "config_invalid", field = "QUILL_KDF_ITERATIONS", value = %value);
            }
        }
    }
    if let Ok(value) = env::var("QUILL_KDF_MEMORY_KB") {
        match value.parse::<u32>() {
            Ok(parsed) if parsed > 0 => config.auth.kdf.memory_kb = parsed,
            _ => {
                warn!(event = "config_invalid", field = "QUILL_KDF_MEMORY_KB", value = %value);
            }
        }
    }
    if let Ok(value) = env::var("QUILL_KDF_PARALLELISM") {
        match value.parse::<u32>() {
            Ok(parsed) if parsed > 0 => config.auth.kdf.parallelism = parsed,
            _ => {
                warn!(event = "config_invalid", field = "QUILL_KDF_PARALLELISM", value = %value);
            }
        }
    }
}

pub(super) fn load_secret_env_or_file(
    env_key: &str,
    file_key: &str,
) -> Result<Option<String>, String> {
    if let Ok(value) = env::var(env_key) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
    if let Ok(path) = env::var(file_key) {
        let contents = fs::read_to_string(&path)
            .map_err(|err| format!("secret file not readable ({path}): {err}"))?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Err(format!("secret file is empty ({path})"));
        }
        return Ok(Some(trimmed.to_string()));
    }
    Ok(None)
}
