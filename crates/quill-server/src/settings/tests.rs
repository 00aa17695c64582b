use super::*;
use crate::config::Registration;
use std::sync::Mutex;
use uuid::Uuid;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    env::remove_var("QUILL_ADDR");
    env::remove_var("QUILL_DB_URL");
    env::remove_var("QUILL_DB_POOL_MAX");
    env::remove_var("QUILL_TOKEN_SECRET");
    env::remove_var("QUILL_TOKEN_SECRET_FILE");
    env::remove_var("QUILL_ACCESS_TOKEN_TTL_SECONDS");
    env::remove_var("QUILL_REFRESH_TOKEN_TTL_SECONDS");
    env::remove_var("QUILL_REGISTRATION");
    env::remove_var("QUILL_KDF_ITERATIONS");
    env::remove_var("QUILL_KDF_MEMORY_KB");
    env::remove_var("QUILL_KDF_PARALLELISM");
    env::remove_var("QUILL_MAX_BODY_BYTES");
    env::remove_var("QUILL_CONFIG_PATH");
}

#[test]
fn defaults_without_env() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("QUILL_CONFIG_PATH", "/nonexistent/quill-config.yaml");

    let settings = Settings::from_env_with_options(false);
    assert_eq!(settings.addr.port(), 8080);
    assert_eq!(settings.db_url, "sqlite://quill.db");
    assert_eq!(settings.db_pool_max, 10);
    assert_eq!(settings.access_token_ttl_seconds, 3600);
    assert_eq!(settings.refresh_token_ttl_seconds, 60 * 60 * 24 * 30);
    assert_eq!(settings.config.auth.registration, Registration::Open);
    assert_eq!(settings.config.auth.kdf.iterations, 3);
    clear_env();
}

#[test]
fn env_overrides_apply() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("QUILL_CONFIG_PATH", "/nonexistent/quill-config.yaml");
    env::set_var("QUILL_ADDR", "0.0.0.0:9100");
    env::set_var("QUILL_DB_URL", "sqlite::memory:");
    env::set_var("QUILL_ACCESS_TOKEN_TTL_SECONDS", "60");
    env::set_var("QUILL_REGISTRATION", "disabled");
    env::set_var("QUILL_KDF_ITERATIONS", "1");

    let settings = Settings::from_env_with_options(false);
    assert_eq!(settings.addr.port(), 9100);
    assert_eq!(settings.db_url, "sqlite::memory:");
    assert_eq!(settings.access_token_ttl_seconds, 60);
    assert_eq!(settings.config.auth.registration, Registration::Disabled);
    assert_eq!(settings.config.auth.kdf.iterations, 1);
    clear_env();
}

#[test]
fn config_file_is_loaded() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let config_path =
        std::env::temp_dir().join(format!("quill-test-config-{}.yaml", Uuid::now_v7()));
    std::fs::write(
        &config_path,
        "auth:\n  registration: disabled\n  kdf:\n    iterations: 2\n",
    )
    .expect("write config");
    env::set_var("QUILL_CONFIG_PATH", &config_path);

    let settings = Settings::from_env_with_options(false);
    assert_eq!(settings.config.auth.registration, Registration::Disabled);
    assert_eq!(settings.config.auth.kdf.iterations, 2);
    clear_env();
    let _ = std::fs::remove_file(config_path);
}

#[test]
fn preflight_requires_token_secret() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("QUILL_CONFIG_PATH", "/nonexistent/quill-config.yaml");

    let settings = Settings::from_env_with_options(true);
    assert!(preflight(&settings).is_err());

    env::set_var("QUILL_TOKEN_SECRET", "secret");
    let settings = Settings::from_env_with_options(true);
    assert!(preflight(&settings).is_ok());
    clear_env();
}

#[test]
fn token_secret_from_file() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("QUILL_CONFIG_PATH", "/nonexistent/quill-config.yaml");
    let secret_path =
        std::env::temp_dir().join(format!("quill-test-secret-{}", Uuid::now_v7()));
    std::fs::write(&secret_path, "file-secret\n").expect("write secret");
    env::set_var("QUILL_TOKEN_SECRET_FILE", &secret_path);

    let settings = Settings::from_env_with_options(true);
    assert_eq!(settings.token_secret, "file-secret");
    clear_env();
    let _ = std::fs::remove_file(secret_path);
}
