use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // The Kakao key historically lived under two names; accept either.
    let kakao_rest_api_key = lookup("KAKAO_REST_API_KEY")
        .or_else(|_| lookup("KAKAO_API_KEY"))
        .map(|k| k.trim().to_string())
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar("KAKAO_REST_API_KEY".to_string()))?;

    // The expressway open-data service honors "test" as a low-quota demo key.
    let expressway_api_key = lookup("EXPRESSWAY_API_KEY")
        .or_else(|_| lookup("KOREA_EXPRESSWAY_API_KEY"))
        .map(|k| k.trim().to_string())
        .ok()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| "test".to_string());

    let env = parse_environment(&or_default("MUKKA_ENV", "development"));
    let bind_addr = parse_addr("MUKKA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MUKKA_LOG_LEVEL", "info");
    let snapshot_path = PathBuf::from(or_default("MUKKA_SNAPSHOT_PATH", "./data/rest-index.json"));
    let snapshot_ttl_secs = parse_u64("MUKKA_SNAPSHOT_TTL_SECS", "300")?;
    let http_timeout_secs = parse_u64("MUKKA_HTTP_TIMEOUT_SECS", "12")?;
    let http_max_retries = parse_u32("MUKKA_HTTP_MAX_RETRIES", "1")?;
    let http_retry_backoff_base_ms = parse_u64("MUKKA_HTTP_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        kakao_rest_api_key,
        expressway_api_key,
        snapshot_path,
        snapshot_ttl_secs,
        http_timeout_secs,
        http_max_retries,
        http_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
