use std::path::Path;
use std::time::Duration;

use crate::app_config::{AppConfig, BatchPolicy, Environment, SourceTimeouts};
use crate::sources::{load_sources, SourcesConfig};
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accepted range for every per-adapter timeout, in seconds.
const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=120;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the sources file cannot be loaded.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the sources file cannot be loaded.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_timeout = |var: &str, default: &str| -> Result<Duration, ConfigError> {
        let secs = parse_u64(var, default)?;
        if !TIMEOUT_RANGE_SECS.contains(&secs) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!(
                    "timeout must be between {} and {} seconds, got {secs}",
                    TIMEOUT_RANGE_SECS.start(),
                    TIMEOUT_RANGE_SECS.end()
                ),
            });
        }
        Ok(Duration::from_secs(secs))
    };

    let env = parse_environment(&or_default("CARDPROBE_ENV", "development"));
    let log_level = or_default("CARDPROBE_LOG_LEVEL", "info");
    let user_agent = or_default("CARDPROBE_USER_AGENT", DEFAULT_USER_AGENT);

    let timeouts = SourceTimeouts {
        storage_card: parse_timeout("CARDPROBE_STORAGE_TIMEOUT_SECS", "10")?,
        catalog_api: parse_timeout("CARDPROBE_API_TIMEOUT_SECS", "15")?,
        rendered_page: parse_timeout("CARDPROBE_PAGE_TIMEOUT_SECS", "20")?,
    };

    let max_batch = parse_usize("CARDPROBE_MAX_BATCH", "10")?;
    if max_batch == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CARDPROBE_MAX_BATCH".to_string(),
            reason: "batch size limit must be at least 1".to_string(),
        });
    }
    let pacing_delay_ms = parse_u64("CARDPROBE_PACING_DELAY_MS", "2000")?;
    let pacing_jitter_ms = parse_u64("CARDPROBE_PACING_JITTER_MS", "1000")?;
    let deadline = match lookup("CARDPROBE_BATCH_DEADLINE_SECS") {
        Ok(_) => {
            let secs = parse_u64("CARDPROBE_BATCH_DEADLINE_SECS", "0")?;
            if secs == 0 {
                return Err(ConfigError::InvalidEnvVar {
                    var: "CARDPROBE_BATCH_DEADLINE_SECS".to_string(),
                    reason: "batch deadline must be at least 1 second".to_string(),
                });
            }
            Some(Duration::from_secs(secs))
        }
        Err(_) => None,
    };

    let batch = BatchPolicy {
        max_batch,
        pacing_delay: Duration::from_millis(pacing_delay_ms),
        pacing_jitter: Duration::from_millis(pacing_jitter_ms),
        deadline,
    };

    let sources = match lookup("CARDPROBE_SOURCES_PATH") {
        Ok(path) => load_sources(Path::new(&path))?,
        Err(_) => SourcesConfig::default(),
    };

    Ok(AppConfig {
        env,
        log_level,
        user_agent,
        timeouts,
        batch,
        sources,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
