use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("unknown"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.timeouts, SourceTimeouts::default());
    assert_eq!(cfg.batch, BatchPolicy::default());
    assert_eq!(cfg.sources, SourcesConfig::default());
}

#[test]
fn timeouts_default_to_adapter_specific_values() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.timeouts.storage_card, Duration::from_secs(10));
    assert_eq!(cfg.timeouts.catalog_api, Duration::from_secs(15));
    assert_eq!(cfg.timeouts.rendered_page, Duration::from_secs(20));
}

#[test]
fn storage_timeout_override() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_STORAGE_TIMEOUT_SECS", "12");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.timeouts.storage_card, Duration::from_secs(12));
}

#[test]
fn page_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_PAGE_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARDPROBE_PAGE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARDPROBE_PAGE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn api_timeout_out_of_range_rejected() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_API_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "CARDPROBE_API_TIMEOUT_SECS" && reason.contains("between")),
        "expected InvalidEnvVar(CARDPROBE_API_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_batch_override() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_MAX_BATCH", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.batch.max_batch, 25);
}

#[test]
fn max_batch_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_MAX_BATCH", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARDPROBE_MAX_BATCH"),
        "expected InvalidEnvVar(CARDPROBE_MAX_BATCH), got: {result:?}"
    );
}

#[test]
fn pacing_override() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_PACING_DELAY_MS", "0");
    map.insert("CARDPROBE_PACING_JITTER_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.batch.pacing_delay, Duration::ZERO);
    assert_eq!(cfg.batch.pacing_jitter, Duration::from_millis(250));
}

#[test]
fn pacing_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_PACING_DELAY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARDPROBE_PACING_DELAY_MS"),
        "expected InvalidEnvVar(CARDPROBE_PACING_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn deadline_absent_by_default() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.batch.deadline.is_none());
}

#[test]
fn deadline_set_when_present() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_BATCH_DEADLINE_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.batch.deadline, Some(Duration::from_secs(90)));
}

#[test]
fn deadline_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_BATCH_DEADLINE_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARDPROBE_BATCH_DEADLINE_SECS"),
        "expected InvalidEnvVar(CARDPROBE_BATCH_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_USER_AGENT", "cardprobe-test/0.1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "cardprobe-test/0.1");
}

#[test]
fn missing_sources_file_is_io_error() {
    let mut map = HashMap::new();
    map.insert("CARDPROBE_SOURCES_PATH", "/nonexistent/cardprobe/sources.yaml");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::SourcesFileIo { .. })),
        "expected SourcesFileIo, got: {result:?}"
    );
}
