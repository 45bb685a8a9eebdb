use std::time::Duration;

use crate::sources::SourcesConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Per-adapter request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTimeouts {
    pub storage_card: Duration,
    pub catalog_api: Duration,
    pub rendered_page: Duration,
}

impl Default for SourceTimeouts {
    fn default() -> Self {
        Self {
            storage_card: Duration::from_secs(10),
            catalog_api: Duration::from_secs(15),
            rendered_page: Duration::from_secs(20),
        }
    }
}

/// Size and pacing limits applied by the batch orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Largest accepted batch; larger inputs are rejected before any request.
    pub max_batch: usize,
    /// Fixed delay inserted between consecutive identifiers.
    pub pacing_delay: Duration,
    /// Upper bound of the random extra delay added on top of `pacing_delay`.
    pub pacing_jitter: Duration,
    /// Optional wall-clock budget for a whole batch, checked between items.
    pub deadline: Option<Duration>,
}

impl BatchPolicy {
    /// A policy with no pacing and no deadline, for tests and interactive runs.
    #[must_use]
    pub fn unpaced(max_batch: usize) -> Self {
        Self {
            max_batch,
            pacing_delay: Duration::ZERO,
            pacing_jitter: Duration::ZERO,
            deadline: None,
        }
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_batch: 10,
            pacing_delay: Duration::from_millis(2_000),
            pacing_jitter: Duration::from_millis(1_000),
            deadline: None,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub user_agent: String,
    pub timeouts: SourceTimeouts,
    pub batch: BatchPolicy,
    pub sources: SourcesConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("timeouts", &self.timeouts)
            .field("batch", &self.batch)
            .field("mirror_hosts", &self.sources.mirror_hosts.len())
            .field("shard_rules", &self.sources.shard_rules.len())
            .field("aggregator_url", &self.sources.aggregator_url)
            .field("search_url", &self.sources.search_url)
            .field("page_url_template", &self.sources.page_url_template)
            .finish()
    }
}
