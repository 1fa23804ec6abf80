use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT: &str = "convergence";
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:3030";
pub const DEFAULT_AUTH_TOKEN: &str = "YOUR_AUTH_TOKEN";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// Top-level config (convergence.toml + CONVERGENCE_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Dashboard event (widget id) the window is published under.
    #[serde(default = "default_event")]
    pub event: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Number of points kept in the sliding window.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Seed the window from recent history instead of zeros.
    /// Override with env var: CONVERGENCE_JOB__BACKFILL=false
    #[serde(default = "bool_true")]
    pub backfill: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            event: default_event(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            window: DEFAULT_WINDOW,
            backfill: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Replacement for the built-in latest-percentage query.
    /// Must return a single numeric column.
    pub query: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            query: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_url")]
    pub url: String,
    #[serde(default = "default_auth_token")]
    pub auth_token: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: default_dashboard_url(),
            auth_token: default_auth_token(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_event() -> String {
    DEFAULT_EVENT.to_string()
}
fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}
fn default_window() -> usize {
    DEFAULT_WINDOW
}
fn default_dashboard_url() -> String {
    DEFAULT_DASHBOARD_URL.to_string()
}
fn default_auth_token() -> String {
    DEFAULT_AUTH_TOKEN.to_string()
}
fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.convergence/greencandle.db", home)
}

impl ConvergenceConfig {
    /// Load config from a TOML file with CONVERGENCE_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g. `CONVERGENCE_JOB__INTERVAL_SECS=30`.
    /// A missing file is not an error: every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ConvergenceConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CONVERGENCE_").split("__"))
            .extract()
            .map_err(|e| crate::error::ConvergenceError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the job cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.job.interval_secs == 0 {
            return Err(crate::error::ConvergenceError::Config(
                "job.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.job.window == 0 {
            return Err(crate::error::ConvergenceError::Config(
                "job.window must be greater than zero".to_string(),
            ));
        }
        if self.job.event.trim().is_empty() {
            return Err(crate::error::ConvergenceError::Config(
                "job.event must not be empty".to_string(),
            ));
        }
        // The event id becomes a URL path segment: /widgets/{event}
        if !self
            .job
            .event
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(crate::error::ConvergenceError::Config(format!(
                "job.event must only contain ASCII letters, digits, '_' or '-': {:?}",
                self.job.event
            )));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.convergence/convergence.toml", home)
}
