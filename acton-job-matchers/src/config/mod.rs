//! Configuration management for acton-job-matchers
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_JOBS_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-jobs/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-jobs/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [queues]
//! default_queue = "default"
//! mailer_queue = "mailers"
//!
//! [global_id]
//! app = "my-app"
//!
//! [matching]
//! schedule_tolerance_ms = 1000
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_job_matchers::config::JobMatchersConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = JobMatchersConfig::load_for_service("my-app")?;
//! let queue = &config.queues.default_queue;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Queue naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Queue used when a worker or application job does not name one
    pub default_queue: String,

    /// Queue mail deliveries are pushed to
    pub mailer_queue: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            default_queue: "default".to_string(),
            mailer_queue: "mailers".to_string(),
        }
    }
}

/// Global id encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalIdSettings {
    /// Application segment of `gid://<app>/<model>/<id>` URIs
    pub app: String,
}

impl Default for GlobalIdSettings {
    fn default() -> Self {
        Self {
            app: "acton".to_string(),
        }
    }
}

/// Matcher behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// How far a job scheduled with `perform_in` may drift from
    /// `now + interval` and still satisfy `in_interval`, in milliseconds
    pub schedule_tolerance_ms: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            schedule_tolerance_ms: 1000,
        }
    }
}

impl MatchSettings {
    /// Tolerance as a chrono duration
    #[must_use]
    pub fn schedule_tolerance(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.schedule_tolerance_ms).unwrap_or(i64::MAX))
    }
}

/// Complete acton-job-matchers configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobMatchersConfig {
    /// Queue naming
    #[serde(default)]
    pub queues: QueueSettings,

    /// Global id encoding
    #[serde(default)]
    pub global_id: GlobalIdSettings,

    /// Matcher behavior
    #[serde(default)]
    pub matching: MatchSettings,
}

impl JobMatchersConfig {
    /// Load configuration for a specific service
    ///
    /// Searches for configuration with precedence:
    /// 1. Environment variables (`ACTON_JOBS_*`)
    /// 2. `./config.toml`
    /// 3. `~/.config/acton-jobs/{service_name}/config.toml`
    /// 4. `/etc/acton-jobs/{service_name}/config.toml`
    /// 5. Defaults
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be parsed
    /// - Configuration values fail type conversion
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        let system_config = PathBuf::from("/etc/acton-jobs")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("ACTON_JOBS_").split("__").lowercase(true));

        let config = figment.extract()?;
        tracing::debug!(service = service_name, ?config, "Loaded job matcher configuration");
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file leaves the defaults in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The file contains invalid TOML
    /// - Configuration values fail type conversion
    pub fn load_from(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ACTON_JOBS_").split("__").lowercase(true))
            .extract()?;

        tracing::debug!(path = %path.display(), "Loaded job matcher configuration from file");
        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// # Example
    ///
    /// ```rust
    /// use acton_job_matchers::config::JobMatchersConfig;
    ///
    /// let path = JobMatchersConfig::recommended_path("my-app");
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-jobs")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }
}
