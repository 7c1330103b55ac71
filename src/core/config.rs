//! Configuration for the relay.
//!
//! Settings are loaded once at startup, validated, and owned immutably by
//! the writer constructed with them. File discovery and the host's
//! configuration-file schema are the host's concern; this module handles
//! YAML parsing, defaults, and validation only.

use crate::core::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Validated configuration for a writer instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Access key for the remote metrics API
    pub access_key: String,
    /// Secret key for the remote metrics API
    pub secret_key: String,
    /// Service endpoint URL
    pub endpoint: String,
    /// Namespace under which metrics are organized remotely
    pub namespace: String,
    /// Derive sub-namespaces from dot-delimited counter name prefixes
    pub auto_namespace: bool,
    /// Optional URL returning this machine's instance identity as plain text
    pub instance_lookup_url: Option<String>,
    /// Optional local file holding the auto-scaling group name
    pub group_file: Option<PathBuf>,
    /// Interval between publish cycles
    #[serde(with = "humantime_serde")]
    pub send_interval: Duration,
    /// Retry budget exposed to the host scheduler; the writer itself never retries
    pub max_retries: u32,
    /// Queue bound exposed to the host scheduler
    pub max_queue_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            access_key: String::new(),
            secret_key: String::new(),
            endpoint: String::new(),
            namespace: String::new(),
            auto_namespace: false,
            instance_lookup_url: None,
            group_file: None,
            send_interval: Duration::from_secs(60),
            max_retries: 3,
            max_queue_len: 2048,
        }
    }
}

impl Settings {
    /// Validate the configuration.
    ///
    /// Required fields must be present and the endpoint must parse as a
    /// URL. Everything else is optional.
    pub fn validate(&self) -> Result<()> {
        if self.access_key.is_empty() {
            return Err(RelayError::config("access_key must be set"));
        }
        if self.secret_key.is_empty() {
            return Err(RelayError::config("secret_key must be set"));
        }
        if self.namespace.is_empty() {
            return Err(RelayError::config("namespace must be set"));
        }
        if self.endpoint.is_empty() {
            return Err(RelayError::config("endpoint must be set"));
        }
        reqwest::Url::parse(&self.endpoint)
            .map_err(|e| RelayError::config(format!("endpoint is not a valid URL: {}", e)))?;

        if self.max_queue_len == 0 {
            return Err(RelayError::config("max_queue_len must be greater than 0"));
        }

        Ok(())
    }
}

/// Builder for programmatic construction of [`Settings`].
pub struct SettingsBuilder {
    settings: Settings,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        SettingsBuilder {
            settings: Settings::default(),
        }
    }

    /// Load settings from a YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.settings = serde_yaml::from_str(yaml)
            .map_err(|e| RelayError::config(format!("failed to parse YAML settings: {}", e)))?;
        Ok(self)
    }

    /// Set the access key
    pub fn access_key<S: Into<String>>(mut self, key: S) -> Self {
        self.settings.access_key = key.into();
        self
    }

    /// Set the secret key
    pub fn secret_key<S: Into<String>>(mut self, key: S) -> Self {
        self.settings.secret_key = key.into();
        self
    }

    /// Set the service endpoint URL
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.settings.endpoint = endpoint.into();
        self
    }

    /// Set the metric namespace
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.settings.namespace = namespace.into();
        self
    }

    /// Enable or disable auto-namespace routing
    pub fn auto_namespace(mut self, enable: bool) -> Self {
        self.settings.auto_namespace = enable;
        self
    }

    /// Set the instance identity lookup URL
    pub fn instance_lookup_url<S: Into<String>>(mut self, url: S) -> Self {
        self.settings.instance_lookup_url = Some(url.into());
        self
    }

    /// Set the auto-scaling group file path
    pub fn group_file(mut self, path: PathBuf) -> Self {
        self.settings.group_file = Some(path);
        self
    }

    /// Set the publish interval
    pub fn send_interval(mut self, interval: Duration) -> Self {
        self.settings.send_interval = interval;
        self
    }

    /// Set the host-facing retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.settings.max_retries = retries;
        self
    }

    /// Set the host-facing queue bound
    pub fn max_queue_len(mut self, len: usize) -> Self {
        self.settings.max_queue_len = len;
        self
    }

    /// Build and validate the settings
    pub fn build(self) -> Result<Settings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
