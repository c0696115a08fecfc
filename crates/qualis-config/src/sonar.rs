//! Analysis-server configuration shared by the quality and security collectors.

use qualis_core::servers::ServerEntry;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Every five minutes, Spring-style six-field cron.
fn default_cron() -> String {
    "0 0/5 * * * *".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_static_metrics() -> String {
    "ncloc,violations,new_vulnerabilities,critical_violations,major_violations,\
     blocker_violations,tests,test_success_density,test_errors,test_failures,\
     coverage,line_coverage,sqale_index,alert_status,quality_gate_details"
        .to_string()
}

fn default_security_metrics() -> String {
    "vulnerabilities,new_vulnerabilities,security_rating,new_security_rating,\
     security_remediation_effort,security_hotspots,alert_status,quality_gate_details"
        .to_string()
}

fn default_legacy_metrics() -> String {
    "ncloc,line_coverage,violations,critical_violations,major_violations,\
     blocker_violations,violations_density,sqale_index,test_success_density,\
     test_failures,test_errors,tests"
        .to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SonarConfig {
    /// Cron expression handed to the scheduling harness.
    #[serde(default = "default_cron")]
    pub cron: String,

    /// Ordered server records. Takes precedence over the positional lists.
    #[serde(default)]
    pub servers: Vec<ServerEntry>,

    /// Positional server URLs (legacy layout).
    #[serde(default)]
    pub urls: Vec<String>,

    /// Positional display names, paired with `urls` by index.
    #[serde(default)]
    pub nice_names: Vec<String>,

    #[serde(default)]
    pub usernames: Vec<String>,

    #[serde(default)]
    pub passwords: Vec<String>,

    #[serde(default)]
    pub tokens: Vec<String>,

    /// Metric keys requested from servers >= 6.3 by the quality collector.
    #[serde(default = "default_static_metrics")]
    pub static_metrics_63_and_above: String,

    /// Metric keys requested from servers >= 6.3 by the security collector.
    #[serde(default = "default_security_metrics")]
    pub security_metrics_63_and_above: String,

    /// Metric keys requested from servers older than 6.3.
    #[serde(default = "default_legacy_metrics")]
    pub metrics_before_63: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            servers: Vec::new(),
            urls: Vec::new(),
            nice_names: Vec::new(),
            usernames: Vec::new(),
            passwords: Vec::new(),
            tokens: Vec::new(),
            static_metrics_63_and_above: default_static_metrics(),
            security_metrics_63_and_above: default_security_metrics(),
            metrics_before_63: default_legacy_metrics(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SonarConfig {
    /// At least one server is configured in either layout.
    pub fn is_configured(&self) -> bool {
        !self.servers.is_empty() || !self.urls.is_empty()
    }

    /// The configured servers as one ordered list of records.
    ///
    /// When `servers` is empty the positional lists are zipped by index;
    /// short lists leave the missing fields absent.
    pub fn server_entries(&self) -> Vec<ServerEntry> {
        if self.servers.is_empty() {
            ServerEntry::zip_positional(
                &self.urls,
                &self.nice_names,
                &self.usernames,
                &self.passwords,
                &self.tokens,
            )
        } else {
            self.servers.clone()
        }
    }

    /// Reject server records without a usable URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty or non-HTTP URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, server) in self.server_entries().iter().enumerate() {
            let url = server.url.trim();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("sonar.servers[{i}].url"),
                    reason: "must not be empty".into(),
                });
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: format!("sonar.servers[{i}].url"),
                    reason: format!("'{url}' is not an http(s) URL"),
                });
            }
        }
        Ok(())
    }

    /// Copy with passwords and tokens masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "***".to_string());
        Self {
            servers: self
                .servers
                .iter()
                .map(|s| ServerEntry {
                    password: mask(&s.password),
                    token: mask(&s.token),
                    ..s.clone()
                })
                .collect(),
            passwords: self.passwords.iter().map(|_| "***".to_string()).collect(),
            tokens: self.tokens.iter().map(|_| "***".to_string()).collect(),
            ..self.clone()
        }
    }
}
