//! Collector kinds and config-change operations.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// CollectorKind
// ---------------------------------------------------------------------------

/// The metric kind a collector gathers. Each kind has its own schedule,
/// its own collector record, and its own reference slot on dashboard components.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CollectorKind {
    /// Static code quality (coverage, violations, debt).
    Quality,
    /// Static security scan results.
    Security,
}

impl CollectorKind {
    pub const ALL: [Self; 2] = [Self::Quality, Self::Security];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Security => "security",
        }
    }

    /// Name under which the collector is registered.
    #[must_use]
    pub const fn collector_name(self) -> &'static str {
        match self {
            Self::Quality => "Sonar",
            Self::Security => "SonarSecurity",
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quality" | "static" | "code_quality" => Ok(Self::Quality),
            "security" | "static_security_scan" => Ok(Self::Security),
            _ => Err(CoreError::UnknownVariant {
                kind: "collector kind",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigOperation
// ---------------------------------------------------------------------------

/// Kind of quality-profile configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfigOperation {
    Created,
    Deleted,
    Changed,
}

impl ConfigOperation {
    /// Classify a remote changelog action.
    ///
    /// `DEACTIVATED` and `ACTIVATED` map to deletions and creations of a rule;
    /// every other action (`UPDATED`, unknown future actions) is a change.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        match action {
            "DEACTIVATED" => Self::Deleted,
            "ACTIVATED" => Self::Created,
            _ => Self::Changed,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for ConfigOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
