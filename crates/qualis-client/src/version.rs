//! Server API version parsing and feature gates.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// `major.minor` of a quality server, as reported by `/api/server/version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
}

impl ServerVersion {
    /// First version exposing quality-profile changelogs.
    pub const CHANGELOG: Self = Self::new(5, 0);
    /// First version with the measures and project-analyses APIs.
    pub const MODERN_API: Self = Self::new(6, 3);

    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether quality-profile change events can be fetched.
    #[must_use]
    pub fn supports_changelog(self) -> bool {
        self >= Self::CHANGELOG
    }

    /// Whether the post-6.3 endpoints and metric lists apply.
    #[must_use]
    pub fn is_modern(self) -> bool {
        self >= Self::MODERN_API
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ServerVersion {
    type Err = ClientError;

    /// Accepts `7`, `7.9`, `7.9.1.27448` and `8.0-SNAPSHOT` style strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(['.', '-']);
        let parse = |part: Option<&str>| part.and_then(|p| p.parse::<u32>().ok());

        let major = parse(parts.next()).ok_or_else(|| ClientError::InvalidVersion(s.to_string()))?;
        let minor = parse(parts.next()).unwrap_or(0);
        Ok(Self { major, minor })
    }
}
