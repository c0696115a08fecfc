//! SonarQube-compatible client.
//!
//! One module per endpoint family: [`projects`] (inventory), [`measures`]
//! (snapshots) and [`profiles`] (quality profiles and changelogs). Servers
//! older than 6.3 are served through the legacy `/api/resources` endpoint.

pub mod measures;
pub mod profiles;
pub mod projects;

use std::time::Duration;

use chrono::DateTime;
use qualis_core::entities::{Project, QualitySnapshot};
use qualis_core::enums::CollectorKind;
use qualis_core::servers::Credentials;

use crate::error::ClientError;
use crate::http::{check_response, endpoint};
use crate::types::{ProfileChangeEvent, ProfileProject, QualityProfile, RemoteProject};
use crate::version::ServerVersion;
use crate::{ClientSelector, QualityClient};

const USER_AGENT: &str = "qualis/0.1";

/// Date format used by analyses and changelog events, e.g. `2015-02-23T17:58:39+0100`.
pub const SERVER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a server date into epoch milliseconds.
#[must_use]
pub fn parse_server_date(raw: &str) -> Option<i64> {
    DateTime::parse_from_str(raw, SERVER_DATE_FORMAT)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Comma-separated metric keys requested per collector kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLists {
    /// Quality collector, servers >= 6.3.
    pub quality: String,
    /// Security collector, servers >= 6.3.
    pub security: String,
    /// Both kinds, servers < 6.3.
    pub legacy: String,
}

impl MetricLists {
    #[must_use]
    pub fn for_request(&self, kind: CollectorKind, version: ServerVersion) -> &str {
        if !version.is_modern() {
            return &self.legacy;
        }
        match kind {
            CollectorKind::Quality => &self.quality,
            CollectorKind::Security => &self.security,
        }
    }
}

// ── Selector ───────────────────────────────────────────────────────

/// Builds [`SonarClient`]s; one per server per cycle.
#[derive(Debug, Clone)]
pub struct SonarClientSelector {
    metrics: MetricLists,
    timeout: Duration,
}

impl SonarClientSelector {
    #[must_use]
    pub const fn new(metrics: MetricLists, timeout: Duration) -> Self {
        Self { metrics, timeout }
    }

    fn build_http(&self) -> Result<reqwest::Client, ClientError> {
        Ok(reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?)
    }
}

impl ClientSelector for SonarClientSelector {
    type Client = SonarClient;

    async fn resolve_version(
        &self,
        instance_url: &str,
        credentials: &Credentials,
    ) -> Result<ServerVersion, ClientError> {
        let http = self.build_http()?;
        let url = endpoint(instance_url, "api/server/version");
        let resp = check_response(authorize(http.get(&url), credentials).send().await?).await?;
        let body = resp.text().await?;
        let version = body.parse::<ServerVersion>()?;
        tracing::debug!(instance_url, %version, "resolved server version");
        Ok(version)
    }

    fn client_for(
        &self,
        version: ServerVersion,
        credentials: &Credentials,
    ) -> Result<SonarClient, ClientError> {
        Ok(SonarClient {
            http: self.build_http()?,
            credentials: credentials.clone(),
            version,
            metrics: self.metrics.clone(),
        })
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for one server, bound to that server's credentials.
pub struct SonarClient {
    http: reqwest::Client,
    credentials: Credentials,
    version: ServerVersion,
    metrics: MetricLists,
}

impl SonarClient {
    #[must_use]
    pub const fn version(&self) -> ServerVersion {
        self.version
    }

    /// Authorized GET request for an API path on `instance_url`.
    fn get(&self, instance_url: &str, path: &str) -> reqwest::RequestBuilder {
        authorize(self.http.get(endpoint(instance_url, path)), &self.credentials)
    }
}

/// Token goes in the basic-auth user field with an empty password;
/// otherwise username/password; otherwise anonymous.
fn authorize(req: reqwest::RequestBuilder, credentials: &Credentials) -> reqwest::RequestBuilder {
    if let Some(token) = &credentials.token {
        return req.basic_auth(token, None::<&str>);
    }
    match &credentials.username {
        Some(username) => req.basic_auth(username, credentials.password.as_deref()),
        None => req,
    }
}

impl QualityClient for SonarClient {
    async fn list_projects(&self, instance_url: &str) -> Result<Vec<RemoteProject>, ClientError> {
        self.fetch_projects(instance_url).await
    }

    async fn fetch_quality(
        &self,
        project: &Project,
        kind: CollectorKind,
    ) -> Result<Option<QualitySnapshot>, ClientError> {
        self.fetch_snapshot(project, kind).await
    }

    async fn list_quality_profiles(
        &self,
        instance_url: &str,
    ) -> Result<Vec<QualityProfile>, ClientError> {
        self.fetch_quality_profiles(instance_url).await
    }

    async fn projects_for_profile(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Option<Vec<ProfileProject>>, ClientError> {
        self.fetch_profile_projects(instance_url, profile_key).await
    }

    async fn profile_changes(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Vec<ProfileChangeEvent>, ClientError> {
        self.fetch_profile_changes(instance_url, profile_key).await
    }
}
