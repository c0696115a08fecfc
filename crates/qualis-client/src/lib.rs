//! # qualis-client
//!
//! Remote quality-server clients for Qualis.
//!
//! The collector engine talks to servers only through two traits:
//! - [`ClientSelector`] resolves a server's API version and builds a
//!   version-appropriate [`QualityClient`] bound to that server's credentials.
//! - [`QualityClient`] lists projects, fetches current snapshots and reads
//!   quality-profile changelogs.
//!
//! [`SonarClientSelector`] is the reqwest-backed implementation for
//! SonarQube-compatible servers.

pub mod sonar;
pub mod types;
pub mod version;

mod error;
mod http;

use std::future::Future;

pub use error::ClientError;
pub use sonar::{MetricLists, SonarClient, SonarClientSelector};
pub use types::{ProfileChangeEvent, ProfileProject, QualityProfile, RemoteProject};
pub use version::ServerVersion;

use qualis_core::entities::{Project, QualitySnapshot};
use qualis_core::enums::CollectorKind;
use qualis_core::servers::Credentials;

/// Per-server adapter. Credentials are fixed when the adapter is built.
pub trait QualityClient: Send + Sync {
    /// Full project inventory of the server.
    fn list_projects(
        &self,
        instance_url: &str,
    ) -> impl Future<Output = Result<Vec<RemoteProject>, ClientError>> + Send;

    /// Current snapshot of `project` for `kind`, or `None` when the server
    /// has never analysed it.
    ///
    /// The returned snapshot has an empty `id` and `collector_item_id` set to
    /// `project.id`.
    fn fetch_quality(
        &self,
        project: &Project,
        kind: CollectorKind,
    ) -> impl Future<Output = Result<Option<QualitySnapshot>, ClientError>> + Send;

    fn list_quality_profiles(
        &self,
        instance_url: &str,
    ) -> impl Future<Output = Result<Vec<QualityProfile>, ClientError>> + Send;

    /// Projects associated with a profile, or `None` when the server reports
    /// no association data at all.
    fn projects_for_profile(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> impl Future<Output = Result<Option<Vec<ProfileProject>>, ClientError>> + Send;

    fn profile_changes(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> impl Future<Output = Result<Vec<ProfileChangeEvent>, ClientError>> + Send;
}

/// Builds per-server adapters.
pub trait ClientSelector: Send + Sync {
    type Client: QualityClient;

    /// API version of the server at `instance_url`.
    fn resolve_version(
        &self,
        instance_url: &str,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ServerVersion, ClientError>> + Send;

    /// Adapter for a server of `version`, bound to `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the underlying HTTP client cannot be built.
    fn client_for(
        &self,
        version: ServerVersion,
        credentials: &Credentials,
    ) -> Result<Self::Client, ClientError>;
}
