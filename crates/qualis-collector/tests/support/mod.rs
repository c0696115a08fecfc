//! In-process fake quality server for cycle tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use qualis_client::{
    ClientError, ClientSelector, ProfileChangeEvent, ProfileProject, QualityClient,
    QualityProfile, RemoteProject, ServerVersion,
};
use qualis_core::entities::{Metric, Project, QualitySnapshot};
use qualis_core::enums::CollectorKind;
use qualis_core::servers::{Credentials, ServerEntry};
use qualis_db::service::QualisService;
use qualis_collector::CollectorTask;

pub const URL_A: &str = "https://sonar-a.example.com";
pub const URL_B: &str = "https://sonar-b.example.com";

#[derive(Clone)]
pub struct FakeProfile {
    pub key: String,
    pub projects: Option<Vec<ProfileProject>>,
    pub events: Vec<serde_json::Value>,
}

#[derive(Clone)]
pub struct FakeServer {
    pub version: String,
    pub projects: Vec<RemoteProject>,
    /// Snapshot timestamps by remote key.
    pub snapshots: HashMap<String, i64>,
    pub profiles: Vec<FakeProfile>,
    pub fail_inventory: bool,
    pub fail_profile_listing: bool,
    /// Every changelog call fails.
    pub fail_changelog: bool,
    /// Profiles whose changelog call fails.
    pub failing_profiles: HashSet<String>,
}

impl FakeServer {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            projects: Vec::new(),
            snapshots: HashMap::new(),
            profiles: Vec::new(),
            fail_inventory: false,
            fail_profile_listing: false,
            fail_changelog: false,
            failing_profiles: HashSet::new(),
        }
    }
}

#[derive(Default)]
pub struct Calls {
    pub changelog: usize,
    pub credentials: Vec<(String, Credentials)>,
}

/// Shared fake state; clones see the same servers and call log.
#[derive(Clone, Default)]
pub struct FakeSelector {
    servers: Arc<Mutex<HashMap<String, FakeServer>>>,
    calls: Arc<Mutex<Calls>>,
}

impl FakeSelector {
    pub fn with_server(self, url: &str, server: FakeServer) -> Self {
        self.servers.lock().unwrap().insert(url.to_string(), server);
        self
    }

    /// Mutate one server between cycles.
    pub fn update(&self, url: &str, f: impl FnOnce(&mut FakeServer)) {
        let mut servers = self.servers.lock().unwrap();
        f(servers.get_mut(url).expect("server registered"));
    }

    pub fn changelog_calls(&self) -> usize {
        self.calls.lock().unwrap().changelog
    }

    pub fn credentials_seen(&self) -> Vec<(String, Credentials)> {
        self.calls.lock().unwrap().credentials.clone()
    }

    fn server(&self, url: &str) -> Result<FakeServer, ClientError> {
        self.servers
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ClientError::Api {
                status: 503,
                message: format!("{url} unreachable"),
            })
    }
}

pub struct FakeClient {
    selector: FakeSelector,
}

impl ClientSelector for FakeSelector {
    type Client = FakeClient;

    async fn resolve_version(
        &self,
        instance_url: &str,
        credentials: &Credentials,
    ) -> Result<ServerVersion, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .credentials
            .push((instance_url.to_string(), credentials.clone()));
        self.server(instance_url)?.version.parse()
    }

    fn client_for(
        &self,
        _version: ServerVersion,
        _credentials: &Credentials,
    ) -> Result<FakeClient, ClientError> {
        Ok(FakeClient {
            selector: self.clone(),
        })
    }
}

impl QualityClient for FakeClient {
    async fn list_projects(&self, instance_url: &str) -> Result<Vec<RemoteProject>, ClientError> {
        let server = self.selector.server(instance_url)?;
        if server.fail_inventory {
            return Err(ClientError::Api {
                status: 500,
                message: "inventory unavailable".into(),
            });
        }
        Ok(server.projects)
    }

    async fn fetch_quality(
        &self,
        project: &Project,
        _kind: CollectorKind,
    ) -> Result<Option<QualitySnapshot>, ClientError> {
        let server = self.selector.server(&project.instance_url)?;
        Ok(server
            .snapshots
            .get(&project.remote_key)
            .map(|&timestamp| QualitySnapshot {
                id: String::new(),
                collector_item_id: project.id.clone(),
                timestamp,
                name: project.name.clone(),
                url: format!("{}/dashboard?id={}", project.instance_url, project.remote_key),
                version: None,
                metrics: vec![Metric {
                    name: "coverage".into(),
                    value: Some("75.0".into()),
                    formatted_value: Some("75.0%".into()),
                    status: None,
                }],
            }))
    }

    async fn list_quality_profiles(
        &self,
        instance_url: &str,
    ) -> Result<Vec<QualityProfile>, ClientError> {
        let server = self.selector.server(instance_url)?;
        if server.fail_profile_listing {
            return Err(ClientError::Api {
                status: 500,
                message: "profiles unavailable".into(),
            });
        }
        Ok(server
            .profiles
            .iter()
            .map(|p| QualityProfile {
                key: p.key.clone(),
                name: p.key.clone(),
                language: None,
            })
            .collect())
    }

    async fn projects_for_profile(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Option<Vec<ProfileProject>>, ClientError> {
        let server = self.selector.server(instance_url)?;
        Ok(server
            .profiles
            .iter()
            .find(|p| p.key == profile_key)
            .and_then(|p| p.projects.clone()))
    }

    async fn profile_changes(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Vec<ProfileChangeEvent>, ClientError> {
        self.selector.calls.lock().unwrap().changelog += 1;
        let server = self.selector.server(instance_url)?;
        if server.fail_changelog || server.failing_profiles.contains(profile_key) {
            return Err(ClientError::Api {
                status: 500,
                message: format!("changelog of {profile_key} unavailable"),
            });
        }
        Ok(server
            .profiles
            .iter()
            .find(|p| p.key == profile_key)
            .map(|p| p.events.iter().cloned().map(ProfileChangeEvent::from_json).collect())
            .unwrap_or_default())
    }
}

pub fn remote(instance_url: &str, key: &str) -> RemoteProject {
    RemoteProject {
        instance_url: instance_url.to_string(),
        key: key.to_string(),
        id: format!("id-{key}"),
        name: key.to_string(),
    }
}

pub fn server_entry(url: &str, display_name: &str) -> ServerEntry {
    ServerEntry {
        url: url.to_string(),
        display_name: Some(display_name.to_string()),
        ..ServerEntry::default()
    }
}

pub fn change_event(action: &str, login: &str, date: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "action": action,
        "authorLogin": login,
        "authorName": login.to_uppercase(),
        "ruleKey": "squid:S2162"
    })
}

pub fn associated() -> Option<Vec<ProfileProject>> {
    Some(vec![ProfileProject {
        key: "p1".into(),
        name: "p1".into(),
    }])
}

pub async fn memory_task(
    kind: CollectorKind,
    servers: Vec<ServerEntry>,
    selector: FakeSelector,
) -> CollectorTask<FakeSelector> {
    let store = QualisService::new_local(":memory:").await.unwrap();
    CollectorTask::new(kind, "0 0/5 * * * *".into(), servers, selector, store)
}

pub async fn file_task(
    path: &str,
    kind: CollectorKind,
    servers: Vec<ServerEntry>,
    selector: FakeSelector,
) -> CollectorTask<FakeSelector> {
    let store = QualisService::new_local(path).await.unwrap();
    CollectorTask::new(kind, "0 0/5 * * * *".into(), servers, selector, store)
}
