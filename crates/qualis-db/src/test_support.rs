//! Shared test utilities for qualis-db unit tests.

use qualis_core::entities::Project;

use crate::QualisDb;
use crate::service::QualisService;

/// Create an in-memory service.
pub async fn test_service() -> QualisService {
    let db = QualisDb::open_local(":memory:").await.unwrap();
    QualisService::from_db(db)
}

/// A not-yet-persisted project (empty id) under `collector_id`.
pub fn new_project(collector_id: &str, instance_url: &str, remote_key: &str) -> Project {
    Project {
        id: String::new(),
        collector_id: collector_id.to_string(),
        instance_url: instance_url.to_string(),
        remote_key: remote_key.to_string(),
        remote_id: format!("id-{remote_key}"),
        name: remote_key.to_string(),
        nice_name: String::new(),
        description: remote_key.to_string(),
        enabled: false,
        pushed: false,
        last_updated: None,
    }
}
