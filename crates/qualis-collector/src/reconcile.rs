//! Inventory reconciliation: the per-server add/update delta and the
//! once-per-cycle deletion pass.
//!
//! Planning is pure and works on the in-memory project list; applying a plan
//! issues at most two batched writes for the delta, and one component batch
//! plus one delete batch for the deletion pass.

use std::collections::{BTreeSet, HashSet};

use qualis_client::RemoteProject;
use qualis_core::entities::{Collector, Project};
use qualis_core::servers::ServerListProvider;
use qualis_db::service::QualisService;

use crate::error::CollectorError;

/// Planned changes for one server's inventory.
#[derive(Debug, Default)]
pub struct Delta {
    /// New, not-yet-persisted projects (empty ids).
    pub creates: Vec<Project>,
    /// Indexes into the existing list of projects that actually changed.
    pub updates: BTreeSet<usize>,
}

impl Delta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty()
    }
}

/// Compute the add/update delta of `remote` against `existing`.
///
/// Matching uses the identity key `(collector id, instance URL, remote key)`.
/// Every matching persisted project gets the remote id and, if its nice name
/// is empty, the configured display name. Unchanged matches are not updates.
/// Entries repeated within `remote` yield one create.
pub fn plan_delta(collector: &Collector, remote: &[RemoteProject], existing: &mut [Project]) -> Delta {
    let mut delta = Delta::default();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for entry in remote {
        if !seen.insert((entry.instance_url.as_str(), entry.key.as_str())) {
            tracing::debug!(key = %entry.key, "duplicate inventory entry ignored");
            continue;
        }
        let nice_name = collector.nice_name(&entry.instance_url);

        let mut matched = false;
        for (idx, project) in existing.iter_mut().enumerate() {
            if project.collector_id != collector.id
                || !project.same_remote(&entry.instance_url, &entry.key)
            {
                continue;
            }
            matched = true;

            let mut changed = false;
            if project.remote_id != entry.id {
                project.remote_id.clone_from(&entry.id);
                changed = true;
            }
            if project.nice_name.is_empty() && !nice_name.is_empty() {
                project.nice_name.clone_from(&nice_name);
                changed = true;
            }
            if changed {
                delta.updates.insert(idx);
            }
        }

        if !matched {
            delta.creates.push(Project {
                id: String::new(),
                collector_id: collector.id.clone(),
                instance_url: entry.instance_url.clone(),
                remote_key: entry.key.clone(),
                remote_id: entry.id.clone(),
                name: entry.name.clone(),
                nice_name,
                description: entry.name.clone(),
                enabled: false,
                pushed: false,
                last_updated: None,
            });
        }
    }

    delta
}

/// Persist a delta: creates in one batch, updates in a second.
///
/// Created projects are appended to `existing` so later servers and the
/// deletion pass see them.
///
/// # Errors
///
/// Returns [`CollectorError::Database`] if either batch fails.
pub async fn apply_delta(
    store: &QualisService,
    delta: Delta,
    existing: &mut Vec<Project>,
) -> Result<(usize, usize), CollectorError> {
    let Delta { mut creates, updates } = delta;

    store.save_projects(&mut creates).await?;

    let mut changed: Vec<Project> = updates.iter().map(|&idx| existing[idx].clone()).collect();
    store.save_projects(&mut changed).await?;

    let counts = (creates.len(), changed.len());
    existing.extend(creates);
    Ok(counts)
}

/// Projects to delete after every server has been reconciled.
///
/// A project goes when it is not pushed and its server is no longer
/// configured, it belongs to another collector, or it is absent from the
/// combined inventory.
pub fn plan_deletions<'a>(
    collector: &Collector,
    latest: &[RemoteProject],
    existing: &'a [Project],
) -> Vec<&'a Project> {
    let present: HashSet<(&str, &str)> = latest
        .iter()
        .map(|r| (r.instance_url.as_str(), r.key.as_str()))
        .collect();

    existing
        .iter()
        .filter(|p| !p.pushed)
        .filter(|p| {
            !collector.has_server(&p.instance_url)
                || p.collector_id != collector.id
                || !present.contains(&(p.instance_url.as_str(), p.remote_key.as_str()))
        })
        .collect()
}

/// Run the deletion pass and drop deleted projects from `existing`.
///
/// Enabled projects first lose their reference in every dashboard component
/// under this collector's kind; emptied kind slots are removed.
///
/// # Errors
///
/// Returns [`CollectorError::Database`] if a lookup or batch fails.
pub async fn delete_stale(
    store: &QualisService,
    collector: &Collector,
    latest: &[RemoteProject],
    existing: &mut Vec<Project>,
) -> Result<usize, CollectorError> {
    let stale = plan_deletions(collector, latest, existing);
    if stale.is_empty() {
        return Ok(0);
    }

    let enabled_ids: Vec<String> = stale
        .iter()
        .filter(|p| p.enabled)
        .map(|p| p.id.clone())
        .collect();
    let ids: Vec<String> = stale.iter().map(|p| p.id.clone()).collect();

    if !enabled_ids.is_empty() {
        let mut components = store
            .find_components_referencing(collector.kind, &enabled_ids)
            .await?;
        for component in &mut components {
            for id in &enabled_ids {
                component.remove_reference(collector.kind, id);
            }
        }
        store.save_components(&components).await?;
        tracing::debug!(
            components = components.len(),
            "removed references to deleted projects"
        );
    }

    store.delete_projects(&ids).await?;

    let gone: HashSet<&str> = ids.iter().map(String::as_str).collect();
    existing.retain(|p| !gone.contains(p.id.as_str()));
    Ok(ids.len())
}
