//! Enablement sync: a project is enabled exactly when some dashboard
//! component references it under this collector's kind.

use std::collections::HashSet;

use qualis_core::entities::{Collector, Project};
use qualis_db::service::QualisService;

use crate::error::CollectorError;

/// Flip the enabled flag of every project whose state disagrees with
/// `referenced`. Returns the indexes of the flipped projects.
pub fn plan_enablement(referenced: &HashSet<String>, existing: &mut [Project]) -> Vec<usize> {
    existing
        .iter_mut()
        .enumerate()
        .filter_map(|(idx, project)| {
            let wanted = referenced.contains(&project.id);
            (project.enabled != wanted).then(|| {
                project.enabled = wanted;
                idx
            })
        })
        .collect()
}

/// Recompute enabled flags from dashboard references and persist the
/// changed projects in one batch. `existing` is updated in place.
///
/// # Errors
///
/// Returns [`CollectorError::Database`] if the lookup or the batch fails.
pub async fn sync_enablement(
    store: &QualisService,
    collector: &Collector,
    existing: &mut [Project],
) -> Result<usize, CollectorError> {
    let referenced = store
        .referenced_item_ids(collector.kind, &collector.id)
        .await?;
    let flipped = plan_enablement(&referenced, existing);

    let mut changed: Vec<Project> = flipped.iter().map(|&idx| existing[idx].clone()).collect();
    store.save_projects(&mut changed).await?;

    if !changed.is_empty() {
        tracing::info!(
            collector = %collector.name,
            count = changed.len(),
            "project enablement changed"
        );
    }
    Ok(changed.len())
}
