//! Project (collector item) repository.
//!
//! Identity key is `(collector_id, instance_url, remote_key)`, enforced by a
//! UNIQUE constraint. `remote_id` is the server's reassignable internal id.

use qualis_core::entities::Project;
use qualis_core::ids::PREFIX_PROJECT;

use crate::error::DatabaseError;
use crate::helpers::{parse_optional_datetime, placeholders};
use crate::service::QualisService;

const SELECT_COLS: &str = "id, collector_id, instance_url, remote_key, remote_id, name, \
                           nice_name, description, enabled, pushed, last_updated";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    let last_updated = row.get::<Option<String>>(10)?;
    Ok(Project {
        id: row.get::<String>(0)?,
        collector_id: row.get::<String>(1)?,
        instance_url: row.get::<String>(2)?,
        remote_key: row.get::<String>(3)?,
        remote_id: row.get::<String>(4)?,
        name: row.get::<String>(5)?,
        nice_name: row.get::<String>(6)?,
        description: row.get::<String>(7)?,
        enabled: row.get::<i64>(8)? != 0,
        pushed: row.get::<i64>(9)? != 0,
        last_updated: parse_optional_datetime(last_updated.as_deref())?,
    })
}

/// Filters for [`QualisService::list_projects`].
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub collector_id: Option<String>,
    pub enabled: Option<bool>,
    pub instance_url: Option<String>,
}

impl QualisService {
    /// Every project owned by any of `collector_ids`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_projects_by_collector_ids(
        &self,
        collector_ids: &[&str],
    ) -> Result<Vec<Project>, DatabaseError> {
        if collector_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SELECT_COLS} FROM projects WHERE collector_id IN ({}) ORDER BY rowid",
            placeholders(1, collector_ids.len())
        );
        let params: Vec<libsql::Value> = collector_ids.iter().map(|id| (*id).into()).collect();
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    /// Enabled projects of one collector on one server instance.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_enabled_projects(
        &self,
        collector_id: &str,
        instance_url: &str,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM projects
                     WHERE collector_id = ?1 AND instance_url = ?2 AND enabled = 1
                     ORDER BY rowid"
                ),
                libsql::params![collector_id, instance_url],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    /// Fetch a single project by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no project has this id.
    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_project(&row),
            None => Err(DatabaseError::NotFound {
                entity: "project",
                id: id.to_string(),
            }),
        }
    }

    /// Filtered listing for display.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_projects(
        &self,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(ref collector_id) = filter.collector_id {
            params.push(collector_id.as_str().into());
            clauses.push(format!("collector_id = ?{}", params.len()));
        }
        if let Some(ref instance_url) = filter.instance_url {
            params.push(instance_url.as_str().into());
            clauses.push(format!("instance_url = ?{}", params.len()));
        }
        if let Some(enabled) = filter.enabled {
            params.push(i64::from(enabled).into());
            clauses.push(format!("enabled = ?{}", params.len()));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM projects {where_clause} ORDER BY instance_url, name"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    /// Persist a batch of projects in one transaction.
    ///
    /// Projects with an empty `id` are inserted and receive a generated id;
    /// the rest are updated in place by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails; nothing is committed
    /// in that case. Inserting a second project with an existing identity
    /// key fails on the UNIQUE constraint.
    pub async fn save_projects(&self, projects: &mut [Project]) -> Result<(), DatabaseError> {
        if projects.is_empty() {
            return Ok(());
        }

        let mut is_new = Vec::with_capacity(projects.len());
        for project in projects.iter_mut() {
            let new = project.id.is_empty();
            if new {
                project.id = self.db().generate_id(PREFIX_PROJECT).await?;
            }
            is_new.push(new);
        }

        let tx = self.db().conn().transaction().await?;
        for (project, new) in projects.iter().zip(is_new) {
            let params = libsql::params![
                project.id.as_str(),
                project.collector_id.as_str(),
                project.instance_url.as_str(),
                project.remote_key.as_str(),
                project.remote_id.as_str(),
                project.name.as_str(),
                project.nice_name.as_str(),
                project.description.as_str(),
                project.enabled,
                project.pushed,
                project.last_updated.map(|dt| dt.to_rfc3339())
            ];
            if new {
                tx.execute(
                    "INSERT INTO projects (id, collector_id, instance_url, remote_key, remote_id,
                         name, nice_name, description, enabled, pushed, last_updated)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params,
                )
                .await?;
            } else {
                tx.execute(
                    "UPDATE projects SET collector_id = ?2, instance_url = ?3, remote_key = ?4,
                         remote_id = ?5, name = ?6, nice_name = ?7, description = ?8,
                         enabled = ?9, pushed = ?10, last_updated = ?11
                     WHERE id = ?1",
                    params,
                )
                .await?;
            }
        }
        tx.commit().await?;

        tracing::debug!(count = projects.len(), "projects saved");
        Ok(())
    }

    /// Delete a batch of projects by id in one transaction.
    ///
    /// Snapshots of deleted projects are kept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any delete fails.
    pub async fn delete_projects(&self, ids: &[String]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let tx = self.db().conn().transaction().await?;
        let mut deleted = 0;
        for id in ids {
            deleted += tx
                .execute("DELETE FROM projects WHERE id = ?1", [id.as_str()])
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(deleted, "projects deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{new_project, test_service};

    #[tokio::test]
    async fn save_assigns_ids_and_round_trips() {
        let svc = test_service().await;
        let mut batch = vec![
            new_project("col-1", "https://a", "k1"),
            new_project("col-1", "https://a", "k2"),
        ];
        svc.save_projects(&mut batch).await.unwrap();

        assert!(batch.iter().all(|p| qualis_core::ids::has_prefix(&p.id, PREFIX_PROJECT)));
        let loaded = svc.find_projects_by_collector_ids(&["col-1"]).await.unwrap();
        assert_eq!(loaded, batch);
    }

    #[tokio::test]
    async fn save_updates_existing_rows() {
        let svc = test_service().await;
        let mut batch = vec![new_project("col-1", "https://a", "k1")];
        svc.save_projects(&mut batch).await.unwrap();

        batch[0].enabled = true;
        batch[0].remote_id = "reassigned".into();
        batch[0].last_updated = Some(Utc::now());
        let before = batch[0].id.clone();
        svc.save_projects(&mut batch).await.unwrap();

        assert_eq!(batch[0].id, before);
        let reloaded = svc.get_project(&before).await.unwrap();
        assert!(reloaded.enabled);
        assert_eq!(reloaded.remote_id, "reassigned");
        assert!(reloaded.last_updated.is_some());
    }

    #[tokio::test]
    async fn duplicate_identity_rolls_back_batch() {
        let svc = test_service().await;
        let mut first = vec![new_project("col-1", "https://a", "k1")];
        svc.save_projects(&mut first).await.unwrap();

        let mut batch = vec![
            new_project("col-1", "https://a", "k2"),
            new_project("col-1", "https://a", "k1"),
        ];
        assert!(svc.save_projects(&mut batch).await.is_err());
        let all = svc.find_projects_by_collector_ids(&["col-1"]).await.unwrap();
        assert_eq!(all.len(), 1, "failed batch must not be partially applied");
    }

    #[tokio::test]
    async fn find_by_collector_ids_filters() {
        let svc = test_service().await;
        let mut batch = vec![
            new_project("col-1", "https://a", "k1"),
            new_project("col-2", "https://a", "k1"),
            new_project("col-3", "https://a", "k1"),
        ];
        svc.save_projects(&mut batch).await.unwrap();

        let found = svc
            .find_projects_by_collector_ids(&["col-1", "col-3"])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(svc.find_projects_by_collector_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_enabled_is_scoped_to_instance() {
        let svc = test_service().await;
        let mut batch = vec![
            new_project("col-1", "https://a", "k1"),
            new_project("col-1", "https://a", "k2"),
            new_project("col-1", "https://b", "k3"),
        ];
        batch[0].enabled = true;
        batch[2].enabled = true;
        svc.save_projects(&mut batch).await.unwrap();

        let enabled = svc.find_enabled_projects("col-1", "https://a").await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].remote_key, "k1");
    }

    #[tokio::test]
    async fn list_projects_applies_filters() {
        let svc = test_service().await;
        let mut batch = vec![
            new_project("col-1", "https://a", "k1"),
            new_project("col-1", "https://b", "k2"),
        ];
        batch[1].enabled = true;
        svc.save_projects(&mut batch).await.unwrap();

        let all = svc.list_projects(&ProjectFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let enabled = svc
            .list_projects(&ProjectFilter {
                enabled: Some(true),
                ..ProjectFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].remote_key, "k2");

        let on_a = svc
            .list_projects(&ProjectFilter {
                collector_id: Some("col-1".into()),
                instance_url: Some("https://a".into()),
                enabled: None,
            })
            .await
            .unwrap();
        assert_eq!(on_a.len(), 1);
    }

    #[tokio::test]
    async fn delete_projects_batch() {
        let svc = test_service().await;
        let mut batch = vec![
            new_project("col-1", "https://a", "k1"),
            new_project("col-1", "https://a", "k2"),
        ];
        svc.save_projects(&mut batch).await.unwrap();

        let deleted = svc.delete_projects(&[batch[0].id.clone()]).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(matches!(
            svc.get_project(&batch[0].id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(svc.get_project(&batch[1].id).await.is_ok());
    }
}
