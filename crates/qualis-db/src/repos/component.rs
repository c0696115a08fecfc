//! Dashboard component repository.
//!
//! Components are owned by the dashboard; collectors only read their
//! references and remove references to projects they delete.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use qualis_core::entities::{ComponentItem, DashboardComponent};
use qualis_core::enums::CollectorKind;
use qualis_core::ids::PREFIX_COMPONENT;

use crate::error::DatabaseError;
use crate::helpers::{parse_enum, placeholders};
use crate::service::QualisService;

impl QualisService {
    /// Ids of every item referenced under `kind` with the given collector.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn referenced_item_ids(
        &self,
        kind: CollectorKind,
        collector_id: &str,
    ) -> Result<HashSet<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT item_id FROM component_items WHERE kind = ?1 AND collector_id = ?2",
                libsql::params![kind.as_str(), collector_id],
            )
            .await?;
        let mut ids = HashSet::new();
        while let Some(row) = rows.next().await? {
            ids.insert(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    /// Components holding a reference to any of `item_ids` under `kind`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn find_components_referencing(
        &self,
        kind: CollectorKind,
        item_ids: &[String],
    ) -> Result<Vec<DashboardComponent>, DatabaseError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT DISTINCT component_id FROM component_items
             WHERE kind = ?1 AND item_id IN ({}) ORDER BY component_id",
            placeholders(2, item_ids.len())
        );
        let mut params: Vec<libsql::Value> = vec![kind.as_str().into()];
        params.extend(item_ids.iter().map(|id| libsql::Value::from(id.as_str())));
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut component_ids = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            component_ids.insert(row.get::<String>(0)?);
        }

        let mut components = Vec::with_capacity(component_ids.len());
        for id in component_ids {
            components.push(self.get_component(&id).await?);
        }
        Ok(components)
    }

    /// Load one component with all its references.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no component has this id.
    pub async fn get_component(&self, id: &str) -> Result<DashboardComponent, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, name FROM components WHERE id = ?1", [id])
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(DatabaseError::NotFound {
                entity: "component",
                id: id.to_string(),
            });
        };
        let name = row.get::<String>(1)?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT kind, item_id, collector_id FROM component_items
                 WHERE component_id = ?1 ORDER BY rowid",
                [id],
            )
            .await?;
        let mut items: BTreeMap<CollectorKind, Vec<ComponentItem>> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let kind: CollectorKind = parse_enum(&row.get::<String>(0)?)?;
            items.entry(kind).or_default().push(ComponentItem {
                item_id: row.get::<String>(1)?,
                collector_id: row.get::<String>(2)?,
            });
        }

        Ok(DashboardComponent {
            id: id.to_string(),
            name,
            items,
        })
    }

    /// Every component, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_components(&self) -> Result<Vec<DashboardComponent>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id FROM components ORDER BY name, id", ())
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        let mut components = Vec::with_capacity(ids.len());
        for id in ids {
            components.push(self.get_component(&id).await?);
        }
        Ok(components)
    }

    /// Register a new component with the given references.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if id generation or the insert fails.
    pub async fn create_component(
        &self,
        name: &str,
        items: BTreeMap<CollectorKind, Vec<ComponentItem>>,
    ) -> Result<DashboardComponent, DatabaseError> {
        let component = DashboardComponent {
            id: self.db().generate_id(PREFIX_COMPONENT).await?,
            name: name.to_string(),
            items,
        };
        self.save_components(std::slice::from_ref(&component)).await?;
        Ok(component)
    }

    /// Replace the stored references of a batch of components in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails; nothing is committed then.
    pub async fn save_components(
        &self,
        components: &[DashboardComponent],
    ) -> Result<(), DatabaseError> {
        if components.is_empty() {
            return Ok(());
        }
        let tx = self.db().conn().transaction().await?;
        for component in components {
            tx.execute(
                "INSERT INTO components (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET name = ?2",
                libsql::params![component.id.as_str(), component.name.as_str()],
            )
            .await?;
            tx.execute(
                "DELETE FROM component_items WHERE component_id = ?1",
                [component.id.as_str()],
            )
            .await?;
            for (kind, items) in &component.items {
                for item in items {
                    tx.execute(
                        "INSERT OR IGNORE INTO component_items (component_id, kind, item_id, collector_id)
                         VALUES (?1, ?2, ?3, ?4)",
                        libsql::params![
                            component.id.as_str(),
                            kind.as_str(),
                            item.item_id.as_str(),
                            item.collector_id.as_str()
                        ],
                    )
                    .await?;
                }
            }
        }
        tx.commit().await?;

        tracing::debug!(count = components.len(), "components saved");
        Ok(())
    }
}
