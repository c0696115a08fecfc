use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CollectorKind;

/// A collector item referenced by a dashboard component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentItem {
    pub item_id: String,
    pub collector_id: String,
}

/// A dashboard component with its collector-item references per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardComponent {
    pub id: String,
    pub name: String,
    pub items: BTreeMap<CollectorKind, Vec<ComponentItem>>,
}

impl DashboardComponent {
    #[must_use]
    pub fn references(&self, kind: CollectorKind, item_id: &str) -> bool {
        self.items
            .get(&kind)
            .is_some_and(|items| items.iter().any(|i| i.item_id == item_id))
    }

    /// Drop `item_id` from the `kind` slot, removing the slot once empty.
    ///
    /// Returns whether anything was removed. Slots of other kinds are never
    /// touched, even when they reference the same item id.
    pub fn remove_reference(&mut self, kind: CollectorKind, item_id: &str) -> bool {
        let Some(items) = self.items.get_mut(&kind) else {
            return false;
        };
        let before = items.len();
        items.retain(|i| i.item_id != item_id);
        let removed = items.len() != before;
        if items.is_empty() {
            self.items.remove(&kind);
        }
        removed
    }
}
