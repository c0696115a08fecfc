use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single measured value inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Metric {
    pub name: String,
    pub value: Option<String>,
    pub formatted_value: Option<String>,
    /// Quality-gate status of this metric (`OK`, `WARN`, `ERROR`) when reported.
    pub status: Option<String>,
}

/// An immutable, time-stamped metric record owned by one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualitySnapshot {
    pub id: String,
    pub collector_item_id: String,
    /// Analysis time in epoch milliseconds.
    pub timestamp: i64,
    pub name: String,
    pub url: String,
    pub version: Option<String>,
    pub metrics: Vec<Metric>,
}
