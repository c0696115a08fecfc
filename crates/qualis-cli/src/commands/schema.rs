use qualis_core::entities::{
    Collector, ConfigChangeRecord, DashboardComponent, Project, QualitySnapshot,
};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaRecord};
use crate::output::output;

/// Handle `qualis schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_value(args.record)?, flags.format)
}

fn schema_value(record: SchemaRecord) -> anyhow::Result<serde_json::Value> {
    let schema = match record {
        SchemaRecord::Collector => schema_for!(Collector),
        SchemaRecord::Project => schema_for!(Project),
        SchemaRecord::Snapshot => schema_for!(QualitySnapshot),
        SchemaRecord::ConfigChange => schema_for!(ConfigChangeRecord),
        SchemaRecord::Component => schema_for!(DashboardComponent),
    };
    Ok(serde_json::to_value(schema)?)
}
