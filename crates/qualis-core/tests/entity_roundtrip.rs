//! Serde roundtrip and schema generation tests for dashboard-facing entities.

use std::collections::BTreeMap;

use chrono::Utc;
use pretty_assertions::assert_eq;
use schemars::schema_for;
use qualis_core::entities::*;
use qualis_core::enums::*;
use qualis_core::servers::ServerEntry;

macro_rules! roundtrip_and_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            assert!(
                schema.get("properties").is_some(),
                "schema for {} should describe properties",
                stringify!($ty)
            );
        }
    };
}

roundtrip_and_schema!(
    project_roundtrip,
    Project,
    Project {
        id: "prj-a3f8b2c1".into(),
        collector_id: "col-00000001".into(),
        instance_url: "https://sonar.example.com".into(),
        remote_key: "com.example:payments".into(),
        remote_id: "AVx1".into(),
        name: "payments".into(),
        nice_name: "Main Sonar".into(),
        description: "payments".into(),
        enabled: true,
        pushed: false,
        last_updated: Some(Utc::now()),
    }
);

roundtrip_and_schema!(
    snapshot_roundtrip,
    QualitySnapshot,
    QualitySnapshot {
        id: "snp-0000beef".into(),
        collector_item_id: "prj-a3f8b2c1".into(),
        timestamp: 1_700_000_000_000,
        name: "payments".into(),
        url: "https://sonar.example.com/dashboard/index/com.example:payments".into(),
        version: Some("1.4.0".into()),
        metrics: vec![Metric {
            name: "coverage".into(),
            value: Some("81.2".into()),
            formatted_value: Some("81.2%".into()),
            status: Some("OK".into()),
        }],
    }
);

roundtrip_and_schema!(
    config_change_roundtrip,
    ConfigChangeRecord,
    ConfigChangeRecord {
        id: "chg-12345678".into(),
        collector_id: "col-00000001".into(),
        user_name: Some("Ada".into()),
        user_login: Some("ada".into()),
        operation: ConfigOperation::Created,
        timestamp: 1_424_710_719_000,
        change: serde_json::json!({"event": {"action": "ACTIVATED"}}),
    }
);

roundtrip_and_schema!(
    component_roundtrip,
    DashboardComponent,
    DashboardComponent {
        id: "cmp-00000001".into(),
        name: "payments".into(),
        items: BTreeMap::from([(
            CollectorKind::Quality,
            vec![ComponentItem {
                item_id: "prj-a3f8b2c1".into(),
                collector_id: "col-00000001".into(),
            }],
        )]),
    }
);

#[test]
fn collector_serialization_omits_credentials() {
    let collector = Collector {
        id: "col-00000001".into(),
        name: "Sonar".into(),
        kind: CollectorKind::Quality,
        last_executed: None,
        servers: vec![ServerEntry {
            url: "https://sonar.example.com".into(),
            password: Some("secret".into()),
            ..ServerEntry::default()
        }],
    };

    let json = serde_json::to_string(&collector).unwrap();
    assert!(!json.contains("secret"));
    let recovered: Collector = serde_json::from_str(&json).unwrap();
    assert!(recovered.servers.is_empty());
    assert_eq!(recovered.kind, CollectorKind::Quality);
}

#[test]
fn component_items_serialize_with_kind_keys() {
    let component = DashboardComponent {
        id: "cmp-00000001".into(),
        name: "payments".into(),
        items: BTreeMap::from([(CollectorKind::Security, Vec::new())]),
    };
    let value = serde_json::to_value(&component).unwrap();
    assert!(value["items"].get("security").is_some());
}
