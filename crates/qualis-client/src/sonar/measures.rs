//! Current quality snapshots.
//!
//! Servers >= 6.3: `/api/measures/component` for values plus
//! `/api/project_analyses/search` for the analysis date and version.
//! Older servers: `/api/resources` with `metrics=` and `includealerts=true`.

use serde::Deserialize;

use qualis_core::entities::{Metric, Project, QualitySnapshot};
use qualis_core::enums::CollectorKind;

use crate::error::ClientError;
use crate::http::{check_response, endpoint};
use crate::sonar::{SonarClient, parse_server_date};

/// Metric whose value is the quality-gate status.
const ALERT_STATUS: &str = "alert_status";

#[derive(Deserialize)]
struct MeasuresResponse {
    component: MeasuredComponent,
}

#[derive(Deserialize)]
struct MeasuredComponent {
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Deserialize)]
struct Measure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
struct AnalysesResponse {
    #[serde(default)]
    analyses: Vec<Analysis>,
}

#[derive(Deserialize)]
struct Analysis {
    date: String,
    #[serde(default)]
    events: Vec<AnalysisEvent>,
}

#[derive(Deserialize)]
struct AnalysisEvent {
    category: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct LegacyMeasured {
    #[serde(default)]
    id: Option<serde_json::Value>,
    key: String,
    name: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    msr: Vec<LegacyMeasure>,
}

#[derive(Deserialize)]
struct LegacyMeasure {
    key: String,
    #[serde(default)]
    val: Option<serde_json::Value>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    frmt_val: Option<String>,
    #[serde(default)]
    alert: Option<String>,
}

impl SonarClient {
    /// Current snapshot of `project`, or `None` if the server has no analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status other
    /// than 404, or an unparseable body.
    pub async fn fetch_snapshot(
        &self,
        project: &Project,
        kind: CollectorKind,
    ) -> Result<Option<QualitySnapshot>, ClientError> {
        let metrics = self.metrics.for_request(kind, self.version());
        let result = if self.version().is_modern() {
            self.fetch_modern_snapshot(project, metrics).await
        } else {
            self.fetch_legacy_snapshot(project, metrics).await
        };
        match result {
            Err(ClientError::Api { status: 404, .. }) => {
                tracing::debug!(project = %project.remote_key, "project unknown to server");
                Ok(None)
            }
            other => other,
        }
    }

    async fn fetch_modern_snapshot(
        &self,
        project: &Project,
        metrics: &str,
    ) -> Result<Option<QualitySnapshot>, ClientError> {
        let key = urlencoding::encode(&project.remote_key);
        let instance_url = project.instance_url.as_str();

        let path = format!("api/project_analyses/search?project={key}&ps=1");
        let resp = check_response(self.get(instance_url, &path).send().await?).await?;
        let analyses: AnalysesResponse = resp.json().await?;
        let Some(analysis) = analyses.analyses.into_iter().next() else {
            return Ok(None);
        };

        let path = format!(
            "api/measures/component?component={key}&metricKeys={}",
            urlencoding::encode(metrics)
        );
        let resp = check_response(self.get(instance_url, &path).send().await?).await?;
        let measures: MeasuresResponse = resp.json().await?;

        modern_snapshot(project, &analysis, measures.component.measures).map(Some)
    }

    async fn fetch_legacy_snapshot(
        &self,
        project: &Project,
        metrics: &str,
    ) -> Result<Option<QualitySnapshot>, ClientError> {
        let path = format!(
            "api/resources?format=json&resource={}&metrics={}&includealerts=true",
            urlencoding::encode(&project.remote_key),
            urlencoding::encode(metrics)
        );
        let resp = check_response(self.get(&project.instance_url, &path).send().await?).await?;
        let data: Vec<LegacyMeasured> = resp.json().await?;
        match data.into_iter().next() {
            Some(resource) => legacy_snapshot(project, resource).map(Some),
            None => Ok(None),
        }
    }
}

fn modern_snapshot(
    project: &Project,
    analysis: &Analysis,
    measures: Vec<Measure>,
) -> Result<QualitySnapshot, ClientError> {
    let timestamp = parse_server_date(&analysis.date)
        .ok_or_else(|| ClientError::Parse(format!("analysis date '{}'", analysis.date)))?;
    let version = analysis
        .events
        .iter()
        .find(|e| e.category == "VERSION")
        .and_then(|e| e.name.clone());

    let metrics = measures
        .into_iter()
        .map(|m| Metric {
            status: (m.metric == ALERT_STATUS).then(|| m.value.clone()).flatten(),
            formatted_value: m.value.clone(),
            value: m.value,
            name: m.metric,
        })
        .collect();

    Ok(QualitySnapshot {
        id: String::new(),
        collector_item_id: project.id.clone(),
        timestamp,
        name: project.name.clone(),
        url: endpoint(
            &project.instance_url,
            &format!("dashboard?id={}", urlencoding::encode(&project.remote_key)),
        ),
        version,
        metrics,
    })
}

fn legacy_snapshot(
    project: &Project,
    resource: LegacyMeasured,
) -> Result<QualitySnapshot, ClientError> {
    let date = resource
        .date
        .ok_or_else(|| ClientError::Parse(format!("resource '{}' has no date", resource.key)))?;
    let timestamp =
        parse_server_date(&date).ok_or_else(|| ClientError::Parse(format!("resource date '{date}'")))?;
    let dashboard_id = super::projects::id_text(resource.id.as_ref()).unwrap_or(resource.key);

    let metrics = resource
        .msr
        .into_iter()
        .map(|m| Metric {
            value: m
                .val
                .as_ref()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .or(m.data),
            formatted_value: m.frmt_val,
            status: m.alert,
            name: m.key,
        })
        .collect();

    Ok(QualitySnapshot {
        id: String::new(),
        collector_item_id: project.id.clone(),
        timestamp,
        name: resource.name,
        url: endpoint(&project.instance_url, &format!("dashboard/index/{dashboard_id}")),
        version: resource.version,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project() -> Project {
        Project {
            id: "prj-0000000a".into(),
            collector_id: "col-00000001".into(),
            instance_url: "https://sonar.example.com".into(),
            remote_key: "com.example:payments".into(),
            remote_id: "AVx1".into(),
            name: "payments".into(),
            nice_name: String::new(),
            description: "payments".into(),
            enabled: true,
            pushed: false,
            last_updated: None,
        }
    }

    const ANALYSES_FIXTURE: &str = r#"{
        "paging": {"pageIndex": 1, "pageSize": 1, "total": 12},
        "analyses": [{
            "key": "AU-Tpxb--iU5OvuD2FLy",
            "date": "2016-12-12T17:12:45+0100",
            "events": [
                {"key": "AU-TpxcA-iU5OvuD2FLz", "category": "VERSION", "name": "1.4.0"},
                {"key": "AU-TpxcA-iU5OvuD2FL1", "category": "QUALITY_GATE", "name": "Red"}
            ]
        }]
    }"#;

    const MEASURES_FIXTURE: &str = r#"{
        "component": {
            "key": "com.example:payments",
            "name": "payments",
            "measures": [
                {"metric": "coverage", "value": "81.2"},
                {"metric": "alert_status", "value": "ERROR"},
                {"metric": "new_violations", "periods": [{"index": 1, "value": "3"}]}
            ]
        }
    }"#;

    const LEGACY_FIXTURE: &str = r#"[{
        "id": 1042,
        "key": "com.example:payments",
        "name": "payments",
        "date": "2015-06-01T10:00:00+0000",
        "version": "0.9",
        "msr": [
            {"key": "ncloc", "val": 1200.0, "frmt_val": "1,200"},
            {"key": "violations", "val": 7.0, "frmt_val": "7", "alert": "WARN"}
        ]
    }]"#;

    #[test]
    fn maps_modern_snapshot() {
        let analyses: AnalysesResponse = serde_json::from_str(ANALYSES_FIXTURE).unwrap();
        let measures: MeasuresResponse = serde_json::from_str(MEASURES_FIXTURE).unwrap();
        let snapshot =
            modern_snapshot(&project(), &analyses.analyses[0], measures.component.measures).unwrap();

        assert_eq!(snapshot.collector_item_id, "prj-0000000a");
        assert_eq!(snapshot.timestamp, 1_481_559_165_000);
        assert_eq!(snapshot.version.as_deref(), Some("1.4.0"));
        assert_eq!(
            snapshot.url,
            "https://sonar.example.com/dashboard?id=com.example%3Apayments"
        );
        assert_eq!(snapshot.metrics.len(), 3);
        assert_eq!(snapshot.metrics[0].value.as_deref(), Some("81.2"));
        assert_eq!(snapshot.metrics[0].status, None);
        assert_eq!(snapshot.metrics[1].status.as_deref(), Some("ERROR"));
        assert_eq!(snapshot.metrics[2].value, None);
    }

    #[test]
    fn maps_legacy_snapshot() {
        let data: Vec<LegacyMeasured> = serde_json::from_str(LEGACY_FIXTURE).unwrap();
        let snapshot = legacy_snapshot(&project(), data.into_iter().next().unwrap()).unwrap();

        assert_eq!(snapshot.timestamp, 1_433_152_800_000);
        assert_eq!(snapshot.url, "https://sonar.example.com/dashboard/index/1042");
        assert_eq!(snapshot.metrics[0].value.as_deref(), Some("1200.0"));
        assert_eq!(snapshot.metrics[0].formatted_value.as_deref(), Some("1,200"));
        assert_eq!(snapshot.metrics[1].status.as_deref(), Some("WARN"));
    }

    #[test]
    fn bad_analysis_date_is_parse_error() {
        let analysis = Analysis {
            date: "last tuesday".into(),
            events: Vec::new(),
        };
        assert!(matches!(
            modern_snapshot(&project(), &analysis, Vec::new()),
            Err(ClientError::Parse(_))
        ));
    }
}
