//! Project inventory: `/api/components/search` (>= 6.3) and `/api/resources` (legacy).

use serde::Deserialize;

use crate::error::ClientError;
use crate::http::check_response;
use crate::sonar::SonarClient;
use crate::types::RemoteProject;

const PAGE_SIZE: u32 = 500;

#[derive(Deserialize)]
struct ComponentsPage {
    paging: Paging,
    #[serde(default)]
    components: Vec<Component>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Paging {
    pub(super) page_index: u32,
    pub(super) page_size: u32,
    pub(super) total: u32,
}

#[derive(Deserialize)]
struct Component {
    #[serde(default)]
    id: Option<String>,
    key: String,
    name: String,
}

#[derive(Deserialize)]
struct LegacyResource {
    #[serde(default)]
    id: Option<serde_json::Value>,
    key: String,
    name: String,
}

/// Numeric or string id as text.
pub(crate) fn id_text(id: Option<&serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl SonarClient {
    /// Full project inventory of `instance_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an unparseable body.
    pub async fn fetch_projects(&self, instance_url: &str) -> Result<Vec<RemoteProject>, ClientError> {
        let projects = if self.version().is_modern() {
            self.fetch_components(instance_url).await?
        } else {
            self.fetch_legacy_resources(instance_url).await?
        };
        tracing::debug!(instance_url, count = projects.len(), "fetched project inventory");
        Ok(projects)
    }

    async fn fetch_components(&self, instance_url: &str) -> Result<Vec<RemoteProject>, ClientError> {
        let mut projects = Vec::new();
        let mut page = 1;
        loop {
            let path = format!("api/components/search?qualifiers=TRK&ps={PAGE_SIZE}&p={page}");
            let resp = check_response(self.get(instance_url, &path).send().await?).await?;
            let data: ComponentsPage = resp.json().await?;
            let received = data.components.len();
            projects.extend(
                data.components
                    .into_iter()
                    .map(|c| component_to_remote(instance_url, c)),
            );

            let seen = u64::from(data.paging.page_index) * u64::from(data.paging.page_size);
            if received == 0 || seen >= u64::from(data.paging.total) {
                break;
            }
            page += 1;
        }
        Ok(projects)
    }

    async fn fetch_legacy_resources(
        &self,
        instance_url: &str,
    ) -> Result<Vec<RemoteProject>, ClientError> {
        let resp = check_response(
            self.get(instance_url, "api/resources?format=json")
                .send()
                .await?,
        )
        .await?;
        let data: Vec<LegacyResource> = resp.json().await?;
        Ok(data
            .into_iter()
            .map(|r| legacy_to_remote(instance_url, r))
            .collect())
    }
}

fn component_to_remote(instance_url: &str, c: Component) -> RemoteProject {
    RemoteProject {
        instance_url: instance_url.to_string(),
        id: c.id.unwrap_or_else(|| c.key.clone()),
        key: c.key,
        name: c.name,
    }
}

fn legacy_to_remote(instance_url: &str, r: LegacyResource) -> RemoteProject {
    RemoteProject {
        instance_url: instance_url.to_string(),
        id: id_text(r.id.as_ref()).unwrap_or_else(|| r.key.clone()),
        key: r.key,
        name: r.name,
    }
}
