//! Quality profiles, their project associations, and their changelogs.

use serde::Deserialize;

use crate::error::ClientError;
use crate::http::check_response;
use crate::sonar::SonarClient;
use crate::sonar::projects::Paging;
use crate::types::{ProfileChangeEvent, ProfileProject, QualityProfile};

const CHANGELOG_PAGE_SIZE: u32 = 500;

#[derive(Deserialize)]
struct ProfilesResponse {
    #[serde(default)]
    profiles: Vec<QualityProfile>,
}

#[derive(Deserialize)]
struct ProfileProjectsResponse {
    #[serde(default)]
    results: Option<Vec<ProfileProject>>,
}

/// One changelog page. Older servers put `total`/`p`/`ps` at the top level,
/// newer ones nest them in `paging`.
#[derive(Deserialize)]
struct ChangelogResponse {
    #[serde(default)]
    events: Vec<serde_json::Value>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    p: Option<u32>,
    #[serde(default)]
    ps: Option<u32>,
    #[serde(default)]
    paging: Option<Paging>,
}

impl ChangelogResponse {
    /// Whether a page after `requested` exists. Unknown totals and empty
    /// pages end the walk.
    fn has_more(&self, requested: u32) -> bool {
        if self.events.is_empty() {
            return false;
        }
        let (index, size, total) = match &self.paging {
            Some(paging) => (paging.page_index, paging.page_size, paging.total),
            None => match self.total {
                Some(total) => (
                    self.p.unwrap_or(requested),
                    self.ps.unwrap_or(CHANGELOG_PAGE_SIZE),
                    total,
                ),
                None => return false,
            },
        };
        u64::from(index) * u64::from(size) < u64::from(total)
    }
}

impl SonarClient {
    /// Every quality profile on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an unparseable body.
    pub async fn fetch_quality_profiles(
        &self,
        instance_url: &str,
    ) -> Result<Vec<QualityProfile>, ClientError> {
        let resp = check_response(
            self.get(instance_url, "api/qualityprofiles/search")
                .send()
                .await?,
        )
        .await?;
        let data: ProfilesResponse = resp.json().await?;
        Ok(data.profiles)
    }

    /// Projects using `profile_key`; `None` when the response carries no
    /// `results` field.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an unparseable body.
    pub async fn fetch_profile_projects(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Option<Vec<ProfileProject>>, ClientError> {
        let path = format!(
            "api/qualityprofiles/projects?key={}",
            urlencoding::encode(profile_key)
        );
        let resp = check_response(self.get(instance_url, &path).send().await?).await?;
        let data: ProfileProjectsResponse = resp.json().await?;
        Ok(data.results)
    }

    /// Changelog events of `profile_key`, newest first as the server returns
    /// them. Walks every page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an unparseable body.
    pub async fn fetch_profile_changes(
        &self,
        instance_url: &str,
        profile_key: &str,
    ) -> Result<Vec<ProfileChangeEvent>, ClientError> {
        let encoded = urlencoding::encode(profile_key);
        let mut events = Vec::new();
        let mut page = 1u32;
        loop {
            let path = format!(
                "api/qualityprofiles/changelog?profileKey={encoded}&ps={CHANGELOG_PAGE_SIZE}&p={page}"
            );
            let resp = check_response(self.get(instance_url, &path).send().await?).await?;
            let data: ChangelogResponse = resp.json().await?;
            let more = data.has_more(page);
            events.extend(data.events.into_iter().map(ProfileChangeEvent::from_json));
            if !more {
                break;
            }
            page += 1;
        }
        tracing::debug!(profile_key, pages = page, events = events.len(), "changelog fetched");
        Ok(events)
    }
}
