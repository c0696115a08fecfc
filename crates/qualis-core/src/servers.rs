//! Per-server records and the `ServerListProvider` capability.
//!
//! A collector's configured servers are an ordered list of [`ServerEntry`]
//! values. Every optional field resolves to `None` when absent; a short
//! credential or display-name list never produces an error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One configured analysis server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerEntry {
    pub url: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerEntry {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Credentials bound to this server.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: non_empty(self.username.as_deref()),
            password: non_empty(self.password.as_deref()),
            token: non_empty(self.token.as_deref()),
        }
    }

    /// Build server entries from positional lists.
    ///
    /// Position `i` of every list belongs to `urls[i]`. Lists shorter than
    /// `urls` leave the missing fields as `None`.
    #[must_use]
    pub fn zip_positional(
        urls: &[String],
        display_names: &[String],
        usernames: &[String],
        passwords: &[String],
        tokens: &[String],
    ) -> Vec<Self> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| Self {
                url: url.clone(),
                display_name: display_names.get(i).cloned(),
                username: usernames.get(i).cloned(),
                password: passwords.get(i).cloned(),
                token: tokens.get(i).cloned(),
            })
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

/// Authentication material for one server. Token wins over username/password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl Credentials {
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.username.is_none() && self.token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Capability of anything that carries an ordered server list.
///
/// The reconciliation engine only needs the server list, so it depends on this
/// trait rather than on a concrete collector type.
pub trait ServerListProvider {
    fn servers(&self) -> &[ServerEntry];

    /// Configured server URLs in order.
    fn server_urls(&self) -> Vec<&str> {
        self.servers().iter().map(|s| s.url.as_str()).collect()
    }

    /// Exact-match membership test used by the deletion pass.
    fn has_server(&self, instance_url: &str) -> bool {
        self.servers().iter().any(|s| s.url == instance_url)
    }

    /// Display name paired with `instance_url` (case-insensitive match), or
    /// an empty string when no server or no display name matches.
    fn nice_name(&self, instance_url: &str) -> String {
        self.servers()
            .iter()
            .find(|s| s.url.eq_ignore_ascii_case(instance_url))
            .and_then(|s| s.display_name.clone())
            .unwrap_or_default()
    }
}

impl ServerListProvider for [ServerEntry] {
    fn servers(&self) -> &[ServerEntry] {
        self
    }
}

impl ServerListProvider for Vec<ServerEntry> {
    fn servers(&self) -> &[ServerEntry] {
        self
    }
}
