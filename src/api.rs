//! GitHub releases API client.
//!
//! Two operations back the pipeline: resolving `latest` to a concrete tag,
//! and listing the downloadable assets of a release. Every call goes to the
//! network; API responses are never cached on disk (the binary cache in
//! [`crate::cache`] is what makes repeat runs cheap).
//!
//! # Examples
//!
//! ```no_run
//! use ghrun::api::GithubApi;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = GithubApi::new()?;
//!     let version = api.resolve_latest("BurntSushi", "ripgrep").await?;
//!     let assets = api.list_assets("BurntSushi", "ripgrep", &version).await?;
//!     println!("{} has {} assets", version, assets.len());
//!     Ok(())
//! }
//! ```

use crate::error::{GhrunError, Result};
use crate::reference::LATEST;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Release representation, reduced to what the pipeline needs.
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

/// GitHub API client.
#[derive(Clone)]
pub struct GithubApi {
    client: reqwest::Client,
    base_url: String,
}

impl GithubApi {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(format!("ghrun/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve `latest` to the concrete tag of the most recent release.
    pub async fn resolve_latest(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}/releases/latest", self.base_url, owner, repo);
        debug!(%url, "resolving latest release");

        let release = self
            .fetch_release(&url, || {
                GhrunError::RepositoryNotFound(format!("{}/{}", owner, repo))
            })
            .await?;

        if release.tag_name.is_empty() {
            return Err(GhrunError::MalformedResponse(
                "latest release has no tag name".to_string(),
            ));
        }

        Ok(release.tag_name)
    }

    /// List the assets of a release, in the order the API returns them.
    /// `version` may be `latest` or a concrete tag.
    pub async fn list_assets(
        &self,
        owner: &str,
        repo: &str,
        version: &str,
    ) -> Result<Vec<ReleaseAsset>> {
        let url = if version == LATEST {
            format!("{}/repos/{}/{}/releases/latest", self.base_url, owner, repo)
        } else {
            format!(
                "{}/repos/{}/{}/releases/tags/{}",
                self.base_url, owner, repo, version
            )
        };
        debug!(%url, "listing release assets");

        let release = self
            .fetch_release(&url, || GhrunError::ReleaseNotFound {
                repo: format!("{}/{}", owner, repo),
                version: version.to_string(),
            })
            .await?;

        Ok(release.assets)
    }

    async fn fetch_release(
        &self,
        url: &str,
        not_found: impl FnOnce() -> GhrunError,
    ) -> Result<Release> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(not_found());
        }
        if !status.is_success() {
            return Err(GhrunError::ApiError(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GhrunError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserializes_assets_in_order() {
        let body = r#"{
            "tag_name": "v1.2.0",
            "assets": [
                {"name": "widget_Darwin_arm64.tar.gz", "browser_download_url": "https://example.com/a", "size": 100},
                {"name": "widget_Linux_x86_64.tar.gz", "browser_download_url": "https://example.com/b", "size": 200}
            ]
        }"#;

        let release: Release = serde_json::from_str(body).unwrap();
        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[0].name, "widget_Darwin_arm64.tar.gz");
        assert_eq!(release.assets[1].download_url, "https://example.com/b");
        assert_eq!(release.assets[1].size, 200);
    }

    #[test]
    fn test_release_tolerates_missing_fields() {
        let release: Release = serde_json::from_str("{}").unwrap();
        assert!(release.tag_name.is_empty());
        assert!(release.assets.is_empty());
    }
}
