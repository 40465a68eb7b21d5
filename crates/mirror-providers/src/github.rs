use crate::github_models::{ReleaseItem, RepoItem};
use crate::http::send_classified;
use anyhow::Context;
use mirror_core::error::UpstreamError;
use mirror_core::model::{ReleaseInfo, RepoMeta};
use mirror_core::provider::{UpstreamClient, UpstreamFuture};
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = "release-mirror";

pub struct GitHubClient {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build GitHub HTTP client")?;
        let api_base = Url::parse(api_base.trim_end_matches('/'))
            .with_context(|| format!("parse GitHub API base {api_base}"))?;
        if api_base.cannot_be_a_base() {
            anyhow::bail!("GitHub API base {api_base} cannot carry a path");
        }
        Ok(Self {
            client,
            api_base,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn repo_info(&self, owner: &str, name: &str) -> Result<RepoMeta, UpstreamError> {
        let what = format!("repository {owner}/{name}");
        let url = self.endpoint(&["repos", owner, name]);
        let response = send_classified(self.get(url), &what).await?;
        let item: RepoItem = response
            .json()
            .await
            .map_err(|err| UpstreamError::Network(format!("decode {what}: {err}")))?;
        Ok(item.into())
    }

    async fn latest_release(&self, owner: &str, name: &str) -> Result<ReleaseInfo, UpstreamError> {
        let what = format!("latest release of {owner}/{name}");
        let response = send_classified(
            self.get(self.endpoint(&["repos", owner, name, "releases", "latest"])),
            &what,
        )
        .await?;
        let item: ReleaseItem = response
            .json()
            .await
            .map_err(|err| UpstreamError::Network(format!("decode {what}: {err}")))?;
        let release = ReleaseInfo::from(item);
        debug!(
            owner,
            name,
            tag = %release.tag,
            assets = release.assets.len(),
            "fetched latest release"
        );
        Ok(release)
    }
}

impl UpstreamClient for GitHubClient {
    fn fetch_repo_info<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> UpstreamFuture<'a, RepoMeta> {
        Box::pin(self.repo_info(owner, name))
    }

    fn fetch_latest_release<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> UpstreamFuture<'a, ReleaseInfo> {
        Box::pin(self.latest_release(owner, name))
    }
}
