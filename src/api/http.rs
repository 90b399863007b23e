use anyhow::{Context, Result, bail};
use deckhand_wire::{SyncStatusPayload, TreePayload};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::WorkspaceApi;
use crate::config::ApiConfig;
use crate::tree::NodeId;

/// [`WorkspaceApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(concat!("deckhand/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path '{}'", path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(response, &url)?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }
}

/// Parses the base URL, adding the trailing slash `Url::join` needs to keep
/// the last path segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).with_context(|| format!("Invalid API base URL '{}'", raw))
}

fn check_status(response: Response, url: &Url) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = %status, url = %url, "Request returned non-success status");
        bail!(
            "HTTP error: {} {} ({})",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            url
        );
    }
    Ok(response)
}

impl WorkspaceApi for HttpApi {
    async fn fetch_tree(&self) -> Result<TreePayload> {
        self.get_json(&self.config.tree_path)
            .await
            .context("Failed to fetch workspace tree")
    }

    async fn fetch_sync_status(&self) -> Result<SyncStatusPayload> {
        self.get_json(&self.config.sync_status_path)
            .await
            .context("Failed to fetch sync status")
    }

    async fn persist_mark(&self, folder_id: &NodeId, value: bool) -> Result<()> {
        let url = self.endpoint(&self.config.set_mark_path)?;
        let value = if value { "true" } else { "false" };
        debug!(url = %url, folder_id = %folder_id, value, "POST set-mark");

        let response = self
            .client
            .post(url.clone())
            .query(&[("folder_id", folder_id.as_str()), ("value", value)])
            .send()
            .await?;
        check_status(response, &url)?;
        Ok(())
    }

    async fn request_sync(&self) -> Result<()> {
        let url = self.endpoint(&self.config.sync_path)?;
        debug!(url = %url, "POST sync");
        let response = self.client.post(url.clone()).send().await?;
        check_status(response, &url)?;
        Ok(())
    }
}
