//! HTTP implementation of `Backend`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{RemoteError, RemoteResult};
use super::session::CredentialSource;
use super::Backend;
use crate::models::{RegularLink, Settings, SettingsPatch, SocialLink};

const SETTINGS_PATH: &str = "settings";
const REGULAR_LINKS_PATH: &str = "regular-links";
const SOCIAL_LINKS_PATH: &str = "social-links";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegularLinksBody<L> {
    #[serde(default)]
    regular_links: L,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialLinksBody<L> {
    #[serde(default)]
    social_links: L,
}

/// Dashboard API client over HTTP/JSON
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpBackend {
    /// Create a client for the API at `base_url`
    ///
    /// `timeout` bounds each whole exchange, so no call can hang forever.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialSource>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Build a request carrying the current bearer token, if there is one
    ///
    /// A missing token is not an error here; the server decides.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No session token, sending {} unauthenticated", url);
                request
            }
        }
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::from_status(url, status.as_u16(), message.trim()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.send(&url, self.request(Method::GET, &url)).await?;
        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            url,
            details: e.to_string(),
        })
    }

    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RemoteResult<()> {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.send(&url, self.request(Method::PUT, &url).json(body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_settings(&self) -> RemoteResult<Settings> {
        self.get_json(SETTINGS_PATH).await
    }

    async fn push_settings(&self, patch: &SettingsPatch) -> RemoteResult<()> {
        self.put_json(SETTINGS_PATH, patch).await
    }

    async fn fetch_regular_links(&self) -> RemoteResult<Vec<RegularLink>> {
        let body: RegularLinksBody<Vec<RegularLink>> = self.get_json(REGULAR_LINKS_PATH).await?;
        Ok(body.regular_links)
    }

    async fn fetch_social_links(&self) -> RemoteResult<Vec<SocialLink>> {
        let body: SocialLinksBody<Vec<SocialLink>> = self.get_json(SOCIAL_LINKS_PATH).await?;
        Ok(body.social_links)
    }

    async fn push_regular_links(&self, links: &[RegularLink]) -> RemoteResult<()> {
        let body = RegularLinksBody {
            regular_links: links,
        };
        self.put_json(REGULAR_LINKS_PATH, &body).await
    }

    async fn push_social_links(&self, links: &[SocialLink]) -> RemoteResult<()> {
        let body = SocialLinksBody {
            social_links: links,
        };
        self.put_json(SOCIAL_LINKS_PATH, &body).await
    }
}
