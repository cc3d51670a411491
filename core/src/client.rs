//! Ad Posting API client.
//!
//! # Design
//! The client knows one fixed address, the base URI itself, which serves
//! the API root document. Every other endpoint is discovered from the root document's links, which are fetched on first
//! use and cached for the lifetime of the client. The cache is write-once:
//! concurrent first callers share a single fetch, and a failed fetch leaves
//! the cache empty so the next call tries again.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::hal::{HalClient, Links, Page, TemplateParams};
use crate::http::{HttpMethod, ReqwestTransport, Transport};
use crate::model::{Advertisement, AdvertisementResource, AdvertisementSummary};
use crate::token::TokenProvider;

pub const ADVERTISEMENT_REL: &str = "advertisement";
pub const ADVERTISEMENTS_REL: &str = "advertisements";
pub const ADVERTISEMENT_ID_PARAM: &str = "advertisementId";

pub const ADVERTISEMENT_CONTENT_TYPE: &str = "application/vnd.seek.advertisement+json; charset=utf-8";
pub const ADVERTISEMENT_ACCEPT: &str = "application/vnd.seek.advertisement+json; version=1, \
     application/vnd.seek.advertisement-error+json; version=1";

#[derive(serde::Deserialize)]
struct RootDocument {
    #[serde(rename = "_links", default)]
    links: Links,
}

/// Client for the Ad Posting API.
#[derive(Debug)]
pub struct AdPostingApiClient {
    hal: HalClient,
    root: OnceCell<Links>,
}

impl AdPostingApiClient {
    pub fn new(
        base_uri: &str,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> ApiResult<Self> {
        Ok(Self {
            hal: HalClient::new(base_uri, transport, tokens)?,
            root: OnceCell::new(),
        })
    }

    /// Build a client with a reqwest transport configured from `config`.
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
        Self::new(&config.base_uri, Arc::new(transport), tokens)
    }

    /// The underlying navigator, for following links on returned resources.
    pub fn hal(&self) -> &HalClient {
        &self.hal
    }

    /// Links of the API root, fetched at most once per client.
    #[instrument(level = "debug", skip(self))]
    pub async fn discover_root(&self) -> ApiResult<&Links> {
        self.root
            .get_or_try_init(|| async {
                let root: RootDocument = self.hal.get(self.hal.base_uri().as_str()).await?;
                info!(relations = root.links.len(), "discovered API root");
                Ok::<_, ApiError>(root.links)
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_advertisement(&self, id: Uuid) -> ApiResult<AdvertisementResource> {
        let root = self.discover_root().await?;
        let params = TemplateParams::new().with(ADVERTISEMENT_ID_PARAM, id);
        self.hal.follow(root, ADVERTISEMENT_REL, &params).await
    }

    /// Fetch an advertisement by a previously returned `self` link.
    #[instrument(skip(self))]
    pub async fn get_advertisement_by_uri(&self, uri: &str) -> ApiResult<AdvertisementResource> {
        self.hal.get(uri).await
    }

    /// First page of the advertisements visible to the caller.
    #[instrument(skip(self))]
    pub async fn get_all_advertisements(&self) -> ApiResult<Page<AdvertisementSummary>> {
        let root = self.discover_root().await?;
        self.hal
            .follow(root, ADVERTISEMENTS_REL, &TemplateParams::new())
            .await
    }

    #[instrument(skip(self, advertisement))]
    pub async fn create_advertisement(
        &self,
        advertisement: &Advertisement,
    ) -> ApiResult<AdvertisementResource> {
        let root = self.discover_root().await?;
        let href = root
            .resolve(ADVERTISEMENTS_REL)?
            .expand(&TemplateParams::new())?;
        debug!(%href, "creating advertisement");
        self.send_advertisement(HttpMethod::Post, &href, advertisement)
            .await
    }

    /// Replace the advertisement at `uri`. `uri` is usually the `self` link
    /// of a resource returned earlier.
    #[instrument(skip(self, advertisement))]
    pub async fn update_advertisement(
        &self,
        uri: &str,
        advertisement: &Advertisement,
    ) -> ApiResult<AdvertisementResource> {
        self.send_advertisement(HttpMethod::Put, uri, advertisement)
            .await
    }

    async fn send_advertisement(
        &self,
        method: HttpMethod,
        href: &str,
        advertisement: &Advertisement,
    ) -> ApiResult<AdvertisementResource> {
        self.hal
            .send_json(
                method,
                href,
                advertisement,
                ADVERTISEMENT_CONTENT_TYPE,
                ADVERTISEMENT_ACCEPT,
            )
            .await
    }
}
