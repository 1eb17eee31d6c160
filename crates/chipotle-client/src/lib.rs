//! HTTP client for the restaurant search and online menu endpoints.

use std::time::Duration;

use async_trait::async_trait;
use chipotle_core::{Menu, Restaurant, SearchQuery, SearchResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info_span, Instrument};

pub const CRATE_NAME: &str = "chipotle-client";

pub const DEFAULT_BASE_URL: &str = "https://services.chipotle.com";
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected http status {status} for {url}: {body}")]
    HttpStatus { status: u16, url: String, body: String },
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("api key is not a valid {name} header value")]
    InvalidHeader { name: &'static str },
    #[error("search paging did not advance: asked for page {requested}, got page {reported} of {total}")]
    Pagination {
        requested: i64,
        reported: i64,
        total: i64,
    },
    #[error("building http client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Remote catalog operations the sync pipeline depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches the single page selected by `query.page_index`.
    async fn search_page(&self, query: &SearchQuery) -> Result<SearchResult, ClientError>;

    async fn get_menu(&self, restaurant_number: i64) -> Result<Menu, ClientError>;
}

/// Runs `query` and follows pagination until the last page, keeping server
/// order within and across pages. The first failing page aborts the search.
pub async fn search_all<A>(api: &A, query: &SearchQuery) -> Result<Vec<Restaurant>, ClientError>
where
    A: CatalogApi + ?Sized,
{
    let mut query = query.clone();
    let first = api.search_page(&query).await?;
    debug!(
        page_index = query.page_index,
        restaurants = first.restaurants.len(),
        total_pages = first.paging_info.total_pages,
        "fetched search page"
    );

    let mut paging = first.paging_info;
    let mut restaurants = first.restaurants;

    while paging.current_page + 1 < paging.total_pages {
        let requested = paging.current_page + 1;
        query.page_index = requested;
        let page = api.search_page(&query).await?;
        debug!(
            page_index = requested,
            restaurants = page.restaurants.len(),
            "fetched search page"
        );

        if page.paging_info.current_page < requested {
            return Err(ClientError::Pagination {
                requested,
                reported: page.paging_info.current_page,
                total: page.paging_info.total_pages,
            });
        }

        paging = page.paging_info;
        restaurants.extend(page.restaurants);
    }

    Ok(restaurants)
}

/// Headers attached to every outgoing request.
pub fn default_headers(api_key: &str) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let key = HeaderValue::from_str(api_key).map_err(|_| ClientError::InvalidHeader {
        name: SUBSCRIPTION_KEY_HEADER,
    })?;
    headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), key);
    Ok(headers)
}

pub fn search_url(base_url: &str) -> String {
    format!("{}/restaurant/v3/restaurant", base_url.trim_end_matches('/'))
}

pub fn menu_url(base_url: &str, restaurant_number: i64) -> String {
    format!(
        "{}/menuinnovation/v1/restaurants/{restaurant_number}/onlinemenu?channelId=web&includeUnavailableItems=true",
        base_url.trim_end_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct ChipotleClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChipotleClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout)
            .default_headers(default_headers(&config.api_key)?);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().map_err(ClientError::Build)?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json<T: DeserializeOwned>(
        resp: reqwest::Response,
        url: &str,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.bytes().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogApi for ChipotleClient {
    async fn search_page(&self, query: &SearchQuery) -> Result<SearchResult, ClientError> {
        let url = search_url(&self.base_url);
        let span = info_span!("search_page", page_index = query.page_index);
        async {
            let resp = self
                .client
                .post(&url)
                .json(query)
                .send()
                .await
                .map_err(|source| ClientError::Request {
                    url: url.clone(),
                    source,
                })?;
            Self::read_json(resp, &url).await
        }
        .instrument(span)
        .await
    }

    async fn get_menu(&self, restaurant_number: i64) -> Result<Menu, ClientError> {
        let url = menu_url(&self.base_url, restaurant_number);
        let span = info_span!("get_menu", restaurant_number);
        async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|source| ClientError::Request {
                    url: url.clone(),
                    source,
                })?;
            Self::read_json(resp, &url).await
        }
        .instrument(span)
        .await
    }
}
