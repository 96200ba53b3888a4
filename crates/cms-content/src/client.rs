use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{ConfigError, FetchError};
use crate::filter::ContentFilter;
use crate::models::{Category, ContentItem, ContentKind, ListResponse, Page};
use crate::pagination::PageRequest;
use crate::source::ContentSource;

pub const API_KEY_HEADER: &str = "x-api-key";

const CATEGORIES_ENDPOINT: &str = "categories";

/// Authenticated read client for the CMS content API.
///
/// The `fetch_*` methods report every failure as a [`FetchError`]. The
/// [`ContentSource`] implementation wraps them and collapses failures into
/// empty results, logging the cause.
///
/// ```rust,no_run
/// use cms_content::{ClientConfig, ContentClient, ContentKind, ContentSource, PageRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::from_env()?;
/// let client = ContentClient::new(&config)?;
///
/// let page = client
///     .list_content(ContentKind::Blog, PageRequest::new(2, 10)?, None)
///     .await;
/// println!("{} of {} posts", page.items.len(), page.total_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    endpoint: Url,
}

impl ContentClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint()?;

        let mut api_key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::HeaderName::from_static(API_KEY_HEADER), api_key);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        info!(endpoint = %endpoint, "Content client configured");

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `GET /{kind}?filters=..&offset=..&limit=..`
    pub fn listing_url(
        &self,
        kind: ContentKind,
        request: PageRequest,
        filter: Option<&ContentFilter>,
    ) -> Url {
        let mut url = self.resource_url(&[kind.endpoint()]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(filter) = filter {
                query.append_pair("filters", &filter.to_query_value());
            }
            query.append_pair("offset", &request.offset().to_string());
            query.append_pair("limit", &request.limit().to_string());
        }
        url
    }

    /// Endpoint joined with percent-encoded path segments.
    pub fn resource_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // endpoint() rejects cannot-be-a-base URLs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[instrument(skip_all, fields(kind = %kind, page = request.page(), page_size = request.page_size(), filter = ?filter))]
    pub async fn fetch_content_list(
        &self,
        kind: ContentKind,
        request: PageRequest,
        filter: Option<&ContentFilter>,
    ) -> Result<Page<ContentItem>, FetchError> {
        if let Some(filter) = filter {
            filter.validate()?;
        }

        let url = self.listing_url(kind, request, filter);
        debug!(offset = request.offset(), "Fetching content listing");

        let listing: ListResponse<ContentItem> = self.get_json(url, kind.endpoint()).await?;
        let page = Page::from_listing(listing, request.page_size());

        debug!(
            returned = page.items.len(),
            total_count = page.total_count,
            "Fetched content listing"
        );

        Ok(page)
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id))]
    pub async fn fetch_content_detail(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> Result<ContentItem, FetchError> {
        require_id(id)?;

        let url = self.resource_url(&[kind.endpoint(), id]);
        let item: ContentItem = self.get_json(url, &format!("{kind}/{id}")).await?;

        debug!("Fetched content item");
        Ok(item)
    }

    #[instrument(skip_all)]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let url = self.resource_url(&[CATEGORIES_ENDPOINT]);
        let listing: ListResponse<Category> = self.get_json(url, CATEGORIES_ENDPOINT).await?;

        debug!(returned = listing.contents.len(), "Fetched categories");
        Ok(listing.contents)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn fetch_category_detail(&self, id: &str) -> Result<Category, FetchError> {
        require_id(id)?;

        let url = self.resource_url(&[CATEGORIES_ENDPOINT, id]);
        let category: Category = self
            .get_json(url, &format!("{CATEGORIES_ENDPOINT}/{id}"))
            .await?;

        debug!("Fetched category");
        Ok(category)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                resource: resource.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn list_content(
        &self,
        kind: ContentKind,
        request: PageRequest,
        filter: Option<&ContentFilter>,
    ) -> Page<ContentItem> {
        self.fetch_content_list(kind, request, filter)
            .await
            .unwrap_or_else(|err| {
                report("list_content", &err);
                Page::empty()
            })
    }

    async fn get_content_detail(&self, kind: ContentKind, id: &str) -> Option<ContentItem> {
        self.fetch_content_detail(kind, id)
            .await
            .map_err(|err| report("get_content_detail", &err))
            .ok()
    }

    async fn list_categories(&self) -> Vec<Category> {
        self.fetch_categories().await.unwrap_or_else(|err| {
            report("list_categories", &err);
            Vec::new()
        })
    }

    async fn get_category_detail(&self, id: &str) -> Option<Category> {
        self.fetch_category_detail(id)
            .await
            .map_err(|err| report("get_category_detail", &err))
            .ok()
    }
}

fn require_id(id: &str) -> Result<(), FetchError> {
    if id.trim().is_empty() {
        return Err(FetchError::InvalidRequest("content id is empty".to_string()));
    }
    Ok(())
}

fn report(operation: &'static str, err: &FetchError) {
    match err {
        FetchError::NotFound { resource } => {
            debug!(operation, resource = %resource, "Content not found");
        }
        FetchError::InvalidRequest(_) => {
            warn!(operation, error = %err, "Rejected content request");
        }
        _ => {
            error!(operation, error = %err, "Content request failed, serving empty result");
        }
    }
}
