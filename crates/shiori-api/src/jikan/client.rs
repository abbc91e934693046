use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use shiori_core::browse::SearchFilters;
use shiori_core::config::AppConfig;
use shiori_core::models::{CatalogItem, CatalogPage, Genre};

use crate::cache::{CacheKind, ResponseCache};
use crate::error::ApiError;
use crate::traits::CatalogService;

use super::types::{JikanDetailResponse, JikanGenre, JikanGenreListResponse, JikanListResponse};

/// The Jikan list endpoint rejects larger page sizes.
const MAX_PAGE_SIZE: u32 = 25;

/// Jikan v4 REST client.
pub struct JikanClient {
    http: Client,
    base_url: String,
    page_size: u32,
    min_interval: Duration,
    retry_delay: Duration,
    last_request: Mutex<Option<Instant>>,
    cache: ResponseCache,
}

impl JikanClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = config.api.base_url.clone();
        Self::with_base_url(config, base_url)
    }

    /// Client against an alternate endpoint (local mirrors, tests).
    pub fn with_base_url(config: &AppConfig, base_url: String) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            page_size: config.browse.page_size.min(MAX_PAGE_SIZE),
            min_interval: Duration::from_millis(config.api.min_request_interval_ms),
            retry_delay: Duration::from_millis(config.api.rate_limit_retry_delay_ms),
            last_request: Mutex::new(None),
            cache: ResponseCache::new(),
        })
    }

    /// Space requests out to stay under the source's published rate limit.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn send(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, ApiError> {
        self.pace().await;
        self.http.get(url).query(query).send().await.map_err(Into::into)
    }

    /// GET a JSON document, retrying exactly once after a delay when the
    /// source throttles us. Every other failure class surfaces directly.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);

        let mut resp = self.send(&url, query).await?;
        if resp.status().as_u16() == 429 {
            warn!(path, "Rate limited by catalog, retrying once");
            tokio::time::sleep(self.retry_delay).await;
            resp = self.send(&url, query).await?;
        }

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status));
        }

        resp.json::<T>().await.map_err(|e| {
            warn!(path, "Failed to decode catalog response: {e}");
            ApiError::Unknown(format!("decode error: {e}"))
        })
    }
}

impl CatalogService for JikanClient {
    async fn fetch_page(
        &self,
        filters: &SearchFilters,
        page: u32,
    ) -> Result<CatalogPage, ApiError> {
        let params = list_params(filters, page, self.page_size);
        let key = cache_key("/anime", &params);

        if let Some(hit) = self.cache.get::<CatalogPage>(&key) {
            debug!(page, "Serving catalog page from cache");
            return Ok(hit);
        }

        let resp: JikanListResponse = self.get_json("/anime", &params).await?;
        let page = resp.into_page();
        self.cache.put(CacheKind::List, key, &page);
        Ok(page)
    }

    async fn fetch_detail(&self, mal_id: u64) -> Result<CatalogItem, ApiError> {
        let path = format!("/anime/{mal_id}");
        let key = cache_key(&path, &[]);

        if let Some(hit) = self.cache.get::<CatalogItem>(&key) {
            debug!(mal_id, "Serving catalog detail from cache");
            return Ok(hit);
        }

        let resp: JikanDetailResponse = self.get_json(&path, &[]).await?;
        let item = resp.data.into_catalog_item();
        self.cache.put(CacheKind::Detail, key, &item);
        Ok(item)
    }

    async fn fetch_genres(&self) -> Result<Vec<Genre>, ApiError> {
        let key = cache_key("/genres/anime", &[]);

        if let Some(hit) = self.cache.get::<Vec<Genre>>(&key) {
            debug!("Serving genre list from cache");
            return Ok(hit);
        }

        let resp: JikanGenreListResponse = self.get_json("/genres/anime", &[]).await?;
        let genres: Vec<Genre> = resp.data.into_iter().map(JikanGenre::into_genre).collect();
        self.cache.put(CacheKind::Genres, key, &genres);
        Ok(genres)
    }
}

/// Build the query string for the list endpoint. The safe-for-work flag
/// is always sent; empty filter fields are omitted.
fn list_params(filters: &SearchFilters, page: u32, limit: u32) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("sfw".to_string(), "true".to_string()),
    ];

    if let Some(query) = filters.query.as_deref() {
        let query = query.trim();
        if !query.is_empty() {
            params.push(("q".to_string(), query.to_string()));
        }
    }
    if !filters.genres.is_empty() {
        let ids = filters
            .genres
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        params.push(("genres".to_string(), ids));
    }
    if let Some(order_by) = filters.order_by {
        params.push(("order_by".to_string(), order_by.as_param().to_string()));
    }
    if let Some(sort) = filters.sort {
        params.push(("sort".to_string(), sort.as_param().to_string()));
    }
    if let Some(status) = filters.status {
        params.push(("status".to_string(), status.as_param().to_string()));
    }
    if let Some(rating) = filters.rating.as_deref() {
        params.push(("rating".to_string(), rating.to_string()));
    }

    params
}

/// Stable cache key for a request: path plus its query string.
fn cache_key(path: &str, params: &[(String, String)]) -> String {
    let mut key = String::from(path);
    for (i, (name, value)) in params.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiori_core::browse::{AiringStatus, OrderBy, SortDirection};

    #[test]
    fn test_list_params_defaults() {
        let params = list_params(&SearchFilters::default(), 1, 24);
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "24".to_string()),
                ("sfw".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_full_filter_set() {
        let filters = SearchFilters {
            query: Some("  frieren  ".into()),
            genres: vec![2, 8],
            order_by: Some(OrderBy::Score),
            sort: Some(SortDirection::Descending),
            status: Some(AiringStatus::Complete),
            rating: Some("pg13".into()),
        };
        let params = list_params(&filters, 3, 24);

        assert!(params.contains(&("q".to_string(), "frieren".to_string())));
        assert!(params.contains(&("genres".to_string(), "2,8".to_string())));
        assert!(params.contains(&("order_by".to_string(), "score".to_string())));
        assert!(params.contains(&("sort".to_string(), "desc".to_string())));
        assert!(params.contains(&("status".to_string(), "complete".to_string())));
        assert!(params.contains(&("rating".to_string(), "pg13".to_string())));
        assert!(params.contains(&("page".to_string(), "3".to_string())));
    }

    #[test]
    fn test_blank_query_is_omitted() {
        let filters = SearchFilters {
            query: Some("   ".into()),
            ..SearchFilters::default()
        };
        let params = list_params(&filters, 1, 24);
        assert!(!params.iter().any(|(name, _)| name == "q"));
    }

    #[test]
    fn test_cache_key_is_stable() {
        let params = list_params(&SearchFilters::with_query("frieren"), 2, 24);
        assert_eq!(
            cache_key("/anime", &params),
            "/anime?page=2&limit=24&sfw=true&q=frieren"
        );
        assert_eq!(cache_key("/genres/anime", &[]), "/genres/anime");
    }
}
