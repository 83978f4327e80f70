//! Paged HTTP client for the Korea Expressway Corporation open-data service.
//!
//! The service pages with `numOfRows`/`pageNo` but is not trusted to
//! terminate: some deployments loop back to page 1 instead of returning an
//! empty page. Fetching therefore stops on the first empty page OR the first
//! repeated page signature (length + first/last record), whichever comes
//! first.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ExdataError;
use crate::types::{FoodRow, PagedResponse, RestAreaRow};

const DEFAULT_BASE_URL: &str = "https://data.ex.co.kr/openapi/";

pub(crate) const BEST_FOOD_PATH: &str = "restinfo/restBestfoodList";
pub(crate) const REST_INFO_PATH: &str = "restinfo/hiwaySvarInfoList";

const PAGE_SIZE: usize = 500;
const MAX_PAGES: usize = 120;

/// Client for the expressway rest-area and signature-food endpoints.
pub struct ExdataClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ExdataClient {
    /// Creates a client pointed at the production open-data service.
    ///
    /// # Errors
    ///
    /// Returns [`ExdataError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ExdataError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ExdataError::Http`] if the HTTP client cannot be
    /// constructed, or [`ExdataError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ExdataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("mukka/0.1 (route-planning)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ExdataError::Api {
            status: 0,
            detail: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches every signature-food row.
    ///
    /// # Errors
    ///
    /// Propagates the client error taxonomy; a failed page fails the whole
    /// fetch (no partial results).
    pub async fn fetch_food_rows(&self) -> Result<Vec<FoodRow>, ExdataError> {
        self.fetch_paged(BEST_FOOD_PATH).await
    }

    /// Fetches every rest-area registry row.
    ///
    /// # Errors
    ///
    /// Propagates the client error taxonomy; a failed page fails the whole
    /// fetch (no partial results).
    pub async fn fetch_rest_area_rows(&self) -> Result<Vec<RestAreaRow>, ExdataError> {
        self.fetch_paged(REST_INFO_PATH).await
    }

    async fn fetch_paged<T>(&self, path: &str) -> Result<Vec<T>, ExdataError>
    where
        T: DeserializeOwned + Serialize,
    {
        let mut merged: Vec<T> = Vec::new();
        let mut seen_signatures: HashSet<String> = HashSet::new();

        for page in 1..=MAX_PAGES {
            let url = self.build_url(path, Some(page))?;
            let response: PagedResponse<T> = self.request_json(&url).await?;
            if response.list.is_empty() {
                break;
            }

            let signature = page_signature(&response.list);
            if !seen_signatures.insert(signature) {
                tracing::warn!(path, page, "repeated page signature — provider is looping");
                break;
            }

            merged.extend(response.list);
        }

        if !merged.is_empty() {
            return Ok(merged);
        }

        // Some keys only work unpaged; retry once without paging parameters.
        let url = self.build_url(path, None)?;
        let response: PagedResponse<T> = self.request_json(&url).await?;
        Ok(response.list)
    }

    fn build_url(&self, path: &str, page: Option<usize>) -> Result<Url, ExdataError> {
        let mut url = self.base_url.join(path).map_err(|e| ExdataError::Api {
            status: 0,
            detail: format!("invalid URL path '{path}': {e}"),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("type", "json");
            if let Some(page) = page {
                pairs.append_pair("numOfRows", &PAGE_SIZE.to_string());
                pairs.append_pair("pageNo", &page.to_string());
            }
        }
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ExdataError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExdataError::Api {
                status: status.as_u16(),
                detail: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ExdataError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Signature of one page: row count plus first and last serialized record.
fn page_signature<T: Serialize>(list: &[T]) -> String {
    let first = list
        .first()
        .and_then(|r| serde_json::to_string(r).ok())
        .unwrap_or_default();
    let last = list
        .last()
        .and_then(|r| serde_json::to_string(r).ok())
        .unwrap_or_default();
    format!("{}|{first}|{last}", list.len())
}
