//! HTTP client for the Kakao Mobility directions API and the Kakao Local
//! search APIs.
//!
//! Wraps `reqwest` with the `KakaoAK` authorization scheme, bounded timeouts,
//! typed deserialization, and a transient-failure retry. Base URLs are
//! injectable so tests can point both APIs at a mock server.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use mukka_core::Coordinate;

use crate::error::KakaoError;
use crate::retry::retry_with_backoff;
use crate::types::{
    AddressSearchResponse, DirectionsResponse, KakaoRoute, KeywordSearchResponse, PlaceDocument,
    RoutePriority,
};

const DEFAULT_NAVI_BASE: &str = "https://apis-navi.kakaomobility.com/";
const DEFAULT_LOCAL_BASE: &str = "https://dapi.kakao.com/";

const DIRECTIONS_PATH: &str = "v1/directions";
const KEYWORD_PATH: &str = "v2/local/search/keyword.json";
const ADDRESS_PATH: &str = "v2/local/search/address.json";

/// Client for the Kakao REST APIs used by route planning.
pub struct KakaoClient {
    client: Client,
    rest_key: String,
    navi_base: Url,
    local_base: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl KakaoClient {
    /// Creates a client pointed at the production Kakao APIs.
    ///
    /// # Errors
    ///
    /// Returns [`KakaoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(rest_key: &str, timeout_secs: u64) -> Result<Self, KakaoError> {
        Self::with_base_urls(rest_key, timeout_secs, DEFAULT_NAVI_BASE, DEFAULT_LOCAL_BASE)
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`KakaoError::Http`] if the HTTP client cannot be constructed,
    /// or [`KakaoError::Api`] if either base URL is invalid.
    pub fn with_base_urls(
        rest_key: &str,
        timeout_secs: u64,
        navi_base: &str,
        local_base: &str,
    ) -> Result<Self, KakaoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("mukka/0.1 (route-planning)")
            .build()?;

        Ok(Self {
            client,
            rest_key: rest_key.to_owned(),
            navi_base: parse_base(navi_base)?,
            local_base: parse_base(local_base)?,
            max_retries: 1,
            backoff_base_ms: 500,
        })
    }

    /// Overrides the transient-failure retry budget (default: one retry,
    /// 500 ms base back-off).
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Requests route candidates between two coordinates under one routing
    /// priority, with alternatives enabled.
    ///
    /// Zero routes is a valid outcome, not an error.
    ///
    /// # Errors
    ///
    /// - [`KakaoError::Api`] on a non-2xx response.
    /// - [`KakaoError::Http`] on network failure or timeout.
    /// - [`KakaoError::Deserialize`] if the body does not parse.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        priority: RoutePriority,
    ) -> Result<Vec<KakaoRoute>, KakaoError> {
        let mut url = self.join(&self.navi_base, DIRECTIONS_PATH)?;
        url.query_pairs_mut()
            .append_pair("origin", &format!("{},{}", origin.lng, origin.lat))
            .append_pair(
                "destination",
                &format!("{},{}", destination.lng, destination.lat),
            )
            .append_pair("priority", priority.as_param())
            .append_pair("alternatives", "true")
            .append_pair("road_details", "false")
            .append_pair("summary", "false");

        let response: DirectionsResponse = self.request_json(&url).await?;
        Ok(response.routes)
    }

    /// Keyword search around a center point, sorted by distance.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`KakaoClient::directions`].
    pub async fn keyword_search_near(
        &self,
        query: &str,
        center: Coordinate,
        radius_m: u32,
        size: u8,
    ) -> Result<Vec<PlaceDocument>, KakaoError> {
        let mut url = self.join(&self.local_base, KEYWORD_PATH)?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("x", &center.lng.to_string())
            .append_pair("y", &center.lat.to_string())
            .append_pair("radius", &radius_m.to_string())
            .append_pair("size", &size.to_string())
            .append_pair("sort", "distance");

        let response: KeywordSearchResponse = self.request_json(&url).await?;
        Ok(response.documents)
    }

    /// Resolves a free-text place query to a coordinate.
    ///
    /// Keyword search is tried first (best accuracy match), then address
    /// search as a fallback.
    ///
    /// # Errors
    ///
    /// [`KakaoError::UnresolvableLocation`] when both searches come back
    /// empty; otherwise the usual client taxonomy.
    pub async fn resolve_coordinates(&self, query: &str) -> Result<Coordinate, KakaoError> {
        let mut keyword_url = self.join(&self.local_base, KEYWORD_PATH)?;
        keyword_url
            .query_pairs_mut()
            .append_pair("query", query)
            .append_pair("size", "1")
            .append_pair("sort", "accuracy");
        let keyword: KeywordSearchResponse = self.request_json(&keyword_url).await?;
        if let Some(coord) = keyword.documents.first().and_then(PlaceDocument::coordinate) {
            return Ok(coord);
        }

        let mut address_url = self.join(&self.local_base, ADDRESS_PATH)?;
        address_url
            .query_pairs_mut()
            .append_pair("query", query)
            .append_pair("size", "1");
        let address: AddressSearchResponse = self.request_json(&address_url).await?;
        if let Some(coord) = address.documents.first().and_then(|d| d.coordinate()) {
            return Ok(coord);
        }

        Err(KakaoError::UnresolvableLocation(query.to_owned()))
    }

    fn join(&self, base: &Url, path: &str) -> Result<Url, KakaoError> {
        base.join(path).map_err(|e| KakaoError::Api {
            status: 0,
            detail: format!("invalid URL path '{path}': {e}"),
        })
    }

    /// Sends an authorized GET, asserts a 2xx status (keeping the upstream
    /// body as error detail otherwise), and parses the response as JSON.
    async fn request_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, KakaoError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header("Authorization", format!("KakaoAK {}", self.rest_key))
                    .send()
                    .await?;

                let status = response.status();
                let body = response.text().await?;
                if !status.is_success() {
                    return Err(KakaoError::Api {
                        status: status.as_u16(),
                        detail: body,
                    });
                }

                serde_json::from_str(&body).map_err(|e| KakaoError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })
            }
        })
        .await
    }
}

fn parse_base(base: &str) -> Result<Url, KakaoError> {
    // Exactly one trailing slash so Url::join appends instead of replacing
    // the last path segment.
    let normalised = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| KakaoError::Api {
        status: 0,
        detail: format!("invalid base URL '{base}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_normalises_trailing_slash() {
        let url = parse_base("https://dapi.kakao.com").unwrap();
        assert_eq!(url.as_str(), "https://dapi.kakao.com/");
        let url = parse_base("https://dapi.kakao.com///").unwrap();
        assert_eq!(url.as_str(), "https://dapi.kakao.com/");
    }

    #[test]
    fn parse_base_rejects_garbage() {
        assert!(matches!(
            parse_base("not a url"),
            Err(KakaoError::Api { status: 0, .. })
        ));
    }
}
