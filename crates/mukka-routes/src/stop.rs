//! Final emitted types: stops and route options.
//!
//! Field names serialize to the camelCase contract the web client consumes.

use mukka_core::Coordinate;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    HighwayRestArea,
    LocalRestaurant,
}

/// External map-search links for one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchLinks {
    pub naver: String,
    pub google: String,
    pub kakao: String,
}

impl SearchLinks {
    /// Builds the three map search URLs for a display name.
    #[must_use]
    pub fn for_place(name: &str) -> Self {
        let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC).to_string();
        Self {
            naver: format!("https://map.naver.com/v5/search/{encoded}"),
            google: format!("https://www.google.com/maps/search/?api=1&query={encoded}"),
            kakao: format!("https://map.kakao.com/link/search/{encoded}"),
        }
    }
}

/// One recommended stop on a route. Immutable once constructed; lives for a
/// single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    #[serde(rename = "stopId")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub name: String,
    pub location: Coordinate,
    #[serde(rename = "topItems")]
    pub top_items: Vec<String>,
    pub description: String,
    /// Placeholder until a ratings source exists.
    pub rating: f64,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "searchLinks")]
    pub search_links: SearchLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// One route option returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    #[serde(rename = "routeId")]
    pub id: String,
    pub summary: String,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "durationMin")]
    pub duration_min: i64,
    pub toll: bool,
    pub path: Vec<Coordinate>,
    pub stops: Vec<Stop>,
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_links_percent_encode_korean_names() {
        let links = SearchLinks::for_place("안성휴게소");
        assert!(links.naver.starts_with("https://map.naver.com/v5/search/%EC%95%88"));
        assert!(links.google.contains("query=%EC%95%88"));
        assert!(links.kakao.contains("/link/search/%EC%95%88"));
    }

    #[test]
    fn stop_serializes_with_client_facing_field_names() {
        let stop = Stop {
            id: "101".to_string(),
            kind: StopKind::HighwayRestArea,
            name: "안성휴게소".to_string(),
            location: Coordinate {
                lat: 37.067,
                lng: 127.243,
            },
            top_items: vec!["소떡소떡".to_string()],
            description: "테스트".to_string(),
            rating: 4.2,
            image_url: "https://example.com/img".to_string(),
            search_links: SearchLinks::for_place("안성휴게소"),
        };
        let value = serde_json::to_value(&stop).unwrap();
        assert_eq!(value["stopId"], "101");
        assert_eq!(value["type"], "highway_rest_area");
        assert_eq!(value["topItems"][0], "소떡소떡");
        assert!(value["searchLinks"]["naver"].is_string());
    }
}
