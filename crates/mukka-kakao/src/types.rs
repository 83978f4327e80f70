//! Wire types for the Kakao Mobility directions API and the Kakao Local
//! search APIs.
//!
//! Every nested field carries `#[serde(default)]`: the providers vary in
//! which optional blocks they emit, and a missing nested field must decay to
//! empty rather than fail the whole response. Only a completely unparseable
//! body is an error.

use mukka_core::Coordinate;
use serde::Deserialize;

/// Routing optimization goal accepted by the directions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutePriority {
    Recommend,
    Time,
    Distance,
}

impl RoutePriority {
    /// All priorities, in the order they are queried.
    pub const ALL: [RoutePriority; 3] = [
        RoutePriority::Recommend,
        RoutePriority::Time,
        RoutePriority::Distance,
    ];

    /// Query-parameter value understood by the directions API.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            RoutePriority::Recommend => "RECOMMEND",
            RoutePriority::Time => "TIME",
            RoutePriority::Distance => "DISTANCE",
        }
    }

    /// Korean display label for route summaries.
    #[must_use]
    pub fn label_ko(self) -> &'static str {
        match self {
            RoutePriority::Recommend => "추천",
            RoutePriority::Time => "최단시간",
            RoutePriority::Distance => "최단거리",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<KakaoRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoRoute {
    #[serde(default)]
    pub summary: RouteSummary,
    #[serde(default)]
    pub sections: Vec<RouteSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSummary {
    /// Total driving distance in meters.
    #[serde(default)]
    pub distance: i64,
    /// Total driving duration in seconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub fare: Fare,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fare {
    /// Toll amount in won; zero when toll-free.
    #[serde(default)]
    pub toll: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSection {
    #[serde(default)]
    pub roads: Vec<RoadSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoadSegment {
    #[serde(default)]
    pub name: String,
    /// Flat alternating lng/lat values.
    #[serde(default)]
    pub vertexes: Vec<f64>,
}

impl KakaoRoute {
    /// Dedup signature: two candidates with the same (distance, duration,
    /// toll) triple are the same physical route, whatever priority label they
    /// were returned under.
    #[must_use]
    pub fn signature(&self) -> (i64, i64, i64) {
        (
            self.summary.distance,
            self.summary.duration,
            self.summary.fare.toll,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSearchResponse {
    #[serde(default)]
    pub documents: Vec<PlaceDocument>,
}

/// One keyword-search hit from the local search API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub category_name: String,
    /// Longitude as a decimal string.
    #[serde(default)]
    pub x: String,
    /// Latitude as a decimal string.
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
}

impl PlaceDocument {
    /// Parses the string-typed lng/lat pair. `None` when either half is
    /// missing or not a number.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lng = self.x.parse::<f64>().ok()?;
        let lat = self.y.parse::<f64>().ok()?;
        Some(Coordinate { lat, lng })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressSearchResponse {
    #[serde(default)]
    pub documents: Vec<AddressDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressDocument {
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub address_name: String,
}

impl AddressDocument {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lng = self.x.parse::<f64>().ok()?;
        let lat = self.y.parse::<f64>().ok()?;
        Some(Coordinate { lat, lng })
    }
}
