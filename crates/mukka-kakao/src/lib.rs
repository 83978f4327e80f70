//! Typed clients for the Kakao Mobility directions API and the Kakao Local
//! keyword/address search APIs.

mod client;
mod error;
mod retry;
mod types;

pub use client::KakaoClient;
pub use error::KakaoError;
pub use types::{
    AddressDocument, DirectionsResponse, Fare, KakaoRoute, KeywordSearchResponse, PlaceDocument,
    RoadSegment, RoutePriority, RouteSection, RouteSummary,
};
