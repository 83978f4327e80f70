//! Route candidate collection from the directions API.

use std::collections::HashSet;

use mukka_core::{resample_by_stride, Coordinate, MatcherPolicy};
use mukka_kakao::{KakaoClient, KakaoRoute, RoutePriority};
use tracing::debug;

use crate::error::PlanError;

/// A deduplicated driving route before rest-area matching.
#[derive(Debug, Clone)]
pub struct RouteCandidate {
    pub priority: RoutePriority,
    pub distance_m: i64,
    pub duration_sec: i64,
    pub toll_fare: i64,
    /// Stride-resampled polyline, capped by [`MatcherPolicy::max_path_points`].
    pub path: Vec<Coordinate>,
    /// Normalized highway names mentioned by the route's road segments.
    pub route_hints: HashSet<String>,
}

/// Flattens a route's road vertex stream into coordinates.
///
/// The directions API emits vertexes as a flat `[lng, lat, lng, lat, ...]`
/// array per road segment.
fn extract_path(route: &KakaoRoute, max_points: usize) -> Vec<Coordinate> {
    let mut raw = Vec::new();
    for section in &route.sections {
        for road in &section.roads {
            for pair in road.vertexes.chunks(2) {
                if let [lng, lat] = pair {
                    raw.push(Coordinate {
                        lat: *lat,
                        lng: *lng,
                    });
                }
            }
        }
    }
    resample_by_stride(&raw, max_points)
}

/// Collects normalized highway-name hints from a route's road segments.
///
/// Only names that look like a numbered line or expressway ("고속" / "선")
/// are kept, so that city street names never bias rest-area matching.
fn extract_route_hints(route: &KakaoRoute) -> HashSet<String> {
    let mut hints = HashSet::new();
    for section in &route.sections {
        for road in &section.roads {
            let name = road.name.trim();
            if name.is_empty() || !(name.contains("고속") || name.contains('선')) {
                continue;
            }
            let normalized = mukka_core::normalize_route_name(name);
            if normalized.chars().count() >= 2 {
                hints.insert(normalized);
            }
        }
    }
    hints
}

/// Queries directions under every supported priority and deduplicates the
/// returned routes by `(distance, duration, toll)`.
///
/// The first priority to produce a given signature wins, so RECOMMEND keeps
/// precedence when TIME or DISTANCE return the identical route.
pub async fn fetch_route_candidates(
    client: &KakaoClient,
    origin: Coordinate,
    destination: Coordinate,
    policy: &MatcherPolicy,
) -> Result<Vec<RouteCandidate>, PlanError> {
    let mut seen: HashSet<(i64, i64, i64)> = HashSet::new();
    let mut candidates = Vec::new();

    for priority in RoutePriority::ALL {
        let routes = client.directions(origin, destination, priority).await?;
        for route in &routes {
            let signature = route.signature();
            if !seen.insert(signature) {
                continue;
            }
            let path = extract_path(route, policy.max_path_points);
            if path.is_empty() {
                debug!(priority = priority.as_param(), "skipping route with empty path");
                continue;
            }
            candidates.push(RouteCandidate {
                priority,
                distance_m: route.summary.distance,
                duration_sec: route.summary.duration,
                toll_fare: route.summary.fare.toll,
                path,
                route_hints: extract_route_hints(route),
            });
        }
    }

    debug!(count = candidates.len(), "collected route candidates");
    Ok(candidates)
}
