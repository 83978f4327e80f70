//! End-to-end route planning: directions, rest-area matching, and the final
//! presentation assembly.

use std::sync::Arc;

use mukka_core::{Coordinate, MatcherPolicy};
use mukka_exdata::{
    build_food_index, build_official_registry, write_snapshot, ExdataClient, RestDataSet,
    SnapshotStore,
};
use mukka_kakao::KakaoClient;
use tracing::{info, warn};
use uuid::Uuid;

use crate::candidates::{fetch_route_candidates, RouteCandidate};
use crate::error::PlanError;
use crate::matcher::find_stops_along_path;
use crate::merger::{pick_primary, unify_stops, EvaluatedRoute};
use crate::stop::{GroundingSource, RouteOption, Stop};

/// Everything one route-planning request needs: both upstream clients, the
/// snapshot cache, and the matching policy.
pub struct RoutePlanner {
    kakao: KakaoClient,
    exdata: ExdataClient,
    snapshot: SnapshotStore,
    policy: MatcherPolicy,
}

impl RoutePlanner {
    #[must_use]
    pub fn new(
        kakao: KakaoClient,
        exdata: ExdataClient,
        snapshot: SnapshotStore,
        policy: MatcherPolicy,
    ) -> Self {
        Self {
            kakao,
            exdata,
            snapshot,
            policy,
        }
    }

    /// Resolves one trip endpoint. Explicit coordinates short-circuit the
    /// geocoding lookup.
    ///
    /// # Errors
    ///
    /// [`PlanError::Kakao`] with `UnresolvableLocation` when the query
    /// matches nothing.
    pub async fn resolve_endpoint(
        &self,
        query: &str,
        coords: Option<Coordinate>,
    ) -> Result<Coordinate, PlanError> {
        if let Some(coords) = coords {
            return Ok(coords);
        }
        Ok(self.kakao.resolve_coordinates(query).await?)
    }

    /// Plans route options between two coordinates.
    ///
    /// Returns an empty list when the directions provider finds no drivable
    /// route. With consolidation on (the default) at most one merged option
    /// comes back; otherwise one option per surviving route candidate.
    ///
    /// # Errors
    ///
    /// Propagates upstream failures from either provider.
    pub async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RouteOption>, PlanError> {
        let candidates =
            fetch_route_candidates(&self.kakao, origin, destination, &self.policy).await?;
        if candidates.is_empty() {
            info!("no drivable route between endpoints");
            return Ok(Vec::new());
        }

        let dataset = self.load_dataset().await?;
        let registry = build_official_registry(&dataset.rest_rows);
        let food_index = build_food_index(&dataset.food_rows, &dataset.popular_rows);

        let matched = futures::future::try_join_all(candidates.iter().map(|candidate| {
            find_stops_along_path(
                &self.kakao,
                &candidate.path,
                &candidate.route_hints,
                &registry,
                &food_index,
                &self.policy,
            )
        }))
        .await?;

        let evaluated: Vec<EvaluatedRoute> = candidates
            .into_iter()
            .zip(matched)
            .map(|(candidate, stops)| EvaluatedRoute { candidate, stops })
            .collect();

        if self.policy.consolidate {
            let Some(primary) = pick_primary(&evaluated) else {
                return Ok(Vec::new());
            };
            let stops = unify_stops(&evaluated, primary, &self.policy);
            let option = build_option(&evaluated[primary].candidate, stops, true);
            info!(stops = option.stops.len(), "planned consolidated route");
            return Ok(vec![option]);
        }

        let options: Vec<RouteOption> = evaluated
            .into_iter()
            .map(|route| build_option(&route.candidate, route.stops, false))
            .collect();
        info!(options = options.len(), "planned per-priority routes");
        Ok(options)
    }

    /// Loads the open-data rows: fresh snapshot first, live endpoints as the
    /// fallback. A live fetch is written back to the snapshot path so the
    /// next request reads the file instead.
    async fn load_dataset(&self) -> Result<Arc<RestDataSet>, PlanError> {
        if let Some(data) = self.snapshot.load().await {
            return Ok(data);
        }

        info!("rest-index snapshot unavailable, fetching live open data");
        let (food_rows, rest_rows) = futures::try_join!(
            self.exdata.fetch_food_rows(),
            self.exdata.fetch_rest_area_rows()
        )?;
        let data = RestDataSet {
            rest_rows,
            food_rows,
            popular_rows: Vec::new(),
        };
        if let Err(e) = write_snapshot(self.snapshot.path(), &data).await {
            warn!(error = %e, "could not persist rest-index snapshot");
        }
        Ok(Arc::new(data))
    }
}

/// Kilometres with one decimal, as shown in route summaries.
fn distance_km(distance_m: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let km = distance_m as f64 / 1000.0;
    (km * 10.0).round() / 10.0
}

fn duration_min(duration_sec: i64) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let min = duration_sec as f64 / 60.0;
    #[allow(clippy::cast_possible_truncation)]
    let rounded = min.round() as i64;
    rounded
}

fn format_duration(duration_sec: i64) -> String {
    let total_min = duration_min(duration_sec);
    format!("{}h {}m", total_min / 60, total_min % 60)
}

fn build_option(candidate: &RouteCandidate, stops: Vec<Stop>, merged: bool) -> RouteOption {
    let km = distance_km(candidate.distance_m);
    let summary = if merged {
        format!("전체 이동 구간 휴게소 · {km}km · {}", format_duration(candidate.duration_sec))
    } else {
        format!(
            "{} 경로 · {km}km · {}",
            candidate.priority.label_ko(),
            format_duration(candidate.duration_sec)
        )
    };

    RouteOption {
        id: Uuid::new_v4().to_string(),
        summary,
        distance_km: km,
        duration_min: duration_min(candidate.duration_sec),
        toll: candidate.toll_fare > 0,
        path: candidate.path.clone(),
        stops,
        sources: grounding_sources(),
    }
}

/// The upstream data sources cited with every response.
#[must_use]
pub fn grounding_sources() -> Vec<GroundingSource> {
    vec![
        GroundingSource {
            title: "카카오모빌리티 길찾기 API".to_string(),
            uri: "https://developers.kakaomobility.com/docs/navi-api/directions/".to_string(),
        },
        GroundingSource {
            title: "카카오 로컬 API".to_string(),
            uri: "https://developers.kakao.com/docs/latest/ko/local/dev-guide".to_string(),
        },
        GroundingSource {
            title: "한국도로공사 휴게소 정보".to_string(),
            uri: "https://data.ex.co.kr/openapi/basicinfo/openApiInfoM?apiId=0317".to_string(),
        },
        GroundingSource {
            title: "한국도로공사 휴게소 대표 음식".to_string(),
            uri: "https://data.ex.co.kr/openapi/basicinfo/openApiInfoM?apiId=0502".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mukka_kakao::RoutePriority;

    fn candidate(distance_m: i64, duration_sec: i64, toll_fare: i64) -> RouteCandidate {
        RouteCandidate {
            priority: RoutePriority::Recommend,
            distance_m,
            duration_sec,
            toll_fare,
            path: vec![Coordinate { lat: 37.0, lng: 127.0 }],
            route_hints: std::collections::HashSet::new(),
        }
    }

    #[test]
    fn distance_rounds_to_one_decimal() {
        assert!((distance_km(325_460) - 325.5).abs() < f64::EPSILON);
        assert!((distance_km(999) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        assert_eq!(format_duration(11_700), "3h 15m");
        assert_eq!(format_duration(90), "0h 2m");
    }

    #[test]
    fn merged_option_uses_full_trip_summary() {
        let option = build_option(&candidate(325_000, 14_400, 18_000), Vec::new(), true);
        assert_eq!(option.summary, "전체 이동 구간 휴게소 · 325km · 4h 0m");
        assert!(option.toll);
        assert_eq!(option.duration_min, 240);
        assert_eq!(option.sources.len(), 4);
    }

    #[test]
    fn per_priority_option_is_labelled() {
        let option = build_option(&candidate(100_000, 3_600, 0), Vec::new(), false);
        assert!(option.summary.starts_with("추천 경로"));
        assert!(!option.toll);
    }
}
