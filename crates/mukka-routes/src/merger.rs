//! Cross-route consolidation.
//!
//! When several route alternatives survive, their stops are unified onto one
//! primary polyline so the client renders a single line with every worthwhile
//! rest area pinned to it.

use std::collections::HashMap;

use mukka_core::{normalize_rest_name, MatcherPolicy};
use mukka_kakao::RoutePriority;
use tracing::debug;

use crate::candidates::RouteCandidate;
use crate::matcher::reproject_order;
use crate::stop::Stop;

/// A route candidate with its matched stops.
#[derive(Debug, Clone)]
pub struct EvaluatedRoute {
    pub candidate: RouteCandidate,
    pub stops: Vec<Stop>,
}

/// Index of the primary route: the RECOMMEND candidate when present,
/// otherwise the fastest one.
#[must_use]
pub fn pick_primary(routes: &[EvaluatedRoute]) -> Option<usize> {
    if routes.is_empty() {
        return None;
    }
    if let Some(idx) = routes
        .iter()
        .position(|r| r.candidate.priority == RoutePriority::Recommend)
    {
        return Some(idx);
    }
    routes
        .iter()
        .enumerate()
        .min_by_key(|(_, r)| r.candidate.duration_sec)
        .map(|(idx, _)| idx)
}

/// Merges every route's stops onto the primary path.
///
/// Each stop is re-pinned to its nearest primary-path vertex; duplicates of
/// the same facility (by normalized name) keep the sighting closest to the
/// primary path, ties going to the earlier path position. Stops whose name
/// normalizes to nothing are dropped. Output is in primary-path driving
/// order.
#[must_use]
pub fn unify_stops(
    routes: &[EvaluatedRoute],
    primary_index: usize,
    policy: &MatcherPolicy,
) -> Vec<Stop> {
    let primary_path = &routes[primary_index].candidate.path;

    struct Pinned {
        stop: Stop,
        order: usize,
        distance_m: f64,
    }

    let mut best_by_name: HashMap<String, Pinned> = HashMap::new();
    for route in routes {
        for stop in &route.stops {
            let Some((order, distance_m)) = reproject_order(stop.location, primary_path) else {
                continue;
            };
            let key = normalize_rest_name(&stop.name);
            if key.is_empty() {
                continue;
            }
            let challenger = Pinned {
                stop: stop.clone(),
                order,
                distance_m,
            };
            match best_by_name.entry(key) {
                std::collections::hash_map::Entry::Occupied(mut occupied) => {
                    let incumbent = occupied.get();
                    if challenger.distance_m < incumbent.distance_m
                        || (challenger.distance_m == incumbent.distance_m
                            && challenger.order < incumbent.order)
                    {
                        occupied.insert(challenger);
                    }
                }
                std::collections::hash_map::Entry::Vacant(vacant) => {
                    vacant.insert(challenger);
                }
            }
        }
    }

    let mut pinned: Vec<Pinned> = best_by_name.into_values().collect();
    pinned.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.distance_m.total_cmp(&b.distance_m))
            .then_with(|| a.stop.name.cmp(&b.stop.name))
    });
    if let Some(max) = policy.max_stops {
        pinned.truncate(max);
    }

    debug!(unified = pinned.len(), routes = routes.len(), "unified stops onto primary route");
    pinned.into_iter().map(|p| p.stop).collect()
}
