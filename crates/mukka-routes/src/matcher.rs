//! Rest-area discovery along a route polyline.
//!
//! Probe points sampled along the path drive keyword searches; hits are
//! filtered down to plausible staffed rest areas, verified against the
//! official registry in two tiers, deduplicated per facility, and finally
//! decorated with signature dishes.

use std::collections::{HashMap, HashSet};

use mukka_core::{
    nearest_path_point, normalize_rest_name, resample_by_distance, Coordinate, MatcherPolicy,
};
use mukka_exdata::{FoodMeta, OfficialRestMeta};
use mukka_kakao::{KakaoClient, PlaceDocument};
use tracing::debug;
use uuid::Uuid;

use crate::error::PlanError;
use crate::stop::{SearchLinks, Stop, StopKind};

/// Place names or categories containing any of these are never rest areas,
/// whatever the keyword search returned.
const EXCLUDE_KEYWORDS: [&str; 14] = [
    "동물",
    "애견",
    "카페",
    "보호센터",
    "주차장",
    "세차",
    "마트",
    "호텔",
    "모텔",
    "편의점",
    "놀이",
    "체험",
    "졸음쉼터",
    "쉼터",
];

const REST_AREA_MARKER: &str = "휴게소";
const FALLBACK_TOP_ITEM: &str = "대표 메뉴 정보 준비 중";
const FALLBACK_DESCRIPTION: &str = "경로 인근 휴게소";

/// One deduplicated rest-area candidate pinned to a path position.
#[derive(Debug, Clone)]
pub(crate) struct CandidateStop {
    pub place_id: String,
    pub display_name: String,
    pub location: Coordinate,
    /// Path vertex index of the nearest point; stops sort by this so they
    /// appear in driving order.
    pub order: usize,
    pub distance_m: f64,
    /// Registry key the place resolved to.
    pub official_key: String,
    /// Normalized place name, the secondary food-lookup key.
    pub normalized_name: String,
    pub road_address: String,
    pub address: String,
}

/// Drops text inside parenthesis pairs. Directional annotations like
/// "(서울방향)" or "(주차장 이용)" otherwise trip the exclusion keywords.
fn strip_parentheticals(text: &str) -> String {
    let mut depth = 0_u32;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Whether a keyword-search hit plausibly names a staffed highway rest area.
///
/// The rest-area marker is checked on the full name and category, but the
/// exclusion keywords only on the parenthesis-stripped text: an annotation
/// like "안성휴게소(주차장 만차)" still names a rest area, while "OO주차장"
/// does not.
#[must_use]
pub fn looks_like_rest_area(place: &PlaceDocument) -> bool {
    let name = place.place_name.trim();
    if name.is_empty() {
        return false;
    }
    let has_marker =
        name.contains(REST_AREA_MARKER) || place.category_name.contains(REST_AREA_MARKER);
    if !has_marker {
        return false;
    }
    let stripped_name = strip_parentheticals(name);
    let stripped_category = strip_parentheticals(&place.category_name);
    !EXCLUDE_KEYWORDS
        .iter()
        .any(|kw| stripped_name.contains(kw) || stripped_category.contains(kw))
}

/// Resolves a normalized place name to a registry key.
///
/// Exact match first; otherwise the containment match (either direction)
/// with the smallest length gap wins. Keys are scanned in sorted order so
/// equal-gap ties resolve the same way on every run.
#[must_use]
pub fn find_official_key<'a>(
    normalized: &str,
    registry: &'a HashMap<String, OfficialRestMeta>,
) -> Option<&'a str> {
    if normalized.is_empty() {
        return None;
    }
    if let Some((key, _)) = registry.get_key_value(normalized) {
        return Some(key.as_str());
    }

    let mut keys: Vec<&String> = registry.keys().collect();
    keys.sort_unstable();

    let mut best: Option<(usize, &str)> = None;
    let norm_len = normalized.chars().count();
    for key in keys {
        if !(key.contains(normalized) || normalized.contains(key.as_str())) {
            continue;
        }
        let gap = key.chars().count().abs_diff(norm_len);
        if best.is_none_or(|(best_gap, _)| gap < best_gap) {
            best = Some((gap, key.as_str()));
        }
    }
    best.map(|(_, key)| key)
}

/// Whether any registry route for the facility overlaps any route hint.
/// Containment in either direction counts, so "경부" matches "경부선". An
/// empty set on either side carries no information to contradict the match,
/// so it counts as overlap.
#[must_use]
pub fn shares_route_hint(meta: &OfficialRestMeta, hints: &HashSet<String>) -> bool {
    if hints.is_empty() || meta.route_names.is_empty() {
        return true;
    }
    meta.route_names.iter().any(|route| {
        hints
            .iter()
            .any(|hint| route.contains(hint.as_str()) || hint.contains(route.as_str()))
    })
}

/// Looks up dishes for a stop: exact match on the official registry key,
/// then on the normalized place name, then the closest containment match
/// over sorted index keys against both lookup keys.
#[must_use]
pub fn find_food_meta<'a>(
    official_key: &str,
    place_name_key: &str,
    food_index: &'a HashMap<String, FoodMeta>,
) -> Option<&'a FoodMeta> {
    let targets: Vec<&str> = [official_key, place_name_key]
        .into_iter()
        .filter(|target| !target.is_empty())
        .collect();

    for target in &targets {
        if let Some(meta) = food_index.get(*target) {
            return Some(meta);
        }
    }
    if targets.is_empty() {
        return None;
    }

    let mut keys: Vec<&String> = food_index.keys().collect();
    keys.sort_unstable();

    let mut best: Option<(usize, &FoodMeta)> = None;
    for key in keys {
        for target in &targets {
            if !(key.contains(*target) || target.contains(key.as_str())) {
                continue;
            }
            let gap = key.chars().count().abs_diff(target.chars().count());
            if best.as_ref().is_none_or(|(best_gap, _)| gap < *best_gap) {
                best = Some((gap, &food_index[key]));
            }
        }
    }
    best.map(|(_, meta)| meta)
}

/// Keep-best rule for duplicate facilities: closer to the path wins, ties go
/// to the earlier path position.
fn improves(challenger: &CandidateStop, incumbent: &CandidateStop) -> bool {
    challenger.distance_m < incumbent.distance_m
        || (challenger.distance_m == incumbent.distance_m && challenger.order < incumbent.order)
}

fn keep_best(map: &mut HashMap<String, CandidateStop>, key: String, candidate: CandidateStop) {
    match map.entry(key) {
        std::collections::hash_map::Entry::Occupied(mut occupied) => {
            if improves(&candidate, occupied.get()) {
                occupied.insert(candidate);
            }
        }
        std::collections::hash_map::Entry::Vacant(vacant) => {
            vacant.insert(candidate);
        }
    }
}

/// Merges the two verification tiers per facility key.
///
/// Relaxed winners form the base; strict (registry- and hint-verified)
/// winners overwrite them, so a verified sighting always beats an unverified
/// closer one. With a gate set, the strict tier must reach `min` facilities
/// before it is trusted to overwrite; below the gate both tiers merge by the
/// keep-best rule instead.
fn merge_tiers(
    strict: HashMap<String, CandidateStop>,
    relaxed: HashMap<String, CandidateStop>,
    min_strict_for_relaxed: Option<usize>,
) -> HashMap<String, CandidateStop> {
    let mut merged = relaxed;
    match min_strict_for_relaxed {
        Some(min) if strict.len() < min => {
            for (key, candidate) in strict {
                keep_best(&mut merged, key, candidate);
            }
        }
        _ => {
            for (key, candidate) in strict {
                merged.insert(key, candidate);
            }
        }
    }
    merged
}

/// Searches for rest areas along `path` and returns them as presentation-ready
/// stops in driving order.
///
/// # Errors
///
/// Propagates place-search failures as [`PlanError::Kakao`].
pub async fn find_stops_along_path(
    client: &KakaoClient,
    path: &[Coordinate],
    route_hints: &HashSet<String>,
    registry: &HashMap<String, OfficialRestMeta>,
    food_index: &HashMap<String, FoodMeta>,
    policy: &MatcherPolicy,
) -> Result<Vec<Stop>, PlanError> {
    let probes = resample_by_distance(path, policy.probe_count(path.len()));

    let mut seen_places: HashSet<String> = HashSet::new();
    let mut strict: HashMap<String, CandidateStop> = HashMap::new();
    let mut relaxed: HashMap<String, CandidateStop> = HashMap::new();

    for probe in &probes {
        for query in &policy.search_queries {
            let places = client
                .keyword_search_near(query, *probe, policy.search_radius_m, policy.search_page_size)
                .await?;
            for place in places {
                if !place.id.is_empty() && !seen_places.insert(place.id.clone()) {
                    continue;
                }
                let Some((key, candidate, verified)) =
                    classify_place(&place, path, route_hints, registry, policy)
                else {
                    continue;
                };
                if verified {
                    keep_best(&mut strict, key.clone(), candidate.clone());
                }
                keep_best(&mut relaxed, key, candidate);
            }
        }
    }

    debug!(
        strict = strict.len(),
        relaxed = relaxed.len(),
        probes = probes.len(),
        "matched rest-area candidates"
    );

    let merged = merge_tiers(strict, relaxed, policy.min_strict_for_relaxed);
    let mut candidates: Vec<CandidateStop> = merged.into_values().collect();
    candidates.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.distance_m.total_cmp(&b.distance_m))
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    if let Some(max) = policy.max_stops {
        candidates.truncate(max);
    }

    Ok(candidates
        .into_iter()
        .map(|candidate| {
            let meta =
                find_food_meta(&candidate.official_key, &candidate.normalized_name, food_index);
            build_stop(candidate, meta)
        })
        .collect())
}

/// Filters one place into a candidate, or `None` when it is not a rest area,
/// has no usable coordinate, lies beyond the relaxed distance bound, or does
/// not resolve to an official registry entry. Only registered facilities ever
/// become stops.
///
/// The boolean marks strict-tier membership: the facility's highway overlaps
/// a route hint and it sits within the strict distance bound.
fn classify_place(
    place: &PlaceDocument,
    path: &[Coordinate],
    route_hints: &HashSet<String>,
    registry: &HashMap<String, OfficialRestMeta>,
    policy: &MatcherPolicy,
) -> Option<(String, CandidateStop, bool)> {
    if !looks_like_rest_area(place) {
        return None;
    }
    let location = place.coordinate()?;
    let nearest = nearest_path_point(location, path)?;
    if nearest.distance_m > policy.relaxed_distance_m {
        return None;
    }

    let normalized = normalize_rest_name(&place.place_name);
    if normalized.is_empty() {
        return None;
    }
    let official_key = find_official_key(&normalized, registry)?;
    let meta = registry.get(official_key)?;
    let verified =
        shares_route_hint(meta, route_hints) && nearest.distance_m <= policy.strict_distance_m;

    let candidate = CandidateStop {
        place_id: place.id.clone(),
        display_name: meta.display_name.clone(),
        location,
        order: nearest.index,
        distance_m: nearest.distance_m,
        official_key: official_key.to_owned(),
        normalized_name: normalized,
        road_address: place.road_address_name.trim().to_owned(),
        address: place.address_name.trim().to_owned(),
    };
    Some((official_key.to_owned(), candidate, verified))
}

/// Turns a matched candidate into the presentation shape the client renders.
fn build_stop(candidate: CandidateStop, meta: Option<&FoodMeta>) -> Stop {
    let id = if candidate.place_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        candidate.place_id.clone()
    };

    let foods = meta.map(|m| m.foods.clone()).unwrap_or_default();
    let top_items = if foods.is_empty() {
        vec![FALLBACK_TOP_ITEM.to_owned()]
    } else {
        foods.clone()
    };

    let description = meta
        .map(|m| m.description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            if foods.is_empty() {
                None
            } else {
                Some(format!("대표 메뉴: {}", foods.join(", ")))
            }
        })
        .or_else(|| non_empty(&candidate.road_address))
        .or_else(|| non_empty(&candidate.address))
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_owned());

    let image_url = format!("https://picsum.photos/seed/{id}/640/360");
    let search_links = SearchLinks::for_place(&candidate.display_name);

    Stop {
        id,
        kind: StopKind::HighwayRestArea,
        name: candidate.display_name,
        location: candidate.location,
        top_items,
        description,
        rating: 4.2,
        image_url,
        search_links,
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

/// Re-pins a stop to a different path, used when consolidating stops from
/// several route alternatives onto the primary polyline.
pub(crate) fn reproject_order(stop_location: Coordinate, path: &[Coordinate]) -> Option<(usize, f64)> {
    nearest_path_point(stop_location, path).map(|n| (n.index, n.distance_m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, category: &str, x: f64, y: f64) -> PlaceDocument {
        PlaceDocument {
            id: format!("id-{name}"),
            place_name: name.to_string(),
            category_name: category.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            ..PlaceDocument::default()
        }
    }

    fn meta(display: &str, routes: &[&str]) -> OfficialRestMeta {
        OfficialRestMeta {
            display_name: display.to_string(),
            route_names: routes.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    #[test]
    fn rest_area_marker_is_required() {
        assert!(looks_like_rest_area(&place("안성휴게소", "여행 > 휴게소", 127.0, 37.0)));
        assert!(!looks_like_rest_area(&place("안성분식", "음식점", 127.0, 37.0)));
    }

    #[test]
    fn exclusion_keywords_reject_lookalikes() {
        assert!(!looks_like_rest_area(&place("금강 졸음쉼터", "휴게소", 127.0, 37.0)));
        assert!(!looks_like_rest_area(&place("휴게소카페", "카페", 127.0, 37.0)));
        assert!(!looks_like_rest_area(&place(
            "애견쉼터",
            "여행 > 휴게소",
            127.0,
            37.0
        )));
    }

    #[test]
    fn parenthetical_annotations_do_not_trigger_exclusion() {
        // The annotation mentions a parking lot, but the place is a rest area.
        assert!(looks_like_rest_area(&place(
            "안성휴게소(주차장 만차)",
            "여행 > 휴게소",
            127.0,
            37.0
        )));
    }

    #[test]
    fn official_key_exact_match_wins() {
        let mut registry = HashMap::new();
        registry.insert("안성".to_string(), meta("안성휴게소", &["경부"]));
        registry.insert("안성맞춤".to_string(), meta("안성맞춤휴게소", &["평택제천"]));
        assert_eq!(find_official_key("안성", &registry), Some("안성"));
    }

    #[test]
    fn official_key_containment_prefers_smallest_length_gap() {
        let mut registry = HashMap::new();
        registry.insert("안성맞춤".to_string(), meta("안성맞춤휴게소", &["평택제천"]));
        registry.insert("안성휴".to_string(), meta("안성휴휴게소", &["경부"]));
        // "안성휴" (gap 1) beats "안성맞춤" (gap 2) for query "안성".
        assert_eq!(find_official_key("안성", &registry), Some("안성휴"));
    }

    #[test]
    fn official_key_misses_cleanly() {
        let registry = HashMap::new();
        assert_eq!(find_official_key("덕평", &registry), None);
        assert_eq!(find_official_key("", &registry), None);
    }

    #[test]
    fn route_hint_overlap_is_bidirectional_containment() {
        let m = meta("안성휴게소", &["경부"]);
        let hints: HashSet<String> = ["경부선".to_string()].into();
        assert!(shares_route_hint(&m, &hints));
        let unrelated: HashSet<String> = ["영동".to_string()].into();
        assert!(!shares_route_hint(&m, &unrelated));
    }

    #[test]
    fn empty_hint_set_on_either_side_counts_as_overlap() {
        let m = meta("안성휴게소", &["경부"]);
        assert!(shares_route_hint(&m, &HashSet::new()));

        let unlisted = meta("신설휴게소", &[]);
        let hints: HashSet<String> = ["경부선".to_string()].into();
        assert!(shares_route_hint(&unlisted, &hints));
    }

    #[test]
    fn keep_best_prefers_smaller_distance_then_earlier_order() {
        let mut map = HashMap::new();
        let far = CandidateStop {
            place_id: "1".into(),
            display_name: "안성휴게소".into(),
            location: Coordinate { lat: 37.0, lng: 127.0 },
            order: 3,
            distance_m: 2_000.0,
            official_key: "안성".into(),
            normalized_name: "안성".into(),
            road_address: String::new(),
            address: String::new(),
        };
        let near = CandidateStop { distance_m: 500.0, order: 7, ..far.clone() };
        keep_best(&mut map, "안성".into(), far.clone());
        keep_best(&mut map, "안성".into(), near);
        assert!((map["안성"].distance_m - 500.0).abs() < f64::EPSILON);

        let earlier = CandidateStop { distance_m: 500.0, order: 2, ..far };
        keep_best(&mut map, "안성".into(), earlier);
        assert_eq!(map["안성"].order, 2);
    }

    fn cand(name: &str, order: usize, distance_m: f64) -> CandidateStop {
        CandidateStop {
            place_id: format!("p-{name}"),
            display_name: name.to_string(),
            location: Coordinate { lat: 37.0, lng: 127.0 },
            order,
            distance_m,
            official_key: name.to_string(),
            normalized_name: name.to_string(),
            road_address: String::new(),
            address: String::new(),
        }
    }

    #[test]
    fn merge_prefers_strict_winner_over_closer_relaxed_one() {
        let mut strict = HashMap::new();
        strict.insert("안성".to_string(), cand("안성(상행)", 4, 3_000.0));
        let mut relaxed = HashMap::new();
        relaxed.insert("안성".to_string(), cand("안성(하행)", 9, 1_200.0));
        relaxed.insert("덕평".to_string(), cand("덕평", 12, 6_000.0));

        let merged = merge_tiers(strict, relaxed, None);
        assert_eq!(merged["안성"].display_name, "안성(상행)");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_gate_falls_back_to_keep_best_below_minimum() {
        let mut strict = HashMap::new();
        strict.insert("안성".to_string(), cand("안성(상행)", 4, 3_000.0));
        let mut relaxed = HashMap::new();
        relaxed.insert("안성".to_string(), cand("안성(하행)", 9, 1_200.0));

        // Gate of 3 unmet: the closer relaxed sighting survives.
        let merged = merge_tiers(strict, relaxed, Some(3));
        assert_eq!(merged["안성"].display_name, "안성(하행)");
    }

    #[test]
    fn food_meta_falls_back_to_closest_containment_key() {
        let mut index = HashMap::new();
        index.insert(
            "덕평자연".to_string(),
            FoodMeta { foods: vec!["돈까스".to_string()], description: String::new() },
        );
        let found = find_food_meta("덕평", "", &index).unwrap();
        assert_eq!(found.foods, vec!["돈까스"]);
        assert!(find_food_meta("금강", "금강", &index).is_none());
    }

    #[test]
    fn food_lookup_prefers_official_key_over_place_name() {
        let mut index = HashMap::new();
        index.insert(
            "안성".to_string(),
            FoodMeta { foods: vec!["소떡소떡".to_string()], description: String::new() },
        );
        index.insert(
            "안성맞춤".to_string(),
            FoodMeta { foods: vec!["한우국밥".to_string()], description: String::new() },
        );
        // Both keys hit exactly; the registry key decides.
        let found = find_food_meta("안성", "안성맞춤", &index).unwrap();
        assert_eq!(found.foods, vec!["소떡소떡"]);

        // The fuzzy pass also considers the registry key, smallest gap first.
        let found = find_food_meta("안성맞춤원조", "없는이름", &index).unwrap();
        assert_eq!(found.foods, vec!["한우국밥"]);
    }

    #[test]
    fn stop_presentation_fallback_chain() {
        let c = cand("이름없는휴게소", 0, 100.0);
        let stop = build_stop(c.clone(), None);
        assert_eq!(stop.top_items, vec![FALLBACK_TOP_ITEM]);
        assert_eq!(stop.description, FALLBACK_DESCRIPTION);
        assert!((stop.rating - 4.2).abs() < f64::EPSILON);
        assert!(stop.image_url.contains("picsum.photos/seed/p-이름없는휴게소"));

        let with_foods = FoodMeta {
            foods: vec!["국밥".to_string(), "우동".to_string()],
            description: String::new(),
        };
        let stop = build_stop(c.clone(), Some(&with_foods));
        assert_eq!(stop.description, "대표 메뉴: 국밥, 우동");

        let with_note = FoodMeta {
            foods: vec!["국밥".to_string()],
            description: "진한 국물".to_string(),
        };
        let stop = build_stop(c, Some(&with_note));
        assert_eq!(stop.description, "진한 국물");
        assert_eq!(stop.top_items, vec!["국밥"]);
    }

    #[test]
    fn description_uses_addresses_before_generic_fallback() {
        let mut c = cand("주소휴게소", 1, 50.0);
        c.road_address = "경기 안성시 공도읍 1".to_string();
        c.address = "경기 안성시 2".to_string();
        assert_eq!(build_stop(c.clone(), None).description, "경기 안성시 공도읍 1");
        c.road_address.clear();
        assert_eq!(build_stop(c, None).description, "경기 안성시 2");
    }

    #[test]
    fn generated_id_replaces_blank_place_id() {
        let mut c = cand("무명", 0, 10.0);
        c.place_id = String::new();
        let stop = build_stop(c, None);
        assert_eq!(stop.id.len(), 36);
    }
}
