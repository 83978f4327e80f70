//! Authoritative rest-area registry.
//!
//! Filters the raw facility rows down to true staffed rest areas and records
//! which highway lines serve each one. Drowsy-driving shelters are unstaffed
//! and must never surface as food stops, so they are dropped here even when
//! the classification column calls them rest areas.

use std::collections::{HashMap, HashSet};

use mukka_core::{normalize_rest_name, normalize_route_name};

use crate::types::RestAreaRow;

/// Registry entry for one physical rest area.
#[derive(Debug, Clone)]
pub struct OfficialRestMeta {
    /// First-seen raw facility name, kept for display.
    pub display_name: String,
    /// Normalized names of every highway line serving the facility. A rest
    /// area at an interchange accumulates more than one.
    pub route_names: HashSet<String>,
}

const REST_AREA_CLASS_NAME: &str = "휴게소";
const REST_AREA_CLASS_CODE: &str = "0";
const DROWSY_SHELTER: &str = "졸음쉼터";

/// Builds the registry: normalized facility key → [`OfficialRestMeta`].
#[must_use]
pub fn build_official_registry(rows: &[RestAreaRow]) -> HashMap<String, OfficialRestMeta> {
    let mut registry: HashMap<String, OfficialRestMeta> = HashMap::new();

    for row in rows {
        let is_rest_area =
            row.class_name == REST_AREA_CLASS_NAME || row.class_code == REST_AREA_CLASS_CODE;
        if !is_rest_area {
            continue;
        }
        let raw_name = row.name.trim();
        if raw_name.is_empty() || raw_name.contains(DROWSY_SHELTER) {
            continue;
        }
        let key = normalize_rest_name(raw_name);
        if key.is_empty() {
            continue;
        }

        let entry = registry.entry(key).or_insert_with(|| OfficialRestMeta {
            display_name: raw_name.to_owned(),
            route_names: HashSet::new(),
        });
        let route = normalize_route_name(&row.route_name);
        if !route.is_empty() {
            entry.route_names.insert(route);
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, route: &str, class_name: &str, class_code: &str) -> RestAreaRow {
        RestAreaRow {
            name: name.to_string(),
            route_name: route.to_string(),
            class_name: class_name.to_string(),
            class_code: class_code.to_string(),
        }
    }

    #[test]
    fn keeps_rows_classified_by_name_or_code() {
        let rows = vec![
            row("안성휴게소", "경부고속도로", "휴게소", "9"),
            row("덕평자연휴게소", "영동고속도로", "기타", "0"),
            row("무슨주유소", "경부고속도로", "주유소", "2"),
        ];
        let registry = build_official_registry(&rows);
        assert!(registry.contains_key("안성"));
        assert!(registry.contains_key("덕평자연"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn drowsy_shelters_never_enter_the_registry() {
        let rows = vec![row("금강 졸음쉼터", "경부고속도로", "휴게소", "0")];
        assert!(build_official_registry(&rows).is_empty());
    }

    #[test]
    fn directional_duplicates_collapse_and_accumulate_routes() {
        let rows = vec![
            row("안성휴게소(서울방향)", "경부고속도로", "휴게소", "0"),
            row("안성휴게소(부산방향)", "경부고속도로", "휴게소", "0"),
            row("안성휴게소", "평택제천고속도로", "휴게소", "0"),
        ];
        let registry = build_official_registry(&rows);
        assert_eq!(registry.len(), 1);
        let meta = &registry["안성"];
        // Display name stays the first raw spelling seen.
        assert_eq!(meta.display_name, "안성휴게소(서울방향)");
        assert!(meta.route_names.contains("경부"));
        assert!(meta.route_names.contains("평택제천"));
    }

    #[test]
    fn blank_names_are_skipped() {
        let rows = vec![row("  ", "경부고속도로", "휴게소", "0")];
        assert!(build_official_registry(&rows).is_empty());
    }
}
