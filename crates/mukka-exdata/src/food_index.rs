//! Signature-dish ranking per rest area.
//!
//! Raw dish rows carry three quality flags (best / recommended / premium)
//! and an optional free-text note; the optional popularity snapshot adds
//! rank-boosted items. The index reduces each rest area to at most three
//! dishes and one description.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use mukka_core::normalize_rest_name;

use crate::types::{flag_set, FoodRow, PopularMenuRow};

/// Ranked short list of dishes for one rest area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodMeta {
    /// Up to three dish names, best first.
    pub foods: Vec<String>,
    /// Free-text note for the top dish, or the first note seen for the rest
    /// area. Empty when no row carried one.
    pub description: String,
}

/// Flag score: best 100, recommended 50, premium 30, additive.
fn row_score(row: &FoodRow) -> i64 {
    let mut score = 0;
    if flag_set(&row.best) {
        score += 100;
    }
    if flag_set(&row.recommend) {
        score += 50;
    }
    if flag_set(&row.premium) {
        score += 30;
    }
    score
}

/// Popularity score: 120 base plus 20 per rank step above rank 10, so rank 1
/// scores 300 and dominates any flag combination.
fn popularity_score(rank: u32) -> i64 {
    let bonus = i64::from(10 - rank.min(10)) * 20;
    120 + bonus
}

#[derive(Default)]
struct FoodGroup {
    score_by_food: HashMap<String, i64>,
    /// Dish names in first-seen order; tie-breaks stay deterministic because
    /// partition sorts are stable over this order.
    first_seen: Vec<String>,
    best: HashSet<String>,
    recommend: HashSet<String>,
    description_by_food: HashMap<String, String>,
    fallback_description: String,
}

impl FoodGroup {
    /// Records `score` for a dish, keeping the maximum across duplicate rows.
    fn bump_score(&mut self, name: &str, score: i64) {
        match self.score_by_food.entry(name.to_owned()) {
            Entry::Occupied(mut occupied) => {
                if score > *occupied.get() {
                    occupied.insert(score);
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(score);
                self.first_seen.push(name.to_owned());
            }
        }
    }

    fn into_meta(self) -> FoodMeta {
        let score_of = |name: &str| self.score_by_food.get(name).copied().unwrap_or(0);

        let mut best: Vec<&String> = self
            .first_seen
            .iter()
            .filter(|n| self.best.contains(n.as_str()))
            .collect();
        let mut recommend: Vec<&String> = self
            .first_seen
            .iter()
            .filter(|n| self.recommend.contains(n.as_str()) && !self.best.contains(n.as_str()))
            .collect();
        let mut others: Vec<&String> = self
            .first_seen
            .iter()
            .filter(|n| !self.best.contains(n.as_str()) && !self.recommend.contains(n.as_str()))
            .collect();
        best.sort_by_key(|n| std::cmp::Reverse(score_of(n)));
        recommend.sort_by_key(|n| std::cmp::Reverse(score_of(n)));
        others.sort_by_key(|n| std::cmp::Reverse(score_of(n)));

        // The top best-flagged and top recommended dish are always shown when
        // they exist; remaining slots fill in best > recommended > other
        // priority.
        let mut selected: Vec<String> = Vec::new();
        let mut used: HashSet<&str> = HashSet::new();
        if let Some(name) = best.first() {
            selected.push((*name).clone());
            used.insert(name.as_str());
        }
        if let Some(name) = recommend.first() {
            selected.push((*name).clone());
            used.insert(name.as_str());
        }
        for name in best.iter().chain(&recommend).chain(&others) {
            if selected.len() >= 3 {
                break;
            }
            if used.insert(name.as_str()) {
                selected.push((*name).clone());
            }
        }

        let description = selected
            .first()
            .and_then(|name| self.description_by_food.get(name))
            .cloned()
            .unwrap_or(self.fallback_description);

        FoodMeta {
            foods: selected,
            description,
        }
    }
}

/// Builds the food index: normalized rest-area key → ranked [`FoodMeta`].
///
/// Deterministic given identical input ordering; ties break on first-seen
/// order.
#[must_use]
pub fn build_food_index(
    food_rows: &[FoodRow],
    popular_rows: &[PopularMenuRow],
) -> HashMap<String, FoodMeta> {
    let mut groups: HashMap<String, FoodGroup> = HashMap::new();

    for row in food_rows {
        let key = normalize_rest_name(&row.rest_name);
        if key.is_empty() {
            continue;
        }
        let group = groups.entry(key).or_default();

        let food_name = row.food_name.trim();
        if !food_name.is_empty() {
            group.bump_score(food_name, row_score(row));
            if flag_set(&row.best) {
                group.best.insert(food_name.to_owned());
            }
            if flag_set(&row.recommend) {
                group.recommend.insert(food_name.to_owned());
            }
            let note = row.note.trim();
            if !note.is_empty() {
                group
                    .description_by_food
                    .entry(food_name.to_owned())
                    .or_insert_with(|| note.to_owned());
            }
        }

        if group.fallback_description.is_empty() {
            let note = row.note.trim();
            if !note.is_empty() {
                group.fallback_description = note.to_owned();
            }
        }
    }

    for row in popular_rows {
        let key = normalize_rest_name(&row.rest_name);
        let item = row.item_name.trim();
        if key.is_empty() || item.is_empty() {
            continue;
        }
        let group = groups.entry(key).or_default();
        group.bump_score(item, popularity_score(row.rank.unwrap_or(99)));
        group.recommend.insert(item.to_owned());
    }

    groups
        .into_iter()
        .map(|(key, group)| (key, group.into_meta()))
        .collect()
}
