//! Row types for the Korea Expressway Corporation open-data endpoints.
//!
//! Field names mirror the upstream JSON (`stdRestNm`, `svarNm`, …) through
//! serde renames; the same shapes are reused verbatim in the local snapshot
//! file. Every field defaults, since the upstream omits columns freely.

use serde::{Deserialize, Serialize};

/// One dish row from the signature-food endpoint (`restBestfoodList`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodRow {
    /// Official rest-area name.
    #[serde(default, rename = "stdRestNm")]
    pub rest_name: String,
    /// Highway the rest area sits on.
    #[serde(default, rename = "routeNm")]
    pub route_name: String,
    /// Dish name.
    #[serde(default, rename = "foodNm")]
    pub food_name: String,
    /// Free-text note about the dish.
    #[serde(default, rename = "etc")]
    pub note: String,
    /// `"Y"` when flagged as recommended.
    #[serde(default, rename = "recommendyn")]
    pub recommend: String,
    /// `"Y"` when flagged as the house signature dish.
    #[serde(default, rename = "bestfoodyn")]
    pub best: String,
    /// `"Y"` when flagged as a premium item.
    #[serde(default, rename = "premiumyn")]
    pub premium: String,
}

/// One facility row from the rest-area registry endpoint
/// (`hiwaySvarInfoList`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestAreaRow {
    /// Facility name.
    #[serde(default, rename = "svarNm")]
    pub name: String,
    /// Highway the facility serves.
    #[serde(default, rename = "routeNm")]
    pub route_name: String,
    /// Facility classification code; `"0"` marks a staffed rest area.
    #[serde(default, rename = "svarGsstClssCd")]
    pub class_code: String,
    /// Facility classification name.
    #[serde(default, rename = "svarGsstClssNm")]
    pub class_name: String,
}

/// One row of the optional local popularity snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopularMenuRow {
    #[serde(default, rename = "restName")]
    pub rest_name: String,
    #[serde(default, rename = "itemName")]
    pub item_name: String,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// Paged-list envelope shared by both open-data endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// Returns `true` for the upstream's `"Y"` boolean convention (case
/// insensitive).
#[must_use]
pub fn flag_set(value: &str) -> bool {
    value.eq_ignore_ascii_case("y")
}
