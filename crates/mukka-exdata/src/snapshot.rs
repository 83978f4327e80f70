//! Local snapshot of the open-data rows with a bounded-TTL process cache.
//!
//! The two paged endpoints change rarely but cost dozens of calls to fetch,
//! so a maintenance job (the CLI `refresh` command) writes them to one JSON
//! file that request handlers read instead. The in-process cache keeps the
//! parsed rows for a few minutes; refresh is idempotent, so racing loaders
//! may both read the file and overwrite each other harmlessly.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ExdataError;
use crate::types::{FoodRow, PopularMenuRow, RestAreaRow};

const REST_INFO_URL: &str = "https://data.ex.co.kr/openapi/restinfo/hiwaySvarInfoList";
const BEST_FOOD_URL: &str = "https://data.ex.co.kr/openapi/restinfo/restBestfoodList";

/// The cached raw rows of both open-data sources plus the optional
/// popularity list.
#[derive(Debug, Clone, Default)]
pub struct RestDataSet {
    pub rest_rows: Vec<RestAreaRow>,
    pub food_rows: Vec<FoodRow>,
    pub popular_rows: Vec<PopularMenuRow>,
}

/// On-disk snapshot shape. Older snapshots used `restAreas`/`foods`; both
/// spellings are accepted on read.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default, rename = "restRows")]
    rest_rows: Option<Vec<RestAreaRow>>,
    #[serde(default, rename = "restAreas")]
    rest_areas: Option<Vec<RestAreaRow>>,
    #[serde(default, rename = "foodRows")]
    food_rows: Option<Vec<FoodRow>>,
    #[serde(default, rename = "foods")]
    foods: Option<Vec<FoodRow>>,
    #[serde(default, rename = "popularRows")]
    popular_rows: Option<Vec<PopularMenuRow>>,
}

#[derive(Debug, Serialize)]
struct SnapshotPayload<'a> {
    #[serde(rename = "generatedAt")]
    generated_at: String,
    source: SnapshotSources,
    #[serde(rename = "restRows")]
    rest_rows: &'a [RestAreaRow],
    #[serde(rename = "foodRows")]
    food_rows: &'a [FoodRow],
    #[serde(rename = "popularRows")]
    popular_rows: &'a [PopularMenuRow],
}

#[derive(Debug, Serialize)]
struct SnapshotSources {
    #[serde(rename = "restInfo")]
    rest_info: &'static str,
    #[serde(rename = "bestFood")]
    best_food: &'static str,
}

fn parse_snapshot(raw: &str) -> Option<RestDataSet> {
    let file: SnapshotFile = match serde_json::from_str(raw) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse rest-index snapshot");
            return None;
        }
    };

    let rest_rows = file.rest_rows.or(file.rest_areas).unwrap_or_default();
    let food_rows = file.food_rows.or(file.foods).unwrap_or_default();
    let popular_rows = file.popular_rows.unwrap_or_default();

    // A snapshot with neither registry nor food rows is useless; treat it as
    // absent so callers fall back to the live endpoints.
    if rest_rows.is_empty() && food_rows.is_empty() {
        return None;
    }

    Some(RestDataSet {
        rest_rows,
        food_rows,
        popular_rows,
    })
}

struct CachedSnapshot {
    loaded_at: Instant,
    data: Arc<RestDataSet>,
}

/// TTL-cached reader for the snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
    ttl: Duration,
    cache: RwLock<Option<CachedSnapshot>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            cache: RwLock::new(None),
        }
    }

    /// Location of the snapshot file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the snapshot rows, serving the in-process cache while it is
    /// fresh. `None` when the file is missing, unparseable, or empty —
    /// absence is not an error, callers fall back to the live endpoints.
    pub async fn load(&self) -> Option<Arc<RestDataSet>> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Some(Arc::clone(&cached.data));
                }
            }
        }

        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        let data = Arc::new(parse_snapshot(&raw)?);

        let mut cache = self.cache.write().await;
        *cache = Some(CachedSnapshot {
            loaded_at: Instant::now(),
            data: Arc::clone(&data),
        });
        Some(data)
    }
}

/// Writes a snapshot file with a generation timestamp and the source URLs.
///
/// # Errors
///
/// Returns [`ExdataError::SnapshotWrite`] when the directory cannot be
/// created or the file cannot be written.
pub async fn write_snapshot(path: &Path, data: &RestDataSet) -> Result<(), ExdataError> {
    let payload = SnapshotPayload {
        generated_at: Utc::now().to_rfc3339(),
        source: SnapshotSources {
            rest_info: REST_INFO_URL,
            best_food: BEST_FOOD_URL,
        },
        rest_rows: &data.rest_rows,
        food_rows: &data.food_rows,
        popular_rows: &data.popular_rows,
    };

    let wrap_io = |source: std::io::Error| ExdataError::SnapshotWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(wrap_io)?;
    }
    let body = serde_json::to_string_pretty(&payload).map_err(|e| ExdataError::SnapshotWrite {
        path: path.display().to_string(),
        source: std::io::Error::other(e),
    })?;
    tokio::fs::write(path, body).await.map_err(wrap_io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_field_names() {
        let raw = serde_json::json!({
            "generatedAt": "2025-01-01T00:00:00Z",
            "restRows": [ { "svarNm": "안성휴게소", "routeNm": "경부선", "svarGsstClssCd": "0" } ],
            "foodRows": [ { "stdRestNm": "안성휴게소", "foodNm": "소떡소떡" } ]
        })
        .to_string();
        let data = parse_snapshot(&raw).expect("should parse");
        assert_eq!(data.rest_rows.len(), 1);
        assert_eq!(data.food_rows.len(), 1);
        assert!(data.popular_rows.is_empty());
    }

    #[test]
    fn parses_legacy_field_names() {
        let raw = serde_json::json!({
            "restAreas": [ { "svarNm": "금강휴게소" } ],
            "foods": [ { "stdRestNm": "금강휴게소", "foodNm": "도리뱅뱅이" } ],
            "popularRows": [ { "restName": "금강휴게소", "itemName": "우동", "rank": 2 } ]
        })
        .to_string();
        let data = parse_snapshot(&raw).expect("should parse legacy shape");
        assert_eq!(data.rest_rows[0].name, "금강휴게소");
        assert_eq!(data.popular_rows[0].rank, Some(2));
    }

    #[test]
    fn empty_snapshot_counts_as_absent() {
        assert!(parse_snapshot("{}").is_none());
        assert!(parse_snapshot(r#"{"restRows":[],"foodRows":[]}"#).is_none());
    }

    #[test]
    fn malformed_snapshot_counts_as_absent() {
        assert!(parse_snapshot("not json at all").is_none());
    }

    #[tokio::test]
    async fn store_round_trips_through_the_file() {
        let dir = std::env::temp_dir().join(format!("mukka-snapshot-{}", std::process::id()));
        let path = dir.join("rest-index.json");

        let data = RestDataSet {
            rest_rows: vec![RestAreaRow {
                name: "안성휴게소".to_string(),
                route_name: "경부고속도로".to_string(),
                class_code: "0".to_string(),
                class_name: "휴게소".to_string(),
            }],
            food_rows: vec![FoodRow {
                rest_name: "안성휴게소".to_string(),
                food_name: "소떡소떡".to_string(),
                ..FoodRow::default()
            }],
            popular_rows: vec![],
        };
        write_snapshot(&path, &data).await.expect("write should succeed");

        let store = SnapshotStore::new(&path, Duration::from_secs(300));
        let loaded = store.load().await.expect("snapshot should load");
        assert_eq!(loaded.rest_rows[0].name, "안성휴게소");
        assert_eq!(loaded.food_rows[0].food_name, "소떡소떡");

        // Second load is served from cache even if the file disappears.
        std::fs::remove_file(&path).ok();
        assert!(store.load().await.is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn store_returns_none_for_missing_file() {
        let store = SnapshotStore::new("/nonexistent/mukka/rest-index.json", Duration::ZERO);
        assert!(store.load().await.is_none());
    }
}
