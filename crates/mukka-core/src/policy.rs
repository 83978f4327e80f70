//! Matching policy knobs.
//!
//! The handler history carried several near-duplicate matching passes that
//! differed only in thresholds (merge-fallback gating, probe density, output
//! caps). Those differences live here as one explicit configuration struct so
//! there is a single pipeline with tunable behavior instead of parallel code
//! paths.

/// Tunables for the stop matcher and cross-route merger.
#[derive(Debug, Clone)]
pub struct MatcherPolicy {
    /// Keyword queries issued at every probe point.
    pub search_queries: Vec<String>,
    /// Place-search radius around each probe point, meters.
    pub search_radius_m: u32,
    /// Documents requested per place-search call.
    pub search_page_size: u8,
    /// Strict tier: route hint must overlap AND distance-to-path stays under
    /// this bound, meters.
    pub strict_distance_m: f64,
    /// Relaxed tier: distance-to-path bound with no route-hint requirement,
    /// meters. Candidates beyond this are discarded outright.
    pub relaxed_distance_m: f64,
    /// Probe points used when the raw path is longer than
    /// `dense_path_threshold`.
    pub dense_probe_count: usize,
    /// Probe points used for shorter paths.
    pub sparse_probe_count: usize,
    /// Raw-path vertex count above which the dense probe count applies.
    pub dense_path_threshold: usize,
    /// Stride-resampling cap applied to the extracted route polyline.
    pub max_path_points: usize,
    /// When set, relaxed-tier fallback is only allowed once at least this
    /// many strict-tier winners exist; below the gate both tiers merge
    /// unconditionally. `None` keeps the per-key fallback always on.
    pub min_strict_for_relaxed: Option<usize>,
    /// When set, the final stop list is truncated to this many entries after
    /// path-order sorting.
    pub max_stops: Option<usize>,
    /// Consolidate all route candidates into one merged route option. When
    /// false, each surviving candidate is returned as its own option.
    pub consolidate: bool,
}

impl Default for MatcherPolicy {
    fn default() -> Self {
        Self {
            search_queries: vec!["휴게소".to_string(), "고속도로 휴게소".to_string()],
            search_radius_m: 12_000,
            search_page_size: 15,
            strict_distance_m: 3_500.0,
            relaxed_distance_m: 8_000.0,
            dense_probe_count: 22,
            sparse_probe_count: 16,
            dense_path_threshold: 220,
            max_path_points: 280,
            min_strict_for_relaxed: None,
            max_stops: None,
            consolidate: true,
        }
    }
}

impl MatcherPolicy {
    /// Probe-point count for a raw path of `raw_len` vertices. Longer routes
    /// get denser probing.
    #[must_use]
    pub fn probe_count(&self, raw_len: usize) -> usize {
        if raw_len > self.dense_path_threshold {
            self.dense_probe_count
        } else {
            self.sparse_probe_count
        }
    }
}
