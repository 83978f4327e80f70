//! Great-circle geometry over route polylines.
//!
//! Paths arrive from the directions provider with points clustered in curves,
//! so probe sampling uses cumulative distance rather than index stride.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Closest path vertex to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPathPoint {
    /// Position along the path, ascending in the direction of travel.
    pub index: usize,
    /// Great-circle distance from the query point to that vertex, meters.
    pub distance_m: f64,
}

/// Haversine great-circle distance in meters.
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let x = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * x.sqrt().atan2((1.0 - x).sqrt())
}

/// Downsamples a path by index stride, keeping every `ceil(len / max_points)`-th
/// vertex. The first vertex always survives; the last is re-appended if the
/// stride dropped it, so the output has at most `max_points + 1` vertices.
#[must_use]
pub fn resample_by_stride(path: &[Coordinate], max_points: usize) -> Vec<Coordinate> {
    if max_points == 0 || path.len() <= max_points {
        return path.to_vec();
    }
    let step = path.len().div_ceil(max_points);
    let mut sampled: Vec<Coordinate> = path.iter().step_by(step).copied().collect();
    let last = path[path.len() - 1];
    if sampled.last() != Some(&last) {
        sampled.push(last);
    }
    sampled
}

/// Picks `count` vertices roughly evenly spaced by cumulative travel distance.
///
/// For each `i` in `[0, count)` the first vertex whose cumulative distance
/// reaches `i / (count - 1)` of the total is taken, so output spacing stays
/// even where the provider clusters vertices in curves. First and last vertex
/// of the input are always preserved. A zero-length path (all points
/// coincident) degenerates to the leading `count` vertices.
#[must_use]
pub fn resample_by_distance(path: &[Coordinate], count: usize) -> Vec<Coordinate> {
    if count == 0 {
        return Vec::new();
    }
    if path.len() <= count {
        return path.to_vec();
    }

    let mut cumulative = Vec::with_capacity(path.len());
    cumulative.push(0.0_f64);
    for i in 1..path.len() {
        cumulative.push(cumulative[i - 1] + distance_meters(path[i - 1], path[i]));
    }
    let total = cumulative[cumulative.len() - 1];
    if total == 0.0 {
        return path[..count].to_vec();
    }

    #[allow(clippy::cast_precision_loss)]
    let denom = (count - 1) as f64;
    let mut result = Vec::with_capacity(count);
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let target = total * i as f64 / denom;
        let idx = cumulative
            .iter()
            .position(|&d| d >= target)
            .unwrap_or(cumulative.len() - 1);
        result.push(path[idx]);
    }
    result
}

/// Linear scan for the path vertex closest to `point`.
///
/// O(len); acceptable because paths are pre-resampled to a few hundred
/// vertices. Returns `None` for an empty path.
#[must_use]
pub fn nearest_path_point(point: Coordinate, path: &[Coordinate]) -> Option<NearestPathPoint> {
    let mut best: Option<NearestPathPoint> = None;
    for (index, vertex) in path.iter().enumerate() {
        let distance_m = distance_meters(point, *vertex);
        if best.is_none_or(|b| distance_m < b.distance_m) {
            best = Some(NearestPathPoint { index, distance_m });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    const SEOUL: Coordinate = Coordinate {
        lat: 37.5665,
        lng: 126.9780,
    };
    const BUSAN: Coordinate = Coordinate {
        lat: 35.1796,
        lng: 129.0756,
    };

    #[test]
    fn distance_zero_for_identical_points() {
        assert_eq!(distance_meters(SEOUL, SEOUL), 0.0);
    }

    #[test]
    fn distance_seoul_busan_is_about_325_km() {
        let d = distance_meters(SEOUL, BUSAN);
        assert!((300_000.0..350_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_meters(SEOUL, BUSAN);
        let ba = distance_meters(BUSAN, SEOUL);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn stride_resample_returns_short_paths_unchanged() {
        let path: Vec<_> = (0..5).map(|i| coord(f64::from(i), 0.0)).collect();
        assert_eq!(resample_by_stride(&path, 10), path);
    }

    #[test]
    fn stride_resample_keeps_endpoints_and_bounds_length() {
        let path: Vec<_> = (0..1000).map(|i| coord(f64::from(i) * 0.01, 0.0)).collect();
        let sampled = resample_by_stride(&path, 280);
        assert!(sampled.len() <= 281, "got {}", sampled.len());
        assert_eq!(sampled[0], path[0]);
        assert_eq!(*sampled.last().unwrap(), *path.last().unwrap());
    }

    #[test]
    fn distance_resample_keeps_endpoints() {
        let path: Vec<_> = (0..100).map(|i| coord(37.0 + f64::from(i) * 0.01, 127.0)).collect();
        let sampled = resample_by_distance(&path, 16);
        assert_eq!(sampled.len(), 16);
        assert_eq!(sampled[0], path[0]);
        assert_eq!(*sampled.last().unwrap(), *path.last().unwrap());
    }

    #[test]
    fn distance_resample_evens_out_clustered_vertices() {
        // Dense cluster at the start, then a long sparse tail.
        let mut path: Vec<_> = (0..50).map(|i| coord(37.0 + f64::from(i) * 0.0001, 127.0)).collect();
        path.extend((1..=5).map(|i| coord(37.005 + f64::from(i) * 0.5, 127.0)));
        let sampled = resample_by_distance(&path, 6);
        // Most picks must land in the sparse tail, not the cluster.
        let in_tail = sampled.iter().filter(|c| c.lat > 37.01).count();
        assert!(in_tail >= 4, "got {in_tail} tail picks: {sampled:?}");
    }

    #[test]
    fn distance_resample_degenerates_when_total_is_zero() {
        let path = vec![SEOUL; 10];
        let sampled = resample_by_distance(&path, 4);
        assert_eq!(sampled, vec![SEOUL; 4]);
    }

    #[test]
    fn distance_resample_length_bound() {
        let path: Vec<_> = (0..40).map(|i| coord(f64::from(i) * 0.1, 0.0)).collect();
        for n in [1, 2, 8, 39, 40, 100] {
            let sampled = resample_by_distance(&path, n);
            assert!(sampled.len() <= n.max(path.len()));
        }
    }

    #[test]
    fn nearest_path_point_picks_closest_vertex() {
        let path = vec![coord(37.0, 127.0), coord(37.5, 127.0), coord(38.0, 127.0)];
        let hit = nearest_path_point(coord(37.49, 127.01), &path).unwrap();
        assert_eq!(hit.index, 1);
        assert!(hit.distance_m < 2_000.0);
    }

    #[test]
    fn nearest_path_point_empty_path() {
        assert_eq!(nearest_path_point(SEOUL, &[]), None);
    }
}
