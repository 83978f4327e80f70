//! Route planning with rest-area recommendations.
//!
//! Pipeline: directions candidates → probe-driven rest-area matching against
//! the official registry → signature-dish decoration → cross-route
//! consolidation onto the primary polyline.

mod candidates;
mod error;
mod matcher;
mod merger;
mod pipeline;
mod stop;

pub use candidates::{fetch_route_candidates, RouteCandidate};
pub use error::PlanError;
pub use matcher::{find_food_meta, find_official_key, find_stops_along_path, looks_like_rest_area, shares_route_hint};
pub use merger::{pick_primary, unify_stops, EvaluatedRoute};
pub use pipeline::{grounding_sources, RoutePlanner};
pub use stop::{GroundingSource, RouteOption, SearchLinks, Stop, StopKind};
