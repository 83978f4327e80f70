//! Shared domain primitives for the mukka route planner: coordinates and
//! polyline geometry, Korean name normalization, and configuration.

mod app_config;
mod config;
pub mod geo;
pub mod normalize;
mod policy;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    distance_meters, nearest_path_point, resample_by_distance, resample_by_stride, Coordinate,
    NearestPathPoint,
};
pub use normalize::{normalize_rest_name, normalize_route_name};
pub use policy::MatcherPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
