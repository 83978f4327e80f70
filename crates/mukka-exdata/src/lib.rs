//! Korea Expressway Corporation open-data integration: typed paged client,
//! signature-food index, official rest-area registry, and the local snapshot
//! cache.

mod client;
mod error;
mod food_index;
mod registry;
mod snapshot;
mod types;

pub use client::ExdataClient;
pub use error::ExdataError;
pub use food_index::{build_food_index, FoodMeta};
pub use registry::{build_official_registry, OfficialRestMeta};
pub use snapshot::{write_snapshot, RestDataSet, SnapshotStore};
pub use types::{flag_set, FoodRow, PagedResponse, PopularMenuRow, RestAreaRow};
