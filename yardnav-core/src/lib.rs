//! Pedestrian wayfinding over a pre-mapped yard.
//!
//! The crate turns raw road geometry into a densely sampled walk network,
//! snaps slot centroids and live position fixes onto it, plans shortest
//! paths, synthesizes turn-by-turn instructions and tracks a walker's
//! progress along an active route.

pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use geometry::Coordinate;
pub use loading::{YardCatalog, YardConfig, create_yard_model};
pub use model::{WalkNetwork, YardModel};
pub use routing::{RoutePlan, plan_route, plan_route_from};

/// Distance along the walk network, meters
pub type Meters = f64;

/// Default spacing between resampled road points, meters
pub const DEFAULT_SAMPLING_INTERVAL: Meters = 5.0;

/// Smallest accepted resampling spacing, meters
pub const MIN_SAMPLING_INTERVAL: Meters = 0.1;

/// Default pedestrian speed used for ETA estimation, meters per second
pub const DEFAULT_WALKING_SPEED: f64 = 1.4;

/// Default distance at which an upcoming turn is pre-announced, meters
pub const DEFAULT_PRE_ALERT_DISTANCE: Meters = 50.0;
