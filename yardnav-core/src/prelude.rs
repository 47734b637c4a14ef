pub use crate::{DEFAULT_PRE_ALERT_DISTANCE, DEFAULT_SAMPLING_INTERVAL, DEFAULT_WALKING_SPEED};

// Re-export key components
pub use crate::geometry::{CompassDirection, Coordinate, format_distance, haversine};
pub use crate::loading::{YardCatalog, YardConfig, create_yard_model};
pub use crate::model::{NetworkConfig, Region, Slot, SlotIndex, WalkNetwork, YardMeta, YardModel};
pub use crate::navigation::{
    Announcer, CameraFollow, CameraSink, FixDispatcher, FixSubscriber, InstructionSink, NavigationEvent,
    NavigationTracker, PositionFix, TrackerConfig,
};
pub use crate::routing::{
    InstructionConfig, InstructionStep, Maneuver, RouteConfig, RoutePlan, StepKind,
    build_instructions, plan_route, plan_route_from, shortest_path,
};

pub use crate::Error;
pub use crate::Meters;
