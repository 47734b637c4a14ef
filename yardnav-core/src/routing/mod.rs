//! Path planning and turn-by-turn directions over the walk network

pub mod dijkstra;
pub mod instructions;
pub mod planner;
mod to_geojson;

pub use dijkstra::{path_weight, shortest_path};
pub use instructions::{
    Directions, InstructionConfig, InstructionStep, Maneuver, StepKind, build_directions,
    build_instructions,
};
pub use planner::{
    RouteConfig, RoutePlan, eta_minutes, plan_between_nodes, plan_route, plan_route_from,
};
