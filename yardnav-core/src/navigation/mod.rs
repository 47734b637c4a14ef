//! Live navigation: progress tracking along an active route and the
//! collaborators that consume its output.

mod dispatch;
mod session;
mod tracker;

pub use dispatch::{Announcer, CameraFollow, FixDispatcher, FixSubscriber};
pub use tracker::NavigationTracker;

use serde::{Deserialize, Serialize};

use crate::{Coordinate, DEFAULT_PRE_ALERT_DISTANCE, Meters, routing::RouteConfig};

pub const ARRIVED_TEXT: &str = "You have arrived at your destination";
pub const ENDED_TEXT: &str = "Navigation ended";
pub const UNAVAILABLE_TEXT: &str = "Route not available";

/// One position report from the location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub position: Coordinate,
    /// Degrees clockwise from north, if the provider reports one
    #[serde(default)]
    pub heading: Option<f64>,
}

impl PositionFix {
    pub fn new(position: Coordinate, heading: Option<f64>) -> Self {
        Self { position, heading }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance at which an upcoming turn is announced ahead of time
    pub pre_alert_distance_m: Meters,
    pub route: RouteConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pre_alert_distance_m: DEFAULT_PRE_ALERT_DISTANCE,
            route: RouteConfig::default(),
        }
    }
}

/// Side effects of the tracker, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// A session started; carries the first instruction
    Started { text: String },
    /// No route could be planned; the tracker stays idle
    RouteUnavailable { text: String },
    /// The walker reached a turn step
    Instruction { step_index: usize, text: String },
    /// An upcoming turn is within the pre-alert distance
    PreAlert {
        step_index: usize,
        distance_m: Meters,
        text: String,
    },
    /// The walker reached the destination; the session is over
    Arrived { text: String },
    /// The session was stopped explicitly
    Ended { text: String },
}

impl NavigationEvent {
    /// Text for the speech collaborator
    pub fn text(&self) -> &str {
        match self {
            NavigationEvent::Started { text }
            | NavigationEvent::RouteUnavailable { text }
            | NavigationEvent::Instruction { text, .. }
            | NavigationEvent::PreAlert { text, .. }
            | NavigationEvent::Arrived { text }
            | NavigationEvent::Ended { text } => text,
        }
    }
}

/// Text-to-speech collaborator
pub trait InstructionSink {
    fn speak(&mut self, text: &str);
}

/// Map camera collaborator following the walker
pub trait CameraSink {
    fn follow(&mut self, position: Coordinate, heading: Option<f64>);
}

