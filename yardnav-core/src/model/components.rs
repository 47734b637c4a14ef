//! Walk network components - nodes and edges

use crate::{Coordinate, Meters};

/// Walk network node, one per distinct sampled coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkNode {
    pub position: Coordinate,
}

/// Walk network edge between two consecutive samples of a road segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkEdge {
    /// Great-circle length in meters
    pub length: Meters,
}

impl WalkEdge {
    pub fn length(&self) -> Meters {
        self.length
    }
}
