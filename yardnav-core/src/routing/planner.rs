//! Route planning between yard lots and from live positions

use log::{debug, warn};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::{
    dijkstra::shortest_path,
    instructions::{InstructionConfig, InstructionStep, build_directions},
};
use crate::{
    Coordinate, DEFAULT_WALKING_SPEED, Error, Meters, YardModel,
    geometry::{format_distance, path_length},
    model::WalkNetwork,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Walking speed for ETA estimation, meters per second
    pub walking_speed_mps: f64,
    pub instructions: InstructionConfig,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            walking_speed_mps: DEFAULT_WALKING_SPEED,
            instructions: InstructionConfig::default(),
        }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.walking_speed_mps.is_finite() && self.walking_speed_mps > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidData(format!(
                "Walking speed must be a positive number, got {}",
                self.walking_speed_mps
            )))
        }
    }
}

/// A computed walking route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    #[serde(skip)]
    pub nodes: Vec<NodeIndex>,
    pub coordinates: Vec<Coordinate>,
    pub distance_m: Meters,
    pub eta_minutes: u32,
    pub steps: Vec<InstructionStep>,
    /// Path coordinate index each step takes effect at
    #[serde(skip)]
    pub step_anchors: Vec<usize>,
}

impl RoutePlan {
    /// Route along `nodes`, which must hold at least two network nodes
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeIndex` if a node is not part of the network
    pub fn from_nodes(
        network: &WalkNetwork,
        nodes: Vec<NodeIndex>,
        config: &RouteConfig,
    ) -> Result<Self, Error> {
        let coordinates = nodes
            .iter()
            .map(|&node| network.coordinate(node).ok_or(Error::InvalidNodeIndex))
            .collect::<Result<Vec<_>, _>>()?;

        let distance_m = path_length(&coordinates);
        let directions = build_directions(&coordinates, &config.instructions);

        Ok(Self {
            nodes,
            eta_minutes: eta_minutes(distance_m, config.walking_speed_mps),
            coordinates,
            distance_m,
            steps: directions.steps,
            step_anchors: directions.anchors,
        })
    }

    pub fn formatted_distance(&self) -> String {
        format_distance(self.distance_m)
    }

    pub fn formatted_eta(&self) -> String {
        format!("{} min", self.eta_minutes)
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }
}

/// Whole walking minutes, never less than one
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eta_minutes(distance: Meters, walking_speed_mps: f64) -> u32 {
    ((distance / walking_speed_mps / 60.0).round() as u32).max(1)
}

/// Route between two network nodes
///
/// `Ok(None)` when the nodes coincide or are not connected.
///
/// # Errors
///
/// Returns an error if a node index is not part of the network
pub fn plan_between_nodes(
    network: &WalkNetwork,
    start: NodeIndex,
    end: NodeIndex,
    config: &RouteConfig,
) -> Result<Option<RoutePlan>, Error> {
    if !network.contains(start) || !network.contains(end) {
        return Err(Error::InvalidNodeIndex);
    }

    let path = shortest_path(network, start, end);
    if path.len() < 2 {
        if start == end {
            warn!("Start and destination snap to the same network node - no route");
        } else {
            warn!("Destination is not reachable from the start - no route");
        }
        return Ok(None);
    }

    let plan = RoutePlan::from_nodes(network, path, config)?;
    debug!(
        "Planned route over {} nodes: {}, {}",
        plan.nodes.len(),
        plan.formatted_distance(),
        plan.formatted_eta()
    );
    Ok(Some(plan))
}

/// Route from a pickup lot to a drop lot
///
/// `Ok(None)` means no route is available: a lot is unknown, the yard has
/// no walk network, or the lots are not connected. The cause is logged.
///
/// # Errors
///
/// Returns an error only for inconsistent snapping data
pub fn plan_route(
    model: &YardModel,
    pickup_lot: &str,
    drop_lot: &str,
    config: &RouteConfig,
) -> Result<Option<RoutePlan>, Error> {
    let (Some(start), Some(end)) = (snap_lot(model, pickup_lot), snap_lot(model, drop_lot)) else {
        return Ok(None);
    };
    plan_between_nodes(model.network(), start, end, config)
}

/// Route from an arbitrary position (e.g. the walker's fix) to a drop lot
///
/// # Errors
///
/// Returns an error only for inconsistent snapping data
pub fn plan_route_from(
    model: &YardModel,
    position: Coordinate,
    drop_lot: &str,
    config: &RouteConfig,
) -> Result<Option<RoutePlan>, Error> {
    let Some((start, offset)) = model.network().nearest_node(position) else {
        warn!("Yard {} has no walk network - no route", model.meta.key);
        return Ok(None);
    };
    debug!("Position {position:?} snapped {offset:.1} m onto the walk network");

    let Some(end) = snap_lot(model, drop_lot) else {
        return Ok(None);
    };
    plan_between_nodes(model.network(), start, end, config)
}

fn snap_lot(model: &YardModel, lot_id: &str) -> Option<NodeIndex> {
    let Some(slot) = model.slot(lot_id) else {
        warn!("Lot {lot_id} not found in yard {}", model.meta.key);
        return None;
    };
    match slot.snapped {
        Some((node, offset)) => {
            debug!("Lot {lot_id} snapped {offset:.1} m onto the walk network");
            Some(node)
        }
        None => {
            warn!("Could not snap lot {lot_id} to the walk network");
            None
        }
    }
}
