//! Walk network: a node arena over deduplicated coordinates, an undirected
//! adjacency graph weighted in meters and a spatial index for snapping.

use geojson::FeatureCollection;
use hashbrown::HashMap;
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};
use serde::{Deserialize, Serialize};

use super::components::{WalkEdge, WalkNode};
use crate::{
    DEFAULT_SAMPLING_INTERVAL, Error, MIN_SAMPLING_INTERVAL, Meters,
    geometry::{Coordinate, haversine},
    loading::roads::build_walk_network,
};

/// Network node position on the unit sphere, tagged with its index
pub type IndexedPoint = GeomWithData<[f64; 3], NodeIndex>;

/// Parameters for turning road geometry into a walk network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Maximum spacing between resampled points, meters
    pub sampling_interval_m: Meters,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            sampling_interval_m: DEFAULT_SAMPLING_INTERVAL,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.sampling_interval_m.is_finite()
            && self.sampling_interval_m >= MIN_SAMPLING_INTERVAL
        {
            Ok(())
        } else {
            Err(Error::InvalidData(format!(
                "Sampling interval must be at least {MIN_SAMPLING_INTERVAL} m, got {}",
                self.sampling_interval_m
            )))
        }
    }
}

/// Exact bit pattern of a coordinate, used to collapse coinciding samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey(u64, u64);

impl From<Coordinate> for NodeKey {
    fn from(coordinate: Coordinate) -> Self {
        // Adding 0.0 folds -0.0 into 0.0
        NodeKey(
            (coordinate.lat + 0.0).to_bits(),
            (coordinate.lon + 0.0).to_bits(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub total_length_m: Meters,
}

#[derive(Debug, Clone)]
pub struct WalkNetwork {
    pub(crate) graph: UnGraph<WalkNode, WalkEdge>,
    node_lookup: HashMap<NodeKey, NodeIndex>,
    rtree: RTree<IndexedPoint>,
}

impl Default for WalkNetwork {
    fn default() -> Self {
        Self {
            graph: UnGraph::default(),
            node_lookup: HashMap::new(),
            rtree: RTree::new(),
        }
    }
}

impl WalkNetwork {
    /// Build a fresh network from road line features
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid. Unsupported
    /// features are skipped, not reported as errors.
    pub fn from_roads(roads: &FeatureCollection, config: &NetworkConfig) -> Result<Self, Error> {
        build_walk_network(roads, config)
    }

    /// Returns the node at `position`, inserting it on first sight
    pub(crate) fn add_node(&mut self, position: Coordinate) -> NodeIndex {
        *self
            .node_lookup
            .entry(NodeKey::from(position))
            .or_insert_with(|| self.graph.add_node(WalkNode { position }))
    }

    /// Inserts or updates the undirected edge between `a` and `b`
    pub(crate) fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, length: Meters) {
        self.graph.update_edge(a, b, WalkEdge { length });
    }

    /// Rebuilds the spatial index; must be called once all nodes are in
    pub(crate) fn build_rtree(&mut self) {
        let points = self
            .graph
            .node_indices()
            .map(|idx| GeomWithData::new(self.graph[idx].position.to_unit_vector(), idx))
            .collect();
        self.rtree = RTree::bulk_load(points);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        node.index() < self.graph.node_count()
    }

    pub fn coordinate(&self, node: NodeIndex) -> Option<Coordinate> {
        self.graph.node_weight(node).map(|n| n.position)
    }

    /// Node whose coordinate is exactly `position`
    pub fn node_at(&self, position: Coordinate) -> Option<NodeIndex> {
        self.node_lookup.get(&NodeKey::from(position)).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, Coordinate)> + '_ {
        self.graph
            .node_indices()
            .map(|idx| (idx, self.graph[idx].position))
    }

    /// Neighbours of `node` with the connecting edge length
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, Meters)> + '_ {
        self.graph.edges(node).map(move |edge| {
            let other = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (other, edge.weight().length)
        })
    }

    pub fn edge_length(&self, a: NodeIndex, b: NodeIndex) -> Option<Meters> {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(WalkEdge::length)
    }

    /// All edges as `(a, b, length)` with `a` the endpoint inserted first
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, Meters)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight().length))
    }

    /// Nearest network node to `position` by great-circle distance,
    /// with that distance in meters. `None` only for an empty network.
    pub fn nearest_node(&self, position: Coordinate) -> Option<(NodeIndex, Meters)> {
        let nearest = self.rtree.nearest_neighbor(&position.to_unit_vector())?;
        let node = nearest.data;
        self.coordinate(node)
            .map(|coordinate| (node, haversine(position, coordinate)))
    }

    /// Full scan equivalent of [`WalkNetwork::nearest_node`]
    pub fn nearest_node_linear(&self, position: Coordinate) -> Option<(NodeIndex, Meters)> {
        self.nodes()
            .map(|(idx, coordinate)| (idx, haversine(position, coordinate)))
            .fold(None, |best, candidate| match best {
                Some((_, best_distance)) if best_distance <= candidate.1 => best,
                _ => Some(candidate),
            })
    }

    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            total_length_m: self.graph.edge_weights().map(WalkEdge::length).sum(),
        }
    }
}
