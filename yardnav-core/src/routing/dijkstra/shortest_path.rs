use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use log::trace;
use petgraph::graph::NodeIndex;

use super::state::State;
use crate::{Meters, model::WalkNetwork};

/// Dijkstra's algorithm for the shortest walking path between two nodes
///
/// Returns the node sequence from `start` to `end`. The result is
/// degenerate when no route exists: empty if either node is not part of
/// the network, `[start]` when both are the same node and `[end]` when
/// `end` is unreachable. Anything shorter than two nodes is "no route".
pub fn shortest_path(network: &WalkNetwork, start: NodeIndex, end: NodeIndex) -> Vec<NodeIndex> {
    if !network.contains(start) || !network.contains(end) {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }

    let node_count = network.node_count();
    let mut distances: Vec<Meters> = vec![Meters::INFINITY; node_count];
    let mut predecessors: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut visited = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    distances[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        // Stale heap entry, the node was settled through a cheaper path
        if visited.contains(node.index()) {
            continue;
        }
        if node == end {
            break;
        }
        visited.insert(node.index());

        for (next, length) in network.neighbors(node) {
            if visited.contains(next.index()) {
                continue;
            }
            let next_cost = cost + length;
            if next_cost < distances[next.index()] {
                distances[next.index()] = next_cost;
                predecessors[next.index()] = Some(node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    trace!(
        "Dijkstra settled {} of {} nodes, {:.1} m to target",
        visited.count_ones(..),
        node_count,
        distances[end.index()]
    );

    reconstruct_path(&predecessors, start, end)
}

/// Follow predecessors backward from `end`, then reverse
fn reconstruct_path(
    predecessors: &[Option<NodeIndex>],
    start: NodeIndex,
    end: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match predecessors[current.index()] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Total edge length along `path`, `None` if two consecutive nodes are not
/// connected
pub fn path_weight(network: &WalkNetwork, path: &[NodeIndex]) -> Option<Meters> {
    path.windows(2)
        .map(|pair| network.edge_length(pair[0], pair[1]))
        .sum()
}
