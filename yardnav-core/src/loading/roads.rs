//! Road geometry processing: resamples every road segment into a dense walk
//! network.

use geojson::FeatureCollection;
use itertools::Itertools;
use log::{debug, info, trace, warn};

use super::geometry_kind;
use crate::{
    Error, Meters,
    geometry::{Coordinate, haversine, interpolate},
    model::{NetworkConfig, WalkNetwork},
};

/// Build a walk network from road line features
///
/// `LineString` and `MultiLineString` features are resampled; any other
/// geometry kind is skipped with a warning.
///
/// # Errors
///
/// Returns an error if the sampling interval is not a positive number.
pub(crate) fn build_walk_network(
    roads: &FeatureCollection,
    config: &NetworkConfig,
) -> Result<WalkNetwork, Error> {
    config.validate()?;

    let mut network = WalkNetwork::default();
    let mut skipped = 0usize;

    for (feature_idx, feature) in roads.features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            warn!("Road feature {feature_idx} has no geometry - skipping");
            skipped += 1;
            continue;
        };

        let geometry = match geo::Geometry::<f64>::try_from(geometry.clone()) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!("Road feature {feature_idx} has unreadable geometry ({e}) - skipping");
                skipped += 1;
                continue;
            }
        };

        match geometry {
            geo::Geometry::LineString(line) => {
                add_line(&mut network, &line, config.sampling_interval_m);
            }
            geo::Geometry::MultiLineString(lines) => {
                for line in &lines {
                    add_line(&mut network, line, config.sampling_interval_m);
                }
            }
            other => {
                warn!(
                    "Unsupported road geometry type {} in feature {feature_idx} - skipping",
                    geometry_kind(&other)
                );
                skipped += 1;
            }
        }
    }

    network.build_rtree();

    let stats = network.stats();
    info!(
        "Built walk network with {} nodes, {} edges, {:.0} m of walkable road ({} features skipped)",
        stats.nodes, stats.edges, stats.total_length_m, skipped
    );

    if stats.nodes > 0 {
        let components = network.connected_components();
        if components > 1 {
            warn!(
                "Walk network is split into {components} disconnected components. \
                Slots on different components cannot be routed between."
            );
        }
    }

    Ok(network)
}

fn add_line(network: &mut WalkNetwork, line: &geo::LineString<f64>, interval: Meters) {
    for (start, end) in line
        .coords()
        .copied()
        .map(Coordinate::from)
        .tuple_windows()
    {
        add_segment(network, start, end, interval);
    }
}

/// Resamples one segment into `ceil(length / interval) + 1` evenly spaced
/// points and links consecutive samples. Both endpoints are kept exact so
/// that adjacent segments share their nodes.
fn add_segment(network: &mut WalkNetwork, start: Coordinate, end: Coordinate, interval: Meters) {
    if !start.is_finite() || !end.is_finite() {
        debug!("Skipping road segment with non-finite vertex {start:?} -> {end:?}");
        return;
    }

    let length = haversine(start, end);
    if length <= 0.0 {
        trace!("Skipping zero-length road segment at {start:?}");
        return;
    }

    let steps = sample_count(length, interval);
    let samples = (0..=steps).map(|step| match step {
        0 => start,
        step if step == steps => end,
        step => interpolate(start, end, step as f64 / steps as f64),
    });

    for (a, b) in samples.tuple_windows() {
        let a_idx = network.add_node(a);
        let b_idx = network.add_node(b);
        if a_idx != b_idx {
            network.add_edge(a_idx, b_idx, haversine(a, b));
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_count(length: Meters, interval: Meters) -> usize {
    ((length / interval).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use geojson::{Feature, Geometry, Value};

    use super::*;

    fn feature(value: Value) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn line(coords: &[(f64, f64)]) -> Value {
        Value::from(&geo::LineString::from(coords.to_vec()))
    }

    #[test]
    fn segment_is_resampled_at_interval() {
        // ~22.2 m along the equator: ceil(22.2 / 5) = 5 steps -> 6 samples
        let roads = collection(vec![feature(line(&[(0.0, 0.0), (0.0002, 0.0)]))]);
        let network = build_walk_network(&roads, &NetworkConfig::default()).unwrap();

        assert_eq!(network.node_count(), 6);
        assert_eq!(network.edge_count(), 5);
        let total: f64 = network.edges().map(|(_, _, w)| w).sum();
        let direct = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0002));
        assert!((total - direct).abs() < 1e-6);
        for (_, _, w) in network.edges() {
            assert!(w <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn adjacent_segments_share_their_vertex() {
        let roads = collection(vec![feature(line(&[
            (0.0, 0.0),
            (0.0001, 0.0),
            (0.0001, 0.0001),
        ]))]);
        let network = build_walk_network(&roads, &NetworkConfig::default()).unwrap();

        let corner = network.node_at(Coordinate::new(0.0, 0.0001)).unwrap();
        assert_eq!(network.neighbors(corner).count(), 2);
        assert_eq!(network.connected_components(), 1);
    }

    #[test]
    fn multi_line_features_are_decomposed() {
        let lines = geo::MultiLineString::new(vec![
            geo::LineString::from(vec![(0.0, 0.0), (0.0001, 0.0)]),
            geo::LineString::from(vec![(1.0, 1.0), (1.0001, 1.0)]),
        ]);
        let roads = collection(vec![feature(Value::from(&lines))]);
        let network = build_walk_network(&roads, &NetworkConfig::default()).unwrap();

        assert_eq!(network.connected_components(), 2);
    }

    #[test]
    fn unsupported_geometry_is_skipped() {
        let roads = collection(vec![
            feature(Value::from(&geo::Point::new(0.0, 0.0))),
            Feature {
                bbox: None,
                geometry: None,
                id: None,
                properties: None,
                foreign_members: None,
            },
            feature(line(&[(0.0, 0.0), (0.0001, 0.0)])),
        ]);
        let network = build_walk_network(&roads, &NetworkConfig::default()).unwrap();

        assert!(network.node_count() >= 2);
        assert_eq!(network.connected_components(), 1);
    }

    #[test]
    fn repeated_vertices_do_not_create_self_loops() {
        let roads = collection(vec![feature(line(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (0.0001, 0.0),
        ]))]);
        let network = build_walk_network(&roads, &NetworkConfig::default()).unwrap();

        for (a, b, _) in network.edges() {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn empty_collection_builds_an_empty_network() {
        let network = build_walk_network(&collection(Vec::new()), &NetworkConfig::default()).unwrap();
        assert!(network.is_empty());
    }

    #[test]
    fn sample_count_rounds_up() {
        assert_eq!(sample_count(0.1, 5.0), 1);
        assert_eq!(sample_count(5.0, 5.0), 1);
        assert_eq!(sample_count(5.01, 5.0), 2);
        assert_eq!(sample_count(22.2, 5.0), 5);
    }
}
