#![allow(dead_code)]

use geojson::{FeatureCollection, GeoJson};
use serde_json::{Value, json};
use yardnav_core::{
    YardModel,
    model::{NetworkConfig, YardMeta},
};

/// Sampling interval large enough that no segment gets resampled
pub const NO_RESAMPLING: NetworkConfig = NetworkConfig {
    sampling_interval_m: 1.0e7,
};

pub fn collection(value: Value) -> FeatureCollection {
    let geojson = serde_json::from_value::<GeoJson>(value).unwrap();
    FeatureCollection::try_from(geojson).unwrap()
}

/// Road collection with one `LineString` per entry, coordinates as `(lon, lat)`
pub fn roads(lines: &[&[(f64, f64)]]) -> FeatureCollection {
    let features: Vec<Value> = lines
        .iter()
        .map(|line| {
            let coordinates: Vec<[f64; 2]> = line.iter().map(|&(lon, lat)| [lon, lat]).collect();
            json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": {}
            })
        })
        .collect();
    collection(json!({ "type": "FeatureCollection", "features": features }))
}

/// Point slots as `(slot_id, lot_id, lon, lat)`
pub fn slots(points: &[(&str, &str, f64, f64)]) -> FeatureCollection {
    let features: Vec<Value> = points
        .iter()
        .map(|&(slot_id, lot_id, lon, lat)| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [lon, lat] },
                "properties": { "Slot_Id": slot_id, "lot_id": lot_id }
            })
        })
        .collect();
    collection(json!({ "type": "FeatureCollection", "features": features }))
}

pub fn meta(key: &str) -> YardMeta {
    YardMeta {
        key: key.to_string(),
        name: format!("Yard {key}"),
        initial_region: None,
    }
}

pub fn yard(
    roads: &FeatureCollection,
    slots: &FeatureCollection,
    config: &NetworkConfig,
) -> YardModel {
    YardModel::from_geojson(meta("test"), roads, slots, config).unwrap()
}

/// ~111 m north along the prime meridian, then ~111 m east
pub fn bent_yard() -> YardModel {
    yard(
        &roads(&[&[(0.0, 0.0), (0.0, 0.001), (0.001, 0.001)]]),
        &slots(&[
            ("A", "A-1", 0.0, 0.0),
            ("B", "B-1", 0.001, 0.001),
            ("B", "B-2", 0.0005, 0.0011),
        ]),
        &NetworkConfig::default(),
    )
}

/// Deterministic pseudo random sequence in `[0, 1)`
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}
