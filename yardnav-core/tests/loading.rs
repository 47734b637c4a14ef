use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::json;
use yardnav_core::{
    Error, YardConfig,
    loading::{create_yard_model, load_catalog, read_feature_collection},
    model::NetworkConfig,
};

/// Scratch directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("yardnav-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_yard(dir: &Path, key: &str) -> YardConfig {
    let roads = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 0.001]] },
            "properties": { "name": "Main aisle" }
        }]
    });
    let slots = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [0.0001, 0.0], [0.0002, 0.0], [0.0002, 0.0001], [0.0001, 0.0001], [0.0001, 0.0]
                    ]]
                },
                "properties": { "Slot_Id": "A", "lot_id": "A-1" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [0.0001, 0.001] },
                "properties": { "Slot_Id": "B", "lot_id": "B-1" }
            }
        ]
    });

    let roads_path = dir.join(format!("{key}-roads.geojson"));
    let slots_path = dir.join(format!("{key}-slots.geojson"));
    fs::write(&roads_path, roads.to_string()).unwrap();
    fs::write(&slots_path, slots.to_string()).unwrap();

    YardConfig {
        key: key.to_string(),
        name: format!("Yard {key}"),
        roads: roads_path,
        slots: slots_path,
        initial_region: None,
    }
}

#[test]
fn yard_model_loads_from_disk() {
    let dir = scratch_dir("load");
    let config = write_yard(&dir, "yard1");

    let model = create_yard_model(&config, &NetworkConfig::default()).unwrap();
    assert_eq!(model.meta.key, "yard1");
    assert_eq!(model.slots().len(), 2);
    assert!(model.snapped_lot("A-1").is_some());
    assert!(model.network().node_count() > 2);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_file_is_invalid_data() {
    let dir = scratch_dir("missing");
    let mut config = write_yard(&dir, "yard1");
    config.slots = dir.join("does-not-exist.geojson");

    let result = create_yard_model(&config, &NetworkConfig::default());
    assert!(matches!(result, Err(Error::InvalidData(_))));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn non_collection_geojson_is_rejected() {
    let dir = scratch_dir("geometry");
    let path = dir.join("point.geojson");
    fs::write(&path, json!({ "type": "Point", "coordinates": [0.0, 0.0] }).to_string()).unwrap();
    assert!(matches!(read_feature_collection(&path), Err(Error::GeoJson(_))));

    fs::write(&path, "not json").unwrap();
    assert!(matches!(read_feature_collection(&path), Err(Error::GeoJson(_))));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn catalog_loads_every_yard_and_honours_the_default() {
    let dir = scratch_dir("catalog");
    let configs = vec![write_yard(&dir, "yard1"), write_yard(&dir, "yard2")];

    let catalog = load_catalog(&configs, Some("yard2"), &NetworkConfig::default()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.default_yard().meta.key, "yard2");
    assert_eq!(catalog.get_or_default(Some("yard1")).meta.key, "yard1");
    assert_eq!(catalog.get_or_default(Some("nope")).meta.key, "yard2");

    assert!(load_catalog(&configs, Some("yard3"), &NetworkConfig::default()).is_err());
    assert!(load_catalog(&[], None, &NetworkConfig::default()).is_err());

    fs::remove_dir_all(dir).ok();
}
