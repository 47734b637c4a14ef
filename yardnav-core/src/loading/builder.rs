use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use log::info;
use rayon::prelude::*;

use super::{catalog::YardCatalog, config::YardConfig};
use crate::{Error, YardModel, model::NetworkConfig};

/// Creates a yard model from its road and slot GeoJSON files
///
/// # Errors
///
/// Returns an error if a file is missing or is not a GeoJSON feature
/// collection
pub fn create_yard_model(
    config: &YardConfig,
    network_config: &NetworkConfig,
) -> Result<YardModel, Error> {
    validate_config(config)?;

    info!(
        "Processing road data for yard {}: {}",
        config.key,
        config.roads.display()
    );
    let roads = read_feature_collection(&config.roads)?;

    info!(
        "Processing slot data for yard {}: {}",
        config.key,
        config.slots.display()
    );
    let slots = read_feature_collection(&config.slots)?;

    let model = YardModel::from_geojson(config.meta(), &roads, &slots, network_config)?;
    info!("Yard model {} created successfully", config.key);
    Ok(model)
}

/// Loads every configured yard in parallel and assembles the catalog
///
/// # Errors
///
/// Returns the first yard loading error, or a catalog error if the yard
/// list is empty, has duplicate keys or does not contain `default_key`
pub fn load_catalog(
    configs: &[YardConfig],
    default_key: Option<&str>,
    network_config: &NetworkConfig,
) -> Result<YardCatalog, Error> {
    let yards = configs
        .par_iter()
        .map(|config| create_yard_model(config, network_config))
        .collect::<Result<Vec<_>, _>>()?;

    YardCatalog::new(yards, default_key)
}

/// Reads a GeoJSON file that must hold a `FeatureCollection`
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    let geojson: GeoJson = text.parse()?;
    Ok(FeatureCollection::try_from(geojson)?)
}

fn validate_config(config: &YardConfig) -> Result<(), Error> {
    if config.key.trim().is_empty() {
        return Err(Error::InvalidData("Yard key must not be empty".to_string()));
    }

    for (kind, path) in [("Road", &config.roads), ("Slot", &config.slots)] {
        if !path.exists() {
            return Err(Error::InvalidData(format!(
                "{kind} file for yard {} not found: {}",
                config.key,
                path.display()
            )));
        }
    }

    Ok(())
}
