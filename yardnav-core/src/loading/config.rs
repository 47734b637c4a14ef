use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{Region, YardMeta};

/// Where to find one yard's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YardConfig {
    /// Lookup key, e.g. `yard1`
    pub key: String,
    /// Display name
    pub name: String,
    /// Road network GeoJSON (`LineString` / `MultiLineString` features)
    pub roads: PathBuf,
    /// Slot GeoJSON (`Point` / `Polygon` / `MultiPolygon` features with
    /// `Slot_Id` and `lot_id` properties)
    pub slots: PathBuf,
    /// Viewport shown when the yard is opened
    #[serde(default)]
    pub initial_region: Option<Region>,
}

impl YardConfig {
    pub fn meta(&self) -> YardMeta {
        YardMeta {
            key: self.key.clone(),
            name: self.name.clone(),
            initial_region: self.initial_region,
        }
    }
}
