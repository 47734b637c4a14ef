//! Slot dataset processing

use geo::Centroid;
use geojson::{Feature, FeatureCollection};
use log::{info, warn};
use serde_json::Value as JsonValue;

use super::geometry_kind;
use crate::{Coordinate, model::Slot, model::SlotIndex};

const LOT_ID_PROPERTY: &str = "lot_id";
const SLOT_ID_PROPERTIES: [&str; 2] = ["Slot_Id", "slot_id"];

/// Build a slot index from slot features
///
/// Features without a `lot_id`, with a duplicate `lot_id` or with a geometry
/// other than a point or (multi)polygon are skipped with a warning.
pub(crate) fn build_slot_index(slots: &FeatureCollection) -> SlotIndex {
    let mut index = SlotIndex::default();
    let mut skipped = 0usize;

    for (feature_idx, feature) in slots.features.iter().enumerate() {
        let Some(lot_id) = property_string(feature, LOT_ID_PROPERTY) else {
            warn!("Slot feature {feature_idx} has no {LOT_ID_PROPERTY} - skipping");
            skipped += 1;
            continue;
        };

        let Some(position) = feature_position(feature, &lot_id) else {
            skipped += 1;
            continue;
        };

        let slot_id = SLOT_ID_PROPERTIES
            .iter()
            .find_map(|key| property_string(feature, key));

        let slot = Slot {
            lot_id,
            slot_id,
            position,
            snapped: None,
        };

        if let Err(duplicate) = index.insert(slot) {
            warn!(
                "Duplicate lot {} in feature {feature_idx} - keeping the first occurrence",
                duplicate.lot_id
            );
            skipped += 1;
        }
    }

    info!(
        "Loaded {} slots in {} groups ({} features skipped)",
        index.len(),
        index.slot_groups().len(),
        skipped
    );

    index
}

/// Point geometry as is, area geometry reduced to its centroid
fn feature_position(feature: &Feature, lot_id: &str) -> Option<Coordinate> {
    let Some(geometry) = &feature.geometry else {
        warn!("Lot {lot_id} has no geometry - skipping");
        return None;
    };

    let geometry = match geo::Geometry::<f64>::try_from(geometry.clone()) {
        Ok(geometry) => geometry,
        Err(e) => {
            warn!("Lot {lot_id} has unreadable geometry ({e}) - skipping");
            return None;
        }
    };

    let position = match &geometry {
        geo::Geometry::Point(point) => Some(*point),
        geo::Geometry::Polygon(_) | geo::Geometry::MultiPolygon(_) => geometry.centroid(),
        other => {
            warn!(
                "Unsupported slot geometry type {} for lot {lot_id} - skipping",
                geometry_kind(other)
            );
            return None;
        }
    };

    let position = position.map(Coordinate::from).filter(|c| c.is_finite());
    if position.is_none() {
        warn!("Lot {lot_id} has an empty geometry - skipping");
    }
    position
}

/// String or numeric property as a trimmed string
fn property_string(feature: &Feature, key: &str) -> Option<String> {
    let value = match feature.property(key)? {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}
