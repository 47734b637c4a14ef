use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::planner::RoutePlan;
use crate::Error;

impl RoutePlan {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: the path line
    /// followed by start and destination markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the route has no coordinates
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let (Some(start), Some(destination)) = (self.start(), self.destination()) else {
            return Err(Error::InvalidData("Route has no coordinates".to_string()));
        };

        let coords: Vec<Coord<f64>> = self.coordinates.iter().copied().map(Coord::from).collect();
        let line = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

        let route = json!({
            "type": "Feature",
            "geometry": line,
            "properties": {
                "feature_type": "route",
                "distance_m": self.distance_m,
                "distance": self.formatted_distance(),
                "eta_minutes": self.eta_minutes,
                "eta": self.formatted_eta(),
                "steps": self.steps.len(),
            }
        });

        let features = vec![
            serde_json::from_value::<Feature>(route).map_err(|e| Error::GeoJson(e.to_string()))?,
            marker_feature("start", start.to_point())?,
            marker_feature("destination", destination.to_point())?,
        ];

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJson(e.to_string()))
    }
}

fn marker_feature(kind: &str, point: Point<f64>) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&point)),
        "properties": {
            "feature_type": kind,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJson(e.to_string()))
}
