//! This module is responsible for loading yard data (road and slot GeoJSON)
//! and building the routing model of a yard.

mod builder;
mod catalog;
mod config;
pub(crate) mod roads;
pub(crate) mod slots;

pub use builder::{create_yard_model, load_catalog, read_feature_collection};
pub use catalog::YardCatalog;
pub use config::YardConfig;

/// GeoJSON name of a geometry kind, for diagnostics
pub(crate) fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
