use geo::BooleanOps;

use crate::crs::crs_utils::Crs;
use crate::errors::PipelineError;
use crate::geofile::feature::{Feature, FeatureLayer};

/// Compute the overlay difference `bounds - lots`: everything inside the jurisdiction
/// boundary that no tax lot covers. For this municipality that remainder is, mostly, the
/// road network.
///
/// All lot polygons act as one implicit union, so overlapping or duplicated lots subtract
/// only once. Boundary features whose difference comes out empty are dropped. Output
/// features keep the attributes of the boundary feature they came from; lot attributes
/// never appear.
pub fn subtract_lots_from_bounds(
    bounds: &FeatureLayer,
    lots: &FeatureLayer,
) -> Result<FeatureLayer, PipelineError> {
    let crs = match (bounds.crs, lots.crs) {
        (Crs::Epsg(bounds_code), Crs::Epsg(lots_code)) if bounds_code == lots_code => bounds.crs,
        (bounds_crs, lots_crs) => {
            return Err(PipelineError::Geometry(format!(
                "overlay operands must share one known CRS, got {:?} and {:?}",
                bounds_crs, lots_crs
            )))
        }
    };

    let lot_union = collect_areal_geometries(lots, "lot");
    log::info!(
        "Subtracting {} lot polygons from {} boundary features",
        lot_union.0.len(),
        bounds.features.len()
    );

    let mut features = Vec::new();
    for (feature_index, feature) in bounds.features.iter().enumerate() {
        let Some(shape) = areal_geometry(&feature.geometry) else {
            log::warn!("Skipping non-polygonal boundary feature {}", feature_index);
            continue;
        };
        let difference = if lot_union.0.is_empty() {
            shape
        } else {
            shape.difference(&lot_union)
        };
        if difference.0.is_empty() {
            // The lots cover this region completely.
            continue;
        }
        features.push(Feature {
            geometry: geo::Geometry::MultiPolygon(difference),
            attributes: feature.attributes.clone(),
        });
    }

    Ok(FeatureLayer { features, crs })
}

/// Areal view of a geometry, or None if it has no polygonal interpretation.
fn areal_geometry(geometry: &geo::Geometry) -> Option<geo::MultiPolygon> {
    match geometry {
        geo::Geometry::Polygon(polygon) => Some(geo::MultiPolygon(vec![polygon.clone()])),
        geo::Geometry::MultiPolygon(multi_polygon) => Some(multi_polygon.clone()),
        _ => None,
    }
}

fn collect_areal_geometries(layer: &FeatureLayer, role: &str) -> geo::MultiPolygon {
    let mut polygons = Vec::new();
    let mut areal_count = 0;
    for feature in &layer.features {
        if let Some(multi_polygon) = areal_geometry(&feature.geometry) {
            areal_count += 1;
            polygons.extend(multi_polygon.0);
        }
    }
    if areal_count != layer.features.len() {
        log::warn!(
            "Out of {} {} features, only {} were polygonal.",
            layer.features.len(),
            role,
            areal_count
        );
    }
    geo::MultiPolygon(polygons)
}
