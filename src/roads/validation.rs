use geo::algorithm::line_intersection::{line_intersection, LineIntersection};

use crate::errors::PipelineError;
use crate::geofile::feature::FeatureLayer;

/// Reject degenerate or self-intersecting rings before they reach the overlay, which gives
/// no guarantees on invalid input. Non-areal features are not checked; the overlay skips
/// them anyway.
pub fn validate_layer(layer: &FeatureLayer, layer_name: &str) -> Result<(), PipelineError> {
    for (feature_index, feature) in layer.features.iter().enumerate() {
        let rings: Vec<&geo::LineString> = match &feature.geometry {
            geo::Geometry::Polygon(polygon) => polygon_rings(polygon),
            geo::Geometry::MultiPolygon(multi_polygon) => {
                multi_polygon.0.iter().flat_map(polygon_rings).collect()
            }
            _ => continue,
        };
        for ring in rings {
            check_ring(ring).map_err(|reason| {
                PipelineError::Geometry(format!(
                    "invalid geometry in {} feature {}: {}",
                    layer_name, feature_index, reason
                ))
            })?;
        }
    }
    Ok(())
}

fn polygon_rings(polygon: &geo::Polygon) -> Vec<&geo::LineString> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .collect()
}

fn check_ring(ring: &geo::LineString) -> Result<(), String> {
    // A closed ring needs three distinct coordinates plus the repeated endpoint.
    if ring.0.len() < 4 {
        return Err(format!(
            "ring has {} coordinates, need at least 4",
            ring.0.len()
        ));
    }
    let segments: Vec<geo::Line> = ring.lines().collect();
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            match line_intersection(segments[i], segments[j]) {
                Some(LineIntersection::SinglePoint { is_proper: true, .. }) => {
                    return Err(format!("ring segments {} and {} cross", i, j));
                }
                // Collinear segments touching only at a shared endpoint report a
                // degenerate intersection line; that much is fine.
                Some(LineIntersection::Collinear { intersection })
                    if intersection.start != intersection.end =>
                {
                    return Err(format!("ring segments {} and {} overlap", i, j));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_layer;
    use crate::crs::crs_utils::Crs;
    use crate::errors::PipelineError;
    use crate::geofile::feature::{Feature, FeatureLayer};

    fn polygon_layer(exterior: Vec<(f64, f64)>) -> FeatureLayer {
        let polygon = geo::Polygon::new(geo::LineString::from(exterior), vec![]);
        FeatureLayer {
            features: vec![Feature::from(geo::Geometry::Polygon(polygon))],
            crs: Crs::Epsg(2913),
        }
    }

    #[test]
    fn test_valid_square_passes() {
        let layer = polygon_layer(vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);
        validate_layer(&layer, "boundary").unwrap();
    }

    #[test]
    fn test_redundant_collinear_vertex_passes() {
        let layer = polygon_layer(vec![
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);
        validate_layer(&layer, "boundary").unwrap();
    }

    #[test]
    fn test_bowtie_is_rejected() {
        let layer = polygon_layer(vec![
            (0.0, 0.0),
            (4.0, 4.0),
            (4.0, 0.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let error = validate_layer(&layer, "lot").unwrap_err();
        assert!(matches!(error, PipelineError::Geometry(_)));
    }

    #[test]
    fn test_degenerate_ring_is_rejected() {
        let layer = polygon_layer(vec![(0.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        let error = validate_layer(&layer, "lot").unwrap_err();
        assert!(matches!(error, PipelineError::Geometry(_)));
    }

    #[test]
    fn test_spike_is_rejected() {
        // The ring doubles back along its own edge between (10,0) and (15,0).
        let layer = polygon_layer(vec![
            (0.0, 0.0),
            (15.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);
        let error = validate_layer(&layer, "lot").unwrap_err();
        assert!(matches!(error, PipelineError::Geometry(_)));
    }

    #[test]
    fn test_non_areal_features_are_not_checked() {
        let layer = FeatureLayer {
            features: vec![Feature::from(geo::Geometry::Point(geo::Point::new(
                1.0, 2.0,
            )))],
            crs: Crs::Epsg(2913),
        };
        validate_layer(&layer, "lot").unwrap();
    }
}
