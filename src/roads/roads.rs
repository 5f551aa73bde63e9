use std::path::Path;

use crate::crs::crs_utils::EpsgCode;
use crate::errors::PipelineError;
use crate::geofile::feature::FeatureLayer;
use crate::geofile::{geojson, ndjson};

use super::observer::PipelineObserver;
use super::{overlay, preprocessing, validation};

/// CRS and validation knobs for one road extraction run.
pub struct RoadsParams {
    /// Planar CRS the overlay arithmetic runs in.
    pub working_crs: EpsgCode,
    /// Geographic CRS of the exported layer.
    pub output_crs: EpsgCode,
    /// CRS the lot data is believed to be recorded in. Assigned to the lot layer as-is,
    /// not reprojected from anything, because the lot dumps declare no CRS of their own.
    pub assumed_lot_crs: EpsgCode,
    /// Reject degenerate or self-intersecting input rings before the overlay.
    pub validate_geometries: bool,
}

/// Run the whole extraction: load both layers, normalize CRSs, subtract the lots from the
/// jurisdiction bounds, reproject the remainder and write it to `output_path`.
///
/// Fail-fast throughout; the output file is only touched as the last step, so a failed run
/// never leaves a partial result behind.
pub fn extract_road_network(
    lot_data_path: &Path,
    bounds_path: &Path,
    output_path: &Path,
    params: &RoadsParams,
    observer: &mut dyn PipelineObserver,
) -> Result<FeatureLayer, PipelineError> {
    log::info!("Reading lot features from {:?}", lot_data_path);
    let lots = ndjson::read_features_from_ndjson(lot_data_path)?;
    log::info!("Read {} lot features", lots.features.len());

    log::info!("Reading jurisdiction bounds from {:?}", bounds_path);
    let bounds = geojson::read_feature_collection(bounds_path)?;
    log::info!("Read {} boundary features", bounds.features.len());

    if params.validate_geometries {
        validation::validate_layer(&bounds, "boundary")?;
        validation::validate_layer(&lots, "lot")?;
    }

    let (bounds, lots) = preprocessing::normalize_layers(
        bounds,
        lots,
        params.working_crs,
        params.assumed_lot_crs,
    )?;
    observer.on_layers_prepared(&bounds, &lots);

    let roads = overlay::subtract_lots_from_bounds(&bounds, &lots)?;
    let roads = preprocessing::reproject_layer(roads, params.output_crs)?;
    observer.on_roads_extracted(&roads);

    log::info!(
        "Writing {} road features to {:?}",
        roads.features.len(),
        output_path
    );
    geojson::write_feature_collection(&roads, output_path)?;
    Ok(roads)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use approx::assert_abs_diff_eq;
    use geo::Area;
    use testdir::testdir;

    use super::{extract_road_network, RoadsParams};
    use crate::geofile::feature::FeatureLayer;
    use crate::geofile::geojson::read_feature_collection;
    use crate::roads::observer::PipelineObserver;

    const LOT_LINE: &str = r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[4.0,0.0],[4.0,4.0],[0.0,4.0],[0.0,0.0]]]},"properties":{"taxlot":"21E02BC00100"}}"#;
    const BOUNDS_DOCUMENT: &str = r#"{"type":"FeatureCollection","crs":{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::2913"}},"features":[
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[10.0,0.0],[10.0,10.0],[0.0,10.0],[0.0,0.0]]]},"properties":{"name":"West Linn"}}
    ]}"#;

    /// Both CRS knobs pinned to the bounds file's CRS, so the run involves no projection
    /// math and the planar test coordinates pass through unchanged.
    fn planar_params(validate_geometries: bool) -> RoadsParams {
        RoadsParams {
            working_crs: 2913,
            output_crs: 2913,
            assumed_lot_crs: 2913,
            validate_geometries,
        }
    }

    fn write_inputs(test_dir: &PathBuf, lot_lines: &str) -> (PathBuf, PathBuf, PathBuf) {
        let lot_data_path = test_dir.join("lots.ndgeojson");
        let bounds_path = test_dir.join("bounds.geojson");
        let output_path = test_dir.join("roads.geojson");
        fs::write(&lot_data_path, lot_lines).unwrap();
        fs::write(&bounds_path, BOUNDS_DOCUMENT).unwrap();
        (lot_data_path, bounds_path, output_path)
    }

    #[derive(Default)]
    struct CountingObserver {
        prepared_calls: usize,
        extracted_calls: usize,
        extracted_feature_count: usize,
    }

    impl PipelineObserver for CountingObserver {
        fn on_layers_prepared(&mut self, _bounds: &FeatureLayer, _lots: &FeatureLayer) {
            self.prepared_calls += 1;
        }

        fn on_roads_extracted(&mut self, roads: &FeatureLayer) {
            self.extracted_calls += 1;
            self.extracted_feature_count = roads.features.len();
        }
    }

    #[test]
    fn test_extraction_end_to_end() {
        let test_dir = testdir!();
        let (lot_data_path, bounds_path, output_path) =
            write_inputs(&test_dir, &format!("{}\n", LOT_LINE));

        let mut observer = CountingObserver::default();
        let roads = extract_road_network(
            &lot_data_path,
            &bounds_path,
            &output_path,
            &planar_params(true),
            &mut observer,
        )
        .unwrap();

        let total_area: f64 = roads
            .features
            .iter()
            .map(|feature| feature.geometry.unsigned_area())
            .sum();
        assert_abs_diff_eq!(84.0, total_area, epsilon = 1e-9);

        assert_eq!(1, observer.prepared_calls);
        assert_eq!(1, observer.extracted_calls);
        assert_eq!(roads.features.len(), observer.extracted_feature_count);

        // The written file parses back to the same number of features.
        let written = read_feature_collection(&output_path).unwrap();
        assert_eq!(roads.features.len(), written.features.len());
        assert_eq!(
            "West Linn",
            written.features[0].attributes.as_ref().unwrap()["name"]
                .as_str()
                .unwrap()
        );
    }

    #[test]
    fn test_malformed_lot_line_aborts_before_any_output() {
        let test_dir = testdir!();
        let (lot_data_path, bounds_path, output_path) =
            write_inputs(&test_dir, &format!("{}\nnot geojson\n", LOT_LINE));

        let mut observer = CountingObserver::default();
        let result = extract_road_network(
            &lot_data_path,
            &bounds_path,
            &output_path,
            &planar_params(false),
            &mut observer,
        );

        assert!(result.is_err());
        assert!(!output_path.exists());
        assert_eq!(0, observer.prepared_calls);
    }

    #[test]
    fn test_invalid_lot_geometry_aborts_when_validation_is_on() {
        let test_dir = testdir!();
        let bowtie_line = r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[4.0,4.0],[4.0,0.0],[0.0,4.0],[0.0,0.0]]]},"properties":null}"#;
        let (lot_data_path, bounds_path, output_path) =
            write_inputs(&test_dir, &format!("{}\n", bowtie_line));

        let mut observer = CountingObserver::default();
        let result = extract_road_network(
            &lot_data_path,
            &bounds_path,
            &output_path,
            &planar_params(true),
            &mut observer,
        );

        assert!(result.is_err());
        assert!(!output_path.exists());
    }
}
