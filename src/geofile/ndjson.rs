use std::{fs, path::Path};

use indicatif::ProgressBar;

use super::feature::{Feature, FeatureLayer};
use crate::crs::crs_utils::Crs;
use crate::errors::PipelineError;

/// Read a newline-delimited GeoJSON file into a layer, one feature per non-empty line.
///
/// The file must be UTF-8 and may start with a byte-order mark, which is ignored. The first
/// line that fails to parse aborts the whole load; no partial layer is returned. The
/// resulting layer carries no CRS tag, that is for the caller to decide.
pub fn read_features_from_ndjson(filepath: &Path) -> Result<FeatureLayer, PipelineError> {
    let raw = fs::read_to_string(filepath)?;
    let contents = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut features = Vec::new();
    let bar = ProgressBar::new(contents.lines().count() as u64);
    for (line_index, line) in contents.lines().enumerate() {
        bar.inc(1);
        if line.trim().is_empty() {
            continue;
        }
        let parse_line_error = |err| PipelineError::ParseLine {
            path: filepath.to_path_buf(),
            line: line_index + 1,
            source: err,
        };
        let geojson_value: geojson::GeoJson = line.parse().map_err(parse_line_error)?;
        let geojson_feature = geojson::Feature::try_from(geojson_value).map_err(parse_line_error)?;
        match Feature::from_geojson(geojson_feature).map_err(parse_line_error)? {
            Some(feature) => features.push(feature),
            None => log::warn!(
                "Skipping feature without geometry on line {} of {:?}",
                line_index + 1,
                filepath
            ),
        }
    }
    bar.finish_and_clear();

    Ok(FeatureLayer {
        features,
        crs: Crs::Unknown,
    })
}
