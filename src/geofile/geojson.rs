use std::{fs, path::Path};

use super::feature::{Feature, FeatureLayer};
use crate::crs::crs_utils::{parse_crs_name, Crs, EpsgCode};
use crate::errors::PipelineError;

/// CRS of GeoJSON documents that declare none, per RFC 7946.
const DEFAULT_DOCUMENT_CRS: EpsgCode = 4326;

/// Read a whole GeoJSON FeatureCollection document into a layer.
///
/// A legacy GeoJSON 2008 `crs` member is honored when present; a document without one is
/// taken to be WGS 84. A `crs` member naming a system this pipeline cannot resolve leaves
/// the layer tagged `Crs::Unknown`, which fails later at normalization.
pub fn read_feature_collection(filepath: &Path) -> Result<FeatureLayer, PipelineError> {
    let contents = fs::read_to_string(filepath)?;
    let parse_error = |err| PipelineError::Parse {
        path: filepath.to_path_buf(),
        source: err,
    };
    let geojson: geojson::GeoJson = contents.parse().map_err(parse_error)?;
    let collection = geojson::FeatureCollection::try_from(geojson).map_err(parse_error)?;
    let crs = declared_crs(&collection);

    let mut features = Vec::new();
    for (feature_index, geojson_feature) in collection.features.into_iter().enumerate() {
        match Feature::from_geojson(geojson_feature).map_err(parse_error)? {
            Some(feature) => features.push(feature),
            None => log::warn!(
                "Skipping feature {} without geometry in {:?}",
                feature_index,
                filepath
            ),
        }
    }
    Ok(FeatureLayer { features, crs })
}

fn declared_crs(collection: &geojson::FeatureCollection) -> Crs {
    let crs_member = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"));
    match crs_member {
        None => Crs::Epsg(DEFAULT_DOCUMENT_CRS),
        Some(member) => member
            .pointer("/properties/name")
            .and_then(|name| name.as_str())
            .and_then(parse_crs_name)
            .map_or(Crs::Unknown, Crs::Epsg),
    }
}

/// Serialize a layer as a GeoJSON FeatureCollection, overwriting any existing file.
pub fn write_feature_collection(
    layer: &FeatureLayer,
    output_filepath: &Path,
) -> Result<(), PipelineError> {
    let feature_collection: geojson::FeatureCollection =
        layer.features.iter().map(Feature::to_geojson).collect();
    let geojson_contents: geojson::GeoJson = geojson::GeoJson::from(feature_collection);
    fs::write(output_filepath, geojson_contents.to_string())?;
    Ok(())
}
