use proj::Transform;

use crate::crs::crs_utils::{epsg_code_to_authority_string, Crs, EpsgCode};
use crate::errors::PipelineError;
use crate::geofile::feature::{Feature, FeatureLayer};

/// Transform a layer's coordinates into the CRS given by `to_crs`.
///
/// A layer already tagged with `to_crs` is returned unchanged, so normalizing twice is a
/// no-op. A layer with an unknown CRS cannot be reprojected and fails.
pub fn reproject_layer(layer: FeatureLayer, to_crs: EpsgCode) -> Result<FeatureLayer, PipelineError> {
    let source_code = match layer.crs {
        Crs::Epsg(code) => code,
        Crs::Unknown => {
            return Err(PipelineError::UnsupportedCrs(
                "cannot reproject a layer whose source CRS is unknown".to_string(),
            ))
        }
    };
    if source_code == to_crs {
        return Ok(layer);
    }

    log::info!(
        "Projecting {} features from {} to {}",
        layer.features.len(),
        epsg_code_to_authority_string(source_code),
        epsg_code_to_authority_string(to_crs)
    );
    let projection = proj::Proj::new_known_crs(
        &epsg_code_to_authority_string(source_code),
        &epsg_code_to_authority_string(to_crs),
        None,
    )
    .map_err(|err| {
        PipelineError::UnsupportedCrs(format!(
            "no transformation from {} to {}: {}",
            epsg_code_to_authority_string(source_code),
            epsg_code_to_authority_string(to_crs),
            err
        ))
    })?;

    let features: Result<Vec<Feature>, PipelineError> = layer
        .features
        .into_iter()
        .map(|feature| {
            let geometry = feature.geometry.transformed(&projection).map_err(|err| {
                PipelineError::Geometry(format!("could not project geometry: {}", err))
            })?;
            Ok(Feature {
                geometry,
                attributes: feature.attributes,
            })
        })
        .collect();

    Ok(FeatureLayer {
        features: features?,
        crs: Crs::Epsg(to_crs),
    })
}

/// Tag a layer with `assumed_crs` without touching its coordinates.
///
/// This is an override for data whose recorded CRS is missing or untrusted; the coordinates
/// must already be expressed in the assumed system, nothing here can check that.
pub fn assume_layer_crs(layer: FeatureLayer, assumed_crs: EpsgCode) -> FeatureLayer {
    if let Crs::Epsg(declared) = layer.crs {
        if declared != assumed_crs {
            log::warn!(
                "Overriding declared CRS {} with {}",
                epsg_code_to_authority_string(declared),
                epsg_code_to_authority_string(assumed_crs)
            );
        }
    }
    FeatureLayer {
        features: layer.features,
        crs: Crs::Epsg(assumed_crs),
    }
}

/// Bring both overlay operands into the shared planar working CRS.
///
/// The bounds layer is reprojected from its declared CRS. The lot layer carries no
/// trustworthy CRS of record, so it is first tagged with `assumed_lot_crs` and only then
/// reprojected, which is a no-op in the usual case where the assumption is the working CRS.
pub fn normalize_layers(
    bounds: FeatureLayer,
    lots: FeatureLayer,
    working_crs: EpsgCode,
    assumed_lot_crs: EpsgCode,
) -> Result<(FeatureLayer, FeatureLayer), PipelineError> {
    let bounds = reproject_layer(bounds, working_crs)?;
    let lots = assume_layer_crs(lots, assumed_lot_crs);
    let lots = reproject_layer(lots, working_crs)?;
    Ok((bounds, lots))
}
