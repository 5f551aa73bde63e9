use geo::Area;

use crate::geofile::feature::FeatureLayer;

/// Receives the pipeline's intermediate and final layers. Rendering and reporting live
/// behind this trait so the extraction itself depends on no display capability.
pub trait PipelineObserver {
    /// Called once both operand layers are in the working CRS, before the overlay runs.
    fn on_layers_prepared(&mut self, _bounds: &FeatureLayer, _lots: &FeatureLayer) {}

    /// Called with the final road layer, after reprojection and before export.
    fn on_roads_extracted(&mut self, _roads: &FeatureLayer) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs feature counts and summed areas at both observation points.
pub struct LoggingObserver;

impl PipelineObserver for LoggingObserver {
    fn on_layers_prepared(&mut self, bounds: &FeatureLayer, lots: &FeatureLayer) {
        log::info!(
            "Prepared {} boundary features covering {:.1} square units and {} lot features covering {:.1} square units",
            bounds.features.len(),
            layer_area(bounds),
            lots.features.len(),
            layer_area(lots)
        );
    }

    fn on_roads_extracted(&mut self, roads: &FeatureLayer) {
        log::info!(
            "Extracted {} road features covering {:.1} square units",
            roads.features.len(),
            layer_area(roads)
        );
    }
}

fn layer_area(layer: &FeatureLayer) -> f64 {
    layer
        .features
        .iter()
        .map(|feature| feature.geometry.unsigned_area())
        .sum()
}
