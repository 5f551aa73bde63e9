use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a road extraction run. No variant is recovered from anywhere;
/// they all propagate to the process boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Malformed GeoJSON document {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: geojson::Error,
    },
    #[error("Malformed GeoJSON on line {line} of {path:?}: {source}")]
    ParseLine {
        path: PathBuf,
        /// 1-based line number in the line-delimited input file.
        line: usize,
        source: geojson::Error,
    },
    #[error("Unsupported source CRS: {0}")]
    UnsupportedCrs(String),
    #[error("Geometry error: {0}")]
    Geometry(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
