extern crate log;
pub mod crs;
pub mod errors;
pub mod geofile;
pub mod roads;
use crate::crs::crs_utils::{EXPORT_CRS, OVERLAY_CRS};
use crate::roads::observer::LoggingObserver;
use crate::roads::roads::{extract_road_network, RoadsParams};
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Derive a municipality's approximate road network by subtracting its tax-lot polygons
/// from its jurisdiction boundary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

fn default_output_filename() -> PathBuf {
    PathBuf::from("WestLinnRoadNetwork.geojson")
}

#[derive(Deserialize, Debug)]
struct Config {
    /// Directory every other path in this config is resolved against.
    base_dir: PathBuf,
    /// Newline-delimited GeoJSON file with one tax-lot feature per line.
    lot_data_filename: PathBuf,
    /// GeoJSON FeatureCollection holding the jurisdiction boundary polygon(s).
    bounds_filename: PathBuf,
    #[serde(default = "default_output_filename")]
    output_filename: PathBuf,
    #[serde(default)]
    validate_geometries: bool,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    let params = RoadsParams {
        working_crs: OVERLAY_CRS,
        output_crs: EXPORT_CRS,
        // The lot dumps are believed to already be in the overlay CRS; this assigns,
        // it does not transform.
        assumed_lot_crs: OVERLAY_CRS,
        validate_geometries: config.validate_geometries,
    };
    let roads = extract_road_network(
        &config.base_dir.join(&config.lot_data_filename),
        &config.base_dir.join(&config.bounds_filename),
        &config.base_dir.join(&config.output_filename),
        &params,
        &mut LoggingObserver,
    )?;
    log::info!("Road network layer contains {} features", roads.features.len());
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
