pub type EpsgCode = u32;

/// Planar CRS the overlay arithmetic runs in: NAD83(HARN) / Oregon North (ft),
/// accurate for area math around West Linn.
pub const OVERLAY_CRS: EpsgCode = 2913;

/// Geographic CRS of the exported layer: WGS 84 longitude/latitude.
pub const EXPORT_CRS: EpsgCode = 4326;

/// Coordinate reference system tag of a feature layer.
///
/// `Unknown` models data whose source files declare nothing usable, e.g. the line-delimited
/// lot dumps. A layer must be tagged with a known CRS before it can be reprojected or fed
/// into the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crs {
    Epsg(EpsgCode),
    Unknown,
}

pub fn epsg_code_to_authority_string(code: EpsgCode) -> String {
    format!("EPSG:{}", code)
}

/// Resolve the name of a legacy GeoJSON `crs` member to an EPSG code.
///
/// Accepts the plain `EPSG:nnnn` form and the `urn:ogc:def:crs:...` URNs, including the
/// OGC CRS84 alias for WGS 84. Returns None for anything else.
pub fn parse_crs_name(name: &str) -> Option<EpsgCode> {
    if let Some(code) = name.strip_prefix("EPSG:") {
        return code.parse().ok();
    }
    let rest = name.strip_prefix("urn:ogc:def:crs:")?;
    let mut parts = rest.splitn(3, ':');
    let authority = parts.next()?;
    let _version = parts.next()?;
    let code = parts.next()?;
    if authority.eq_ignore_ascii_case("OGC") && code.eq_ignore_ascii_case("CRS84") {
        return Some(4326);
    }
    if authority.eq_ignore_ascii_case("EPSG") {
        return code.parse().ok();
    }
    None
}
