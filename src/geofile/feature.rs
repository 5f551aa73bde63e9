use geojson::JsonObject;

use crate::crs::crs_utils::Crs;

/// One geometry with its attribute mapping. Attribute values keep their JSON types so
/// properties survive a load/export cycle untouched.
#[derive(Clone, Debug)]
pub struct Feature {
    pub geometry: geo::Geometry,
    pub attributes: Option<JsonObject>,
}

impl From<geo::Geometry> for Feature {
    fn from(value: geo::Geometry) -> Self {
        Self {
            geometry: value,
            attributes: None,
        }
    }
}

impl Feature {
    /// Convert a parsed GeoJSON feature. Returns None for features with a null geometry,
    /// which GeoJSON allows but which carry nothing this pipeline can operate on.
    pub fn from_geojson(feature: geojson::Feature) -> Result<Option<Self>, geojson::Error> {
        let Some(geometry) = feature.geometry else {
            return Ok(None);
        };
        let geometry = geo::Geometry::try_from(geometry)?;
        Ok(Some(Self {
            geometry,
            attributes: feature.properties,
        }))
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geometry))),
            id: None,
            properties: self.attributes.clone(),
            foreign_members: None,
        }
    }
}

/// An ordered collection of features sharing one CRS tag. Every pipeline stage consumes
/// layers and produces fresh ones; nothing mutates a layer in place.
#[derive(Clone, Debug)]
pub struct FeatureLayer {
    pub features: Vec<Feature>,
    pub crs: Crs,
}
