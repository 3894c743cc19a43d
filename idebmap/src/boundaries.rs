//! The boundary polygon collection the renderer joins the projected table
//! against. The core never touches the geometries; it only checks that the
//! join keys line up.

use std::collections::HashSet;
use std::path::Path;

use geojson::feature::Id;
use geojson::{FeatureCollection, GeoJson};
use log::{info, warn};

use crate::error::IdebmapError;
use crate::regions;

/// A named polygon collection keyed by canonical region codes.
#[derive(Debug, Clone)]
pub struct Boundaries {
    collection: FeatureCollection,
}

impl Boundaries {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IdebmapError> {
        info!(
            "Attempting to load boundaries from {}",
            path.as_ref().display()
        );
        let raw = std::fs::read_to_string(path)?;
        let geojson: GeoJson = raw.parse()?;
        Self::from_geojson(geojson)
    }

    pub fn from_geojson(geojson: GeoJson) -> Result<Self, IdebmapError> {
        let collection = FeatureCollection::try_from(geojson)?;
        let boundaries = Self { collection };
        let uncovered = boundaries.uncovered_codes();
        if !uncovered.is_empty() {
            warn!("canonical codes without a boundary polygon: {uncovered:?}");
        }
        Ok(boundaries)
    }

    /// Codes of every feature carrying a string id, in feature order.
    pub fn codes(&self) -> Vec<&str> {
        self.collection
            .features
            .iter()
            .filter_map(|feature| match &feature.id {
                Some(Id::String(code)) => Some(code.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes().iter().any(|c| *c == code)
    }

    /// Canonical codes with no polygon in the collection. Rows carrying
    /// these codes cannot render.
    pub fn uncovered_codes(&self) -> Vec<&'static str> {
        let present: HashSet<&str> = self.codes().into_iter().collect();
        regions::REGION_CODES
            .iter()
            .map(|(_, code)| *code)
            .filter(|code| !present.contains(code))
            .collect()
    }

    /// Feature ids with no entry in the canonical table; those polygons can
    /// never be colored.
    pub fn unmatched_features(&self) -> Vec<&str> {
        self.codes()
            .into_iter()
            .filter(|code| !regions::is_canonical_code(code))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }
}
