// src/geometry/ingest.rs
//! Contour artifact (`*.contour.json`) → validated `ContourSet` + asset loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::Deserialize;

use super::core::{ContourPolygon, ContourSet};

// ---------- Public plugin to register asset+loader ----------

pub struct ContourAssetPlugin;

impl Plugin for ContourAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ContourArtifact>()
            .register_asset_loader(ContourArtifactLoader);
    }
}

// ---------- Artifact (data form) ----------

#[derive(Debug, Deserialize)]
struct RawArtifact {
    image_w: Option<i64>,
    image_h: Option<i64>,
    #[serde(default)]
    polygons: Vec<RawPolygon>,
    #[serde(default)]
    notes: Option<String>,
}

/// Unknown keys (`holes`, producer extras) are ignored.
#[derive(Debug, Deserialize)]
struct RawPolygon {
    #[serde(default)]
    outer: Vec<[f64; 2]>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    area_px: Option<f32>,
    #[serde(default)]
    mask_index: Option<u32>,
}

impl RawPolygon {
    fn into_polygon(self) -> ContourPolygon {
        let mut outer: Vec<IVec2> = self
            .outer
            .iter()
            .map(|[x, y]| IVec2::new(x.round() as i32, y.round() as i32))
            .collect();
        // Producers sometimes repeat the first point to close the ring.
        if outer.len() >= 2 && outer.first() == outer.last() {
            outer.pop();
        }
        ContourPolygon {
            outer,
            label: self.label,
            area_px: self.area_px,
            mask_index: self.mask_index,
        }
    }
}

fn positive_dimension(field: &'static str, value: Option<i64>) -> Result<u32, ContourError> {
    let value = value.ok_or(ContourError::MissingField(field))?;
    if value <= 0 || value > u32::MAX as i64 {
        return Err(ContourError::NonPositiveDimension { field, value });
    }
    Ok(value as u32)
}

/// Parse and validate a contour artifact. Pure; no side effects.
pub fn parse_artifact(bytes: &[u8]) -> Result<ContourSet, ContourError> {
    let raw: RawArtifact =
        serde_json::from_slice(bytes).map_err(|e| ContourError::Json(e.to_string()))?;

    let width = positive_dimension("image_w", raw.image_w)?;
    let height = positive_dimension("image_h", raw.image_h)?;

    let total = raw.polygons.len();
    let polygons: Vec<ContourPolygon> = raw
        .polygons
        .into_iter()
        .map(RawPolygon::into_polygon)
        .filter(|p| p.outer.len() >= 3)
        .collect();

    if polygons.is_empty() {
        return Err(ContourError::NoUsablePolygons { total });
    }
    if polygons.len() < total {
        debug!("Contours: dropped {} polygons with fewer than 3 points", total - polygons.len());
    }
    if let Some(notes) = raw.notes.as_deref() {
        debug!("Contours: producer notes: {notes}");
    }

    Ok(ContourSet { image_size: UVec2::new(width, height), polygons })
}

// ---------- Runtime asset ----------

#[derive(Asset, TypePath, Clone, Debug)]
pub struct ContourArtifact {
    pub contours: ContourSet,
}

// ---------- Asset loader for `.contour.json` ----------

#[derive(Default)]
pub struct ContourArtifactLoader;

impl AssetLoader for ContourArtifactLoader {
    type Asset = ContourArtifact;
    type Settings = ();
    type Error = ContourError;

    fn extensions(&self) -> &[&str] {
        &["contour.json"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let contours = parse_artifact(&bytes)?;
        Ok(ContourArtifact { contours })
    }
}

// ---------- Errors ----------

#[derive(thiserror::Error, Debug)]
pub enum ContourError {
    #[error("I/O while reading contour artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be a positive integer, got {value}")]
    NonPositiveDimension { field: &'static str, value: i64 },
    #[error("no polygon with at least 3 points ({total} listed)")]
    NoUsablePolygons { total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_artifact() {
        let json = br#"{
            "image_w": 800, "image_h": 600,
            "polygons": [
                { "label": "object", "outer": [[10,10],[50,10],[50,40],[10,40]], "holes": [], "area_px": 1200.0, "mask_index": 2 }
            ],
            "notes": "test"
        }"#;
        let set = parse_artifact(json).unwrap();
        assert_eq!(set.image_size, UVec2::new(800, 600));
        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].outer.len(), 4);
        assert_eq!(set.polygons[0].mask_index, Some(2));
    }

    #[test]
    fn missing_height_is_a_parse_error() {
        let json = br#"{ "image_w": 800, "polygons": [ { "outer": [[0,0],[5,0],[5,5]] } ] }"#;
        let err = parse_artifact(json).unwrap_err();
        assert!(matches!(err, ContourError::MissingField("image_h")));
    }

    #[test]
    fn non_positive_width_is_rejected() {
        let json = br#"{ "image_w": 0, "image_h": 10, "polygons": [] }"#;
        let err = parse_artifact(json).unwrap_err();
        assert!(matches!(err, ContourError::NonPositiveDimension { field: "image_w", value: 0 }));
    }

    #[test]
    fn closing_point_is_dropped_and_short_rings_skipped() {
        let json = br#"{
            "image_w": 100, "image_h": 100,
            "polygons": [
                { "outer": [[0,0],[10,0],[0,0]] },
                { "outer": [[0,0],[10,0],[10,10],[0,0]] }
            ]
        }"#;
        let set = parse_artifact(json).unwrap();
        assert_eq!(set.polygons.len(), 1);
        assert_eq!(set.polygons[0].outer.len(), 3);
    }

    #[test]
    fn zero_usable_polygons_fails() {
        let json = br#"{ "image_w": 100, "image_h": 100, "polygons": [ { "outer": [[1,1],[2,2]] } ] }"#;
        let err = parse_artifact(json).unwrap_err();
        assert!(matches!(err, ContourError::NoUsablePolygons { total: 1 }));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(parse_artifact(b"not json"), Err(ContourError::Json(_))));
    }
}
