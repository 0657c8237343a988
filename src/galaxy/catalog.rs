//! Catalog records for galaxy construction
//!
//! Catalogs are arrays of key/value records; unknown keys are ignored and
//! missing keys take defaults, so sparse entries stay valid.

use serde::Deserialize;

use crate::core::error::Error;
use crate::core::types::Result;

/// One catalog entry describing a galaxy
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    /// Fraction of blobs to render, [0, 1]
    #[serde(rename = "Detail")]
    pub detail: f32,
    /// Hubble type code; unrecognized values fall back to "Irr"
    #[serde(rename = "Type")]
    pub kind: String,
    /// Template file name under the asset directory; empty means the
    /// standard form for the type
    #[serde(rename = "CustomTemplate")]
    pub custom_template: String,
    #[serde(rename = "Position")]
    pub position: [f32; 3],
    /// Orientation axis (normalized at load)
    #[serde(rename = "Axis")]
    pub axis: [f32; 3],
    /// Orientation angle in degrees
    #[serde(rename = "Angle")]
    pub angle: f32,
    #[serde(rename = "Radius")]
    pub radius: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            detail: 1.0,
            kind: String::new(),
            custom_template: String::new(),
            position: [0.0; 3],
            axis: [0.0, 1.0, 0.0],
            angle: 0.0,
            radius: 1.0,
        }
    }
}

/// Parse a JSON catalog into galaxy records
pub fn load_catalog(json: &str) -> Result<Vec<GalaxyParams>> {
    serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let records = load_catalog(
            r#"[{
                "Detail": 0.5,
                "Type": "SBa",
                "CustomTemplate": "ring.png",
                "Position": [1.0, 2.0, 3.0],
                "Axis": [0.0, 0.0, 1.0],
                "Angle": 90.0,
                "Radius": 12.5
            }]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        let p = &records[0];
        assert_eq!(p.detail, 0.5);
        assert_eq!(p.kind, "SBa");
        assert_eq!(p.custom_template, "ring.png");
        assert_eq!(p.position, [1.0, 2.0, 3.0]);
        assert_eq!(p.radius, 12.5);
    }

    #[test]
    fn test_sparse_record_takes_defaults() {
        let records = load_catalog(r#"[{"Type": "E3"}]"#).unwrap();
        let p = &records[0];
        assert_eq!(p.detail, 1.0);
        assert_eq!(p.kind, "E3");
        assert!(p.custom_template.is_empty());
        assert_eq!(p.radius, 1.0);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(load_catalog("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_catalog_is_error() {
        assert!(load_catalog("{not json").is_err());
    }
}
