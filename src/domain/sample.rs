// ============================================================
// Layer 3 — Sample / Feature Table Domain Types
// ============================================================
// A CarbonSample is one observation: the remote-sensing features
// measured for a plot plus the carbon sequestration estimate for
// it. A FeatureTable is a column-named collection of samples.
//
// The table is row-major (a Vec of samples) because that is how
// both generators and the CSV loader produce data. Models want a
// design matrix instead, so the table converts itself into
// ndarray types on demand.
//
// Reference: Rust Book §5 (Structs and Methods)
//            ndarray crate documentation

use anyhow::{ensure, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Column names used by both synthetic generators.
pub const NDVI: &str = "NDVI";
pub const CANOPY_COVER: &str = "Canopy_Cover_Percent";
pub const SOIL_CARBON: &str = "Soil_Carbon_Percent";

/// Name of the target column in datasets and reports.
pub const TARGET: &str = "Carbon_Sequestration_tCO2e_ha";

/// The default feature columns, in the order models see them.
pub fn default_feature_names() -> Vec<String> {
    vec![NDVI.to_string(), CANOPY_COVER.to_string(), SOIL_CARBON.to_string()]
}

/// One observation: feature values plus the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonSample {
    /// Feature values, in the same order as the owning table's names
    pub features: Vec<f64>,

    /// Carbon sequestration in tCO2e/ha
    pub target: f64,
}

impl CarbonSample {
    pub fn new(features: Vec<f64>, target: f64) -> Self {
        Self { features, target }
    }
}

/// Named feature columns plus the samples that fill them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub feature_names: Vec<String>,
    pub samples: Vec<CarbonSample>,
}

impl FeatureTable {
    /// Build a table, rejecting rows whose width does not match
    /// the number of feature names.
    pub fn new(feature_names: Vec<String>, samples: Vec<CarbonSample>) -> Result<Self> {
        let width = feature_names.len();
        ensure!(width > 0, "a feature table needs at least one feature column");
        for (i, s) in samples.iter().enumerate() {
            ensure!(
                s.features.len() == width,
                "sample {} has {} features, expected {}",
                i,
                s.features.len(),
                width
            );
        }
        Ok(Self { feature_names, samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Row-major design matrix, shape (samples, features).
    pub fn features(&self) -> Array2<f64> {
        let n = self.samples.len();
        let flat: Vec<f64> = self
            .samples
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        // Widths were validated in `new`, so the shape always matches.
        Array2::from_shape_vec((n, self.n_features()), flat)
            .unwrap_or_else(|_| Array2::zeros((n, self.n_features())))
    }

    /// Target column as a vector.
    pub fn targets(&self) -> Array1<f64> {
        self.samples.iter().map(|s| s.target).collect()
    }

    /// Split off a table sharing these column names.
    pub fn with_samples(&self, samples: Vec<CarbonSample>) -> Self {
        Self { feature_names: self.feature_names.clone(), samples }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FeatureTable {
        FeatureTable::new(
            default_feature_names(),
            vec![
                CarbonSample::new(vec![0.5, 40.0, 2.0], 30.0),
                CarbonSample::new(vec![0.7, 80.0, 4.0], 55.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_design_matrix_shape_and_order() {
        let t = table();
        let x = t.features();
        assert_eq!(x.dim(), (2, 3));
        assert_eq!(x[[1, 1]], 80.0);
        assert_eq!(t.targets().to_vec(), vec![30.0, 55.0]);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = FeatureTable::new(
            default_feature_names(),
            vec![CarbonSample::new(vec![0.5, 40.0], 30.0)],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_columns_rejected() {
        assert!(FeatureTable::new(Vec::new(), Vec::new()).is_err());
    }
}
