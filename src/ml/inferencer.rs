// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Rebuilds a regressor from a saved parameter snapshot and runs
// predictions for raw feature rows.

use anyhow::{ensure, Result};
use ndarray::Array2;

use crate::domain::params::ModelParams;
use crate::domain::traits::Regressor;
use crate::ml::boosting::GradientBoosting;
use crate::ml::forest::RandomForest;
use crate::ml::linear::LinearRegression;
use crate::ml::network::NeuralNetwork;

/// Turn a snapshot back into a ready-to-predict model.
pub fn restore(params: ModelParams) -> Box<dyn Regressor> {
    match params {
        ModelParams::Linear(p) => Box::new(LinearRegression::from_params(p)),
        ModelParams::Forest { n_features, trees } => Box::new(RandomForest::from_params(n_features, trees)),
        ModelParams::Boosting { n_features, initial_prediction, learning_rate, stages } => Box::new(
            GradientBoosting::from_params(n_features, initial_prediction, learning_rate, stages),
        ),
        ModelParams::Network(p) => Box::new(NeuralNetwork::from_params(p)),
    }
}

pub struct Inferencer {
    model: Box<dyn Regressor>,
    feature_names: Vec<String>,
}

impl Inferencer {
    pub fn new(params: ModelParams, feature_names: Vec<String>) -> Result<Self> {
        ensure!(
            params.n_features() == feature_names.len(),
            "model expects {} features but {} names were saved",
            params.n_features(),
            feature_names.len()
        );
        if let ModelParams::Network(p) = &params {
            p.check_shape()?;
        }
        if let ModelParams::Forest { n_features, trees } = &params {
            let max = trees.iter().filter_map(|t| t.max_feature()).max();
            ensure!(
                max.map_or(true, |f| f < *n_features),
                "forest splits on feature {:?} but only {} features exist",
                max,
                n_features
            );
        }
        Ok(Self { model: restore(params), feature_names })
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Predict one value per row.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        let width = self.feature_names.len();
        for (i, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == width,
                "row {} has {} values, expected {} ({})",
                i,
                row.len(),
                width,
                self.feature_names.join(", ")
            );
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let x = Array2::from_shape_vec((rows.len(), width), flat)?;
        let pred = self.model.predict(&x)?;

        tracing::debug!("{} predicted {} rows", self.model.name(), rows.len());
        Ok(pred.to_vec())
    }
}
