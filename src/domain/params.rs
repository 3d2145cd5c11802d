// ============================================================
// Layer 3 — Model Parameter Snapshots
// ============================================================
// Every regressor can export its learned state as plain data.
// These snapshots are what gets written into the binary model
// bundle, and what the inferencer rebuilds a model from.
//
// Keeping them framework-free means the bundle format does not
// depend on how a model was trained (the network is trained with
// Burn, but its snapshot is just nested Vecs).

use serde::{Deserialize, Serialize};

use crate::domain::error::ModelError;

/// One node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        /// Column index into the full feature vector
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walk the tree for one feature row. `x[feature] <= threshold`
    /// goes left.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if x[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Largest feature index referenced by any split, if any.
    pub fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split { feature, left, right, .. } => {
                let below = left.max_feature().max(right.max_feature());
                Some(below.map_or(*feature, |b| b.max(*feature)))
            }
        }
    }
}

/// Bias plus one weight per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub bias: f64,
    pub weights: Vec<f64>,
}

/// Weights of the single-hidden-layer network.
///
/// `hidden_weights` is `[n_features][hidden_size]` and
/// `output_weights` is `[hidden_size]`, matching a row-vector
/// forward pass `sigmoid(x·W1 + b1)·W2 + b2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub hidden_weights: Vec<Vec<f32>>,
    pub hidden_bias: Vec<f32>,
    pub output_weights: Vec<f32>,
    pub output_bias: f32,
    pub target_mean: f64,
    pub target_std: f64,
}

impl NetworkParams {
    pub fn n_features(&self) -> usize {
        self.hidden_weights.len()
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_bias.len()
    }

    /// Every weight row and the output layer must match the hidden size.
    pub fn check_shape(&self) -> Result<(), ModelError> {
        let hidden = self.hidden_size();
        if let Some((i, row)) = self.hidden_weights.iter().enumerate().find(|(_, r)| r.len() != hidden) {
            return Err(ModelError::InvalidParams(format!(
                "hidden weight row {} has {} values, expected {}",
                i,
                row.len(),
                hidden
            )));
        }
        if self.output_weights.len() != hidden {
            return Err(ModelError::InvalidParams(format!(
                "{} output weights for {} hidden units",
                self.output_weights.len(),
                hidden
            )));
        }
        Ok(())
    }
}

/// Learned state of any of the supported regressors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelParams {
    Linear(LinearParams),
    Forest {
        n_features: usize,
        trees: Vec<TreeNode>,
    },
    Boosting {
        n_features: usize,
        initial_prediction: f64,
        learning_rate: f64,
        stages: Vec<LinearParams>,
    },
    Network(NetworkParams),
}

impl ModelParams {
    /// Number of input features this snapshot expects.
    pub fn n_features(&self) -> usize {
        match self {
            ModelParams::Linear(p) => p.weights.len(),
            ModelParams::Forest { n_features, .. } => *n_features,
            ModelParams::Boosting { n_features, .. } => *n_features,
            ModelParams::Network(p) => p.n_features(),
        }
    }
}
