// ============================================================
// Layer 5 — Random Forest
// ============================================================
// A bootstrap ensemble of randomised regression trees.
//
// For each tree:
//   1. Draw n rows with replacement (bootstrap sample)
//   2. Draw max(1, ⌊√features⌋) distinct feature columns
//   3. Grow a tree on that sample and column subset
//
// Tree growth is deliberately cheap: instead of scanning every
// threshold, each node tries a handful of random (column,
// threshold) candidates and keeps the one with the lowest
// size-weighted variance. A node becomes a leaf (predicting the
// mean target) when it is too deep, too small, or already
// nearly constant.
//
// The forest predicts the mean of its trees' predictions.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use crate::domain::error::ModelError;
use crate::domain::params::{ModelParams, TreeNode};
use crate::domain::traits::{check_feature_count, check_training_data, Regressor};

/// Nodes with fewer samples become leaves.
const MIN_SAMPLES_SPLIT: usize = 5;
/// Nodes whose target variance is below this become leaves.
const MIN_VARIANCE: f64 = 0.1;
/// Each side of a split needs at least this many samples.
const MIN_SAMPLES_LEAF: usize = 2;
/// Upper bound on random split candidates per node.
const MAX_SPLIT_CANDIDATES: usize = 10;

#[derive(Debug, Clone)]
pub struct RandomForest {
    n_trees: usize,
    max_depth: usize,
    seed: u64,
    n_features: usize,
    trees: Vec<TreeNode>,
}

struct Candidate {
    score: f64,
    column: usize,
    threshold: f64,
}

impl RandomForest {
    pub const NAME: &'static str = "Random Forest";

    pub fn new(n_trees: usize, max_depth: usize, seed: u64) -> Self {
        Self { n_trees, max_depth, seed, n_features: 0, trees: Vec::new() }
    }

    pub fn from_params(n_features: usize, trees: Vec<TreeNode>) -> Self {
        let max_depth = trees.iter().map(TreeNode::depth).max().unwrap_or(0);
        Self { n_trees: trees.len(), max_depth, seed: 0, n_features, trees }
    }

    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }

    /// Grow one node. `columns[i]` maps column i of `x` back to the
    /// full feature index stored in split nodes.
    fn grow(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        columns: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let mean = y.mean().unwrap_or(0.0);
        if depth >= self.max_depth || y.len() < MIN_SAMPLES_SPLIT || y.var(0.0) < MIN_VARIANCE {
            return TreeNode::Leaf { value: mean };
        }

        let mut best: Option<Candidate> = None;
        for _ in 0..MAX_SPLIT_CANDIDATES.min(x.ncols()) {
            let column = rng.gen_range(0..x.ncols());
            let values = x.column(column);
            let (lo, hi) = min_max(values);
            // lo + u·(hi − lo) overflows for columns spanning ±f64::MAX
            let threshold = if lo < hi { lo + rng.gen::<f64>() * (hi - lo) } else { lo };
            if !threshold.is_finite() {
                continue;
            }

            let n_left = values.iter().filter(|v| **v <= threshold).count();
            let n_right = values.len() - n_left;
            if n_left < MIN_SAMPLES_LEAF || n_right < MIN_SAMPLES_LEAF {
                continue;
            }

            let (left_y, right_y): (Vec<f64>, Vec<f64>) = values
                .iter()
                .zip(y.iter())
                .fold((Vec::new(), Vec::new()), |(mut l, mut r), (v, t)| {
                    if *v <= threshold { l.push(*t) } else { r.push(*t) }
                    (l, r)
                });
            let score = (n_left as f64 * variance(&left_y) + n_right as f64 * variance(&right_y))
                / y.len() as f64;

            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(Candidate { score, column, threshold });
            }
        }

        let Some(split) = best else {
            return TreeNode::Leaf { value: mean };
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            (0..x.nrows()).partition(|&i| x[[i, split.column]] <= split.threshold);

        let left = self.grow(
            &x.select(Axis(0), &left_rows),
            &y.select(Axis(0), &left_rows),
            columns,
            depth + 1,
            rng,
        );
        let right = self.grow(
            &x.select(Axis(0), &right_rows),
            &y.select(Axis(0), &right_rows),
            columns,
            depth + 1,
            rng,
        );

        TreeNode::Split {
            feature: columns[split.column],
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

fn min_max(values: ArrayView1<f64>) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

impl Regressor for RandomForest {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_data(x, y)?;

        let (n_samples, n_features) = x.dim();
        let subset_size = ((n_features as f64).sqrt() as usize).max(1).min(n_features);
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.n_features = n_features;
        self.trees = Vec::with_capacity(self.n_trees);

        for t in 0..self.n_trees {
            let rows: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let columns = index::sample(&mut rng, n_features, subset_size).into_vec();

            let x_boot = x.select(Axis(0), &rows).select(Axis(1), &columns);
            let y_boot = y.select(Axis(0), &rows);

            let tree = self.grow(&x_boot, &y_boot, &columns, 0, &mut rng);
            tracing::debug!("Tree {} grown on features {:?}, depth {}", t, columns, tree.depth());
            self.trees.push(tree);
        }

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted(Self::NAME.to_string()));
        }
        check_feature_count(self.n_features, x)?;

        let n_trees = self.trees.len() as f64;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let row = row.to_vec();
                self.trees.iter().map(|t| t.predict(&row)).sum::<f64>() / n_trees
            })
            .collect())
    }

    fn params(&self) -> Option<ModelParams> {
        if self.trees.is_empty() {
            return None;
        }
        Some(ModelParams::Forest { n_features: self.n_features, trees: self.trees.clone() })
    }
}
