// ============================================================
// Layer 5 — Linear Regression
// ============================================================
// Ordinary least squares through the normal equations:
//
//   (XᵀX) θ = Xᵀy        with X = [1 | features]
//
// θ[0] is the bias, θ[1..] the per-feature weights. The system is
// tiny (features + 1 unknowns), so it is solved directly with
// Gaussian elimination and partial pivoting rather than pulling
// in a LAPACK binding.

use ndarray::{concatenate, s, Array1, Array2, Axis};

use crate::domain::error::ModelError;
use crate::domain::params::{LinearParams, ModelParams};
use crate::domain::traits::{check_feature_count, check_training_data, Regressor};

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-10;

/// Solve `a · x = b` by Gaussian elimination with partial pivoting.
///
/// A (near-)zero pivot means the column is linearly dependent on
/// earlier ones. Elimination skips it, and back substitution pins
/// that unknown to 0 so the rest of the solution stays finite.
pub fn solve_linear_system(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let n = b.len();

    // ── Forward elimination ───────────────────────────────────────────────────
    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[[k, i]].abs() > a[[max_row, i]].abs() {
                max_row = k;
            }
        }

        if max_row != i {
            for j in 0..n {
                a.swap([i, j], [max_row, j]);
            }
            b.swap(i, max_row);
        }

        let pivot = a[[i, i]];
        if pivot.abs() < PIVOT_EPSILON {
            continue;
        }
        for k in (i + 1)..n {
            let factor = a[[k, i]] / pivot;
            for j in i..n {
                a[[k, j]] -= factor * a[[i, j]];
            }
            b[k] -= factor * b[i];
        }
    }

    // ── Back substitution ─────────────────────────────────────────────────────
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let pivot = a[[i, i]];
        if pivot.abs() <= PIVOT_EPSILON {
            tracing::warn!("Singular normal equations: coefficient {} pinned to 0", i);
            continue;
        }
        let tail = a.slice(s![i, (i + 1)..]).dot(&x.slice(s![(i + 1)..]));
        x[i] = (b[i] - tail) / pivot;
    }

    x
}

#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    params: Option<LinearParams>,
}

impl LinearRegression {
    pub const NAME: &'static str = "Linear Regression";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: LinearParams) -> Self {
        Self { params: Some(params) }
    }

    /// Fitted bias and weights.
    pub fn coefficients(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}

/// `x · w + b` for a fitted parameter set.
pub(crate) fn predict_linear(params: &LinearParams, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
    check_feature_count(params.weights.len(), x)?;
    let w = Array1::from(params.weights.clone());
    Ok(x.dot(&w) + params.bias)
}

pub(crate) fn fit_linear(x: &Array2<f64>, y: &Array1<f64>) -> Result<LinearParams, ModelError> {
    check_training_data(x, y)?;

    let ones = Array2::<f64>::ones((x.nrows(), 1));
    let design = concatenate(Axis(1), &[ones.view(), x.view()])
        .map_err(|e| ModelError::Tensor(e.to_string()))?;

    let xtx = design.t().dot(&design);
    let xty = design.t().dot(y);
    let theta = solve_linear_system(xtx, xty);

    Ok(LinearParams {
        bias: theta[0],
        weights: theta.slice(s![1..]).to_vec(),
    })
}

impl Regressor for LinearRegression {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let params = fit_linear(x, y)?;
        tracing::debug!("Linear fit: bias={:.4}, weights={:?}", params.bias, params.weights);
        self.params = Some(params);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let params = self
            .params
            .as_ref()
            .ok_or_else(|| ModelError::NotFitted(Self::NAME.to_string()))?;
        predict_linear(params, x)
    }

    fn params(&self) -> Option<ModelParams> {
        self.params.clone().map(ModelParams::Linear)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_solver_needs_pivoting() {
        // a[0][0] = 0 forces a row swap
        let a = array![[0.0, 2.0, 1.0], [1.0, 1.0, 1.0], [2.0, 1.0, 3.0]];
        let b = array![5.0, 6.0, 13.0];
        let x = solve_linear_system(a, b);
        let check = array![[0.0, 2.0, 1.0], [1.0, 1.0, 1.0], [2.0, 1.0, 3.0]].dot(&x);
        for (got, want) in check.iter().zip([5.0, 6.0, 13.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_solver_singular_pins_free_variable() {
        // second column duplicates the first
        let a = array![[1.0, 1.0], [1.0, 1.0]];
        let b = array![2.0, 2.0];
        let x = solve_linear_system(a, b);
        assert!(x.iter().all(|v| v.is_finite()));
        assert!((x[0] + x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_exact_coefficients() {
        // y = 2 + 3a - 0.5b + 0.25c
        let x = array![
            [0.1, 10.0, 1.0],
            [0.4, 20.0, 3.0],
            [0.9, 5.0, 2.0],
            [0.3, 50.0, 7.0],
            [0.7, 35.0, 4.5],
            [0.2, 80.0, 0.5],
        ];
        let y = x.map_axis(Axis(1), |r| 2.0 + 3.0 * r[0] - 0.5 * r[1] + 0.25 * r[2]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let p = model.coefficients().unwrap();

        assert!((p.bias - 2.0).abs() < 1e-8);
        assert!((p.weights[0] - 3.0).abs() < 1e-8);
        assert!((p.weights[1] + 0.5).abs() < 1e-8);
        assert!((p.weights[2] - 0.25).abs() < 1e-8);

        let pred = model.predict(&x).unwrap();
        for (a, b) in pred.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LinearRegression::new();
        let x = Array2::<f64>::zeros((2, 3));
        assert!(matches!(model.predict(&x), Err(ModelError::NotFitted(_))));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let model = LinearRegression::from_params(LinearParams { bias: 1.0, weights: vec![1.0, 2.0] });
        let x = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            model.predict(&x),
            Err(ModelError::FeatureMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_params_snapshot() {
        let model = LinearRegression::from_params(LinearParams { bias: 1.0, weights: vec![2.0] });
        assert_eq!(
            model.params(),
            Some(ModelParams::Linear(LinearParams { bias: 1.0, weights: vec![2.0] }))
        );
    }
}
