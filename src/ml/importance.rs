// ============================================================
// Layer 5 — Feature Importance
// ============================================================
// Two cheap, model-agnostic-ish rankings:
//
//   correlation_importance — |Pearson r| between each feature
//                            column and the target
//   coefficient_importance — |weight| of a fitted linear model
//
// Both return (feature name, score) sorted from most to least
// important. Ties keep column order.

use ndarray::{Array1, Array2, ArrayView1};

use crate::domain::params::LinearParams;

pub type Ranking = Vec<(String, f64)>;

/// Pearson correlation; `None` when either side has no variance.
pub fn pearson(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Option<f64> {
    let n = a.len();
    if n == 0 || n != b.len() {
        return None;
    }
    let mean_a = a.sum() / n as f64;
    let mean_b = b.sum() / n as f64;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b.iter()) {
        let (da, db) = (x - mean_a, y - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let r = cov / (var_a * var_b).sqrt();
    r.is_finite().then_some(r)
}

pub fn correlation_importance(x: &Array2<f64>, y: &Array1<f64>, names: &[String]) -> Ranking {
    let ranking = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i < x.ncols())
        .map(|(i, name)| {
            let score = pearson(x.column(i), y.view()).map_or(0.0, f64::abs);
            (name.clone(), score)
        })
        .collect();
    sorted(ranking)
}

pub fn coefficient_importance(params: &LinearParams, names: &[String]) -> Ranking {
    let ranking = names
        .iter()
        .zip(&params.weights)
        .map(|(name, w)| (name.clone(), w.abs()))
        .collect();
    sorted(ranking)
}

fn sorted(mut ranking: Ranking) -> Ranking {
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_pearson_extremes() {
        let a = array![1.0, 2.0, 3.0, 4.0];
        let b = array![8.0, 6.0, 4.0, 2.0];
        assert!((pearson(a.view(), a.view()).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(a.view(), b.view()).unwrap() + 1.0).abs() < 1e-12);
        assert!(pearson(a.view(), array![5.0, 5.0, 5.0, 5.0].view()).is_none());
    }

    #[test]
    fn test_correlation_ranking() {
        // column b tracks y exactly, c is anti-correlated but noisy,
        // a is constant
        let x = array![[1.0, 1.0, 4.0], [1.0, 2.0, 2.0], [1.0, 3.0, 3.0], [1.0, 4.0, 1.0]];
        let y = array![10.0, 20.0, 30.0, 40.0];
        let r = correlation_importance(&x, &y, &names());

        assert_eq!(r[0].0, "b");
        assert!((r[0].1 - 1.0).abs() < 1e-12);
        assert_eq!(r[1].0, "c");
        assert_eq!(r[2], ("a".to_string(), 0.0));
    }

    #[test]
    fn test_coefficient_ranking_uses_magnitude() {
        let p = LinearParams { bias: 3.0, weights: vec![0.5, -7.0, 2.0] };
        let r = coefficient_importance(&p, &names());
        assert_eq!(
            r,
            vec![("b".to_string(), 7.0), ("c".to_string(), 2.0), ("a".to_string(), 0.5)]
        );
    }
}
