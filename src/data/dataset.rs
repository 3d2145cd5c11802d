use anyhow::{ensure, Result};
use ndarray::{Array1, Array2};

use crate::data::splitter::split_train_test;
use crate::domain::sample::FeatureTable;

/// A feature table divided into training and test partitions,
/// with the design matrices models consume.
pub struct CarbonDataset {
    pub feature_names: Vec<String>,
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
    /// Test rows as loaded, for per-sample reporting
    pub test_table: FeatureTable,
}

impl CarbonDataset {
    pub fn split(table: FeatureTable, train_fraction: f64, shuffle_seed: Option<u64>) -> Result<Self> {
        ensure!(!table.is_empty(), "dataset has no samples");

        let (train, test) = split_train_test(table.samples.clone(), train_fraction, shuffle_seed);
        ensure!(!train.is_empty(), "train fraction {train_fraction} leaves no training samples");
        ensure!(!test.is_empty(), "train fraction {train_fraction} leaves no test samples");

        let train_table = table.with_samples(train);
        let test_table = table.with_samples(test);

        Ok(Self {
            feature_names: table.feature_names,
            x_train: train_table.features(),
            y_train: train_table.targets(),
            x_test: test_table.features(),
            y_test: test_table.targets(),
            test_table,
        })
    }

    pub fn train_len(&self) -> usize {
        self.y_train.len()
    }

    pub fn test_len(&self) -> usize {
        self.y_test.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::UniformGenerator;
    use crate::domain::traits::SampleSource;

    #[test]
    fn test_split_shapes() {
        let table = UniformGenerator::new(100, 42).load().unwrap();
        let ds = CarbonDataset::split(table.clone(), 0.8, None).unwrap();
        assert_eq!(ds.x_train.dim(), (80, 3));
        assert_eq!(ds.x_test.dim(), (20, 3));
        assert_eq!(ds.y_test[0], table.samples[80].target);
        assert_eq!(ds.test_table.len(), 20);
    }

    #[test]
    fn test_rejects_empty_partitions() {
        let table = UniformGenerator::new(10, 42).load().unwrap();
        assert!(CarbonDataset::split(table.clone(), 0.0, None).is_err());
        assert!(CarbonDataset::split(table, 1.0, None).is_err());
    }
}
