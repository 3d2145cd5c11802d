// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Splits samples into two sets:
//   - Training set: used to fit model parameters
//   - Test set:     used to measure performance on unseen data
//
// By default the split is sequential: the first
// floor(n · fraction) samples train and the rest test. The
// synthetic generators already draw rows independently, so the
// order carries no structure worth shuffling away.
//
// Loaded datasets may be sorted (by site, by date...). Passing a
// shuffle seed runs a seeded Fisher-Yates shuffle first, via
// rand::seq::SliceRandom, so the split stays reproducible.
//
// Split ratio: 80% training, 20% test (configurable)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Split `samples` into (train, test).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, clamped to [0, 1]
/// * `shuffle_seed`   - Shuffle with this seed before splitting
pub fn split_train_test<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    shuffle_seed: Option<u64>,
) -> (Vec<T>, Vec<T>) {
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        samples.shuffle(&mut rng);
    }

    let total = samples.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    // Truncation, not rounding: 0.8 · 1001 → 800 training rows
    let split_at = ((total as f64) * fraction) as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        samples.len(),
        test.len(),
        (samples.len() * 100) / total.max(1),
        (test.len() * 100) / total.max(1),
    );

    (samples, test)
}
