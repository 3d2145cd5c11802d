// ============================================================
// Layer 5 — Feed-forward Neural Network (Burn)
// ============================================================
// A single hidden layer regressor:
//
//   h = sigmoid(x·W1 + b1)        [n, hidden]
//   ŷ = h·W2 + b2                 [n, 1]   (linear output)
//
// Training details:
//   - W1, W2 ~ N(0, 0.1) from a seeded StdRng, biases start at 0,
//     so two runs with the same seed produce identical weights
//   - the target is standardised before training and predictions
//     are mapped back with the stored mean / std
//   - full-batch gradient descent (Burn's SGD without momentum)
//     on ½·MSE, so the output gradient is (ŷ − y)/n
//
// The model trains on Autodiff<NdArray>; model.valid() strips the
// autodiff wrapper for inference on plain NdArray.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    module::{AutodiffModule, Param},
    nn::{
        loss::{MseLoss, Reduction},
        Linear,
    },
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::activation::sigmoid,
};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::domain::error::ModelError;
use crate::domain::params::{ModelParams, NetworkParams};
use crate::domain::traits::{check_feature_count, check_training_data, Regressor};

type TrainBackend = Autodiff<NdArray>;
type InferBackend = NdArray;

/// Added to the target std so a constant target cannot divide by 0.
const STD_EPSILON: f64 = 1e-8;
const INIT_STD: f32 = 0.1;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct NeuralNetworkConfig {
    #[config(default = 15)]
    pub hidden_size: usize,
    #[config(default = 0.01)]
    pub learning_rate: f64,
    #[config(default = 100)]
    pub epochs: usize,
    #[config(default = 42)]
    pub seed: u64,
    /// Record the training loss every this many epochs
    #[config(default = 20)]
    pub log_every: usize,
}

#[derive(Module, Debug)]
pub struct CarbonNet<B: Backend> {
    hidden: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> CarbonNet<B> {
    /// x: [batch, features] → [batch, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let h = sigmoid(self.hidden.forward(x));
        self.output.forward(h)
    }

    /// Build the module from a weight snapshot.
    pub fn from_params(p: &NetworkParams, device: &B::Device) -> Self {
        let n_features = p.n_features();
        let hidden_size = p.hidden_size();
        let w1: Vec<f32> = p.hidden_weights.iter().flatten().copied().collect();

        Self {
            hidden: linear_layer(w1, p.hidden_bias.clone(), n_features, hidden_size, device),
            output: linear_layer(p.output_weights.clone(), vec![p.output_bias], hidden_size, 1, device),
        }
    }

    /// Export weights; target statistics are supplied by the caller.
    pub fn to_params(&self, target_mean: f64, target_std: f64) -> Result<NetworkParams, ModelError> {
        let [n_features, hidden_size] = self.hidden.weight.val().dims();

        let w1 = tensor_values(self.hidden.weight.val())?;
        let b1 = match &self.hidden.bias {
            Some(b) => tensor_values(b.val())?,
            None => vec![0.0; hidden_size],
        };
        let w2 = tensor_values(self.output.weight.val())?;
        let b2 = match &self.output.bias {
            Some(b) => tensor_values(b.val())?.first().copied().unwrap_or(0.0),
            None => 0.0,
        };

        Ok(NetworkParams {
            hidden_weights: w1.chunks(hidden_size.max(1)).map(<[f32]>::to_vec).take(n_features).collect(),
            hidden_bias: b1,
            output_weights: w2,
            output_bias: b2,
            target_mean,
            target_std,
        })
    }
}

fn linear_layer<B: Backend>(
    weight: Vec<f32>,
    bias: Vec<f32>,
    d_input: usize,
    d_output: usize,
    device: &B::Device,
) -> Linear<B> {
    // Burn stores Linear weights as [d_input, d_output]
    Linear {
        weight: Param::from_tensor(Tensor::from_data(TensorData::new(weight, [d_input, d_output]), device)),
        bias: Some(Param::from_tensor(Tensor::from_data(TensorData::new(bias, [d_output]), device))),
    }
}

fn tensor_values<B: Backend, const D: usize>(t: Tensor<B, D>) -> Result<Vec<f32>, ModelError> {
    t.into_data()
        .to_vec::<f32>()
        .map_err(|e| ModelError::Tensor(format!("{e:?}")))
}

fn to_tensor<B: Backend>(x: &Array2<f64>, device: &B::Device) -> Tensor<B, 2> {
    let values: Vec<f32> = x.iter().map(|v| *v as f32).collect();
    Tensor::from_data(TensorData::new(values, [x.nrows(), x.ncols()]), device)
}

/// Initial weights: N(0, 0.1) matrices, zero biases.
fn initial_params(n_features: usize, cfg: &NeuralNetworkConfig) -> Result<NetworkParams, ModelError> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let normal = Normal::new(0.0f32, INIT_STD).map_err(|e| ModelError::Tensor(e.to_string()))?;

    let hidden_weights = (0..n_features)
        .map(|_| (0..cfg.hidden_size).map(|_| normal.sample(&mut rng)).collect())
        .collect();
    let output_weights = (0..cfg.hidden_size).map(|_| normal.sample(&mut rng)).collect();

    Ok(NetworkParams {
        hidden_weights,
        hidden_bias: vec![0.0; cfg.hidden_size],
        output_weights,
        output_bias: 0.0,
        target_mean: 0.0,
        target_std: 1.0,
    })
}

struct FittedNetwork {
    model: CarbonNet<InferBackend>,
    params: NetworkParams,
}

pub struct NeuralNetwork {
    config: NeuralNetworkConfig,
    device: NdArrayDevice,
    fitted: Option<FittedNetwork>,
    loss_history: Vec<(usize, f64)>,
}

impl NeuralNetwork {
    pub const NAME: &'static str = "Neural Network";

    pub fn new(config: NeuralNetworkConfig) -> Self {
        Self {
            config,
            device: NdArrayDevice::default(),
            fitted: None,
            loss_history: Vec::new(),
        }
    }

    pub fn from_params(params: NetworkParams) -> Self {
        let device = NdArrayDevice::default();
        let model = CarbonNet::from_params(&params, &device);
        let config = NeuralNetworkConfig::new().with_hidden_size(params.hidden_size());
        Self {
            config,
            device,
            fitted: Some(FittedNetwork { model, params }),
            loss_history: Vec::new(),
        }
    }
}

impl Regressor for NeuralNetwork {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_data(x, y)?;
        let cfg = &self.config;

        let y_mean = y.mean().ok_or(ModelError::EmptyInput)?;
        let y_std = y.std(0.0);
        let y_norm = y.mapv(|v| (v - y_mean) / (y_std + STD_EPSILON));

        let inputs = to_tensor::<TrainBackend>(x, &self.device);
        let targets = to_tensor::<TrainBackend>(&y_norm.insert_axis(ndarray::Axis(1)), &self.device);

        let init = initial_params(x.ncols(), cfg)?;
        let mut model: CarbonNet<TrainBackend> = CarbonNet::from_params(&init, &self.device);

        // Plain gradient descent: no momentum, no weight decay
        let mut optim = SgdConfig::new().init();
        let mse = MseLoss::new();
        self.loss_history.clear();

        for epoch in 0..cfg.epochs {
            let output = model.forward(inputs.clone());
            let loss = mse.forward(output, targets.clone(), Reduction::Mean);

            if cfg.log_every > 0 && epoch % cfg.log_every == 0 {
                let value: f64 = loss.clone().into_scalar().elem::<f64>();
                println!("  Epoch {}, Loss: {:.4}", epoch, value);
                self.loss_history.push((epoch, value));
            }

            let grads = (loss / 2.0_f64).backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let model = model.valid();
        let params = model.to_params(y_mean, y_std)?;
        self.fitted = Some(FittedNetwork { model, params });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| ModelError::NotFitted(Self::NAME.to_string()))?;
        check_feature_count(fitted.params.n_features(), x)?;
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }

        let out = fitted.model.forward(to_tensor::<InferBackend>(x, &self.device));
        let scale = fitted.params.target_std;
        let shift = fitted.params.target_mean;
        Ok(tensor_values(out)?
            .into_iter()
            .map(|v| v as f64 * scale + shift)
            .collect())
    }

    fn params(&self) -> Option<ModelParams> {
        self.fitted.as_ref().map(|f| ModelParams::Network(f.params.clone()))
    }

    fn loss_history(&self) -> &[(usize, f64)] {
        &self.loss_history
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::RegressionMetrics;

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((60, 2), |(i, j)| if j == 0 { i as f64 / 60.0 } else { ((i * 7) % 10) as f64 / 10.0 });
        let y = x.map_axis(ndarray::Axis(1), |r| 10.0 + 20.0 * r[0] + 5.0 * r[1]);
        (x, y)
    }

    #[test]
    fn test_snapshot_round_trip_predicts_identically() {
        let (x, y) = data();
        let mut net = NeuralNetwork::new(NeuralNetworkConfig::new().with_epochs(20).with_hidden_size(4));
        net.fit(&x, &y).unwrap();

        let Some(ModelParams::Network(p)) = net.params() else {
            panic!("expected network params");
        };
        assert_eq!(p.n_features(), 2);
        assert_eq!(p.hidden_size(), 4);
        assert_eq!(p.output_weights.len(), 4);

        let restored = NeuralNetwork::from_params(p);
        let a = net.predict(&x).unwrap();
        let b = restored.predict(&x).unwrap();
        for (u, v) in a.iter().zip(b.iter()) {
            assert!((u - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_initial_weights_are_seeded() {
        let cfg = NeuralNetworkConfig::new();
        let a = initial_params(3, &cfg).unwrap();
        let b = initial_params(3, &cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hidden_weights.len(), 3);
        assert_eq!(a.hidden_weights[0].len(), 15);
        assert!(a.hidden_bias.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_loss_is_recorded_and_decreases() {
        let (x, y) = data();
        let mut net = NeuralNetwork::new(
            NeuralNetworkConfig::new().with_epochs(200).with_learning_rate(0.5).with_log_every(50),
        );
        net.fit(&x, &y).unwrap();

        let history = net.loss_history();
        assert_eq!(history.iter().map(|(e, _)| *e).collect::<Vec<_>>(), vec![0, 50, 100, 150]);
        assert!(history.last().unwrap().1 < history[0].1);
    }

    #[test]
    fn test_predictions_are_denormalised() {
        let (x, y) = data();
        let mut net = NeuralNetwork::new(NeuralNetworkConfig::new().with_epochs(300).with_learning_rate(0.5));
        net.fit(&x, &y).unwrap();
        let pred = net.predict(&x).unwrap();
        let m = RegressionMetrics::compute(y.as_slice().unwrap(), pred.as_slice().unwrap()).unwrap();
        // Predictions live on the target's scale, not the unit normal one.
        assert!(m.rmse < y.std(0.0));
    }

    #[test]
    fn test_feature_mismatch_and_unfitted() {
        let net = NeuralNetwork::new(NeuralNetworkConfig::new());
        assert!(matches!(net.predict(&Array2::zeros((1, 3))), Err(ModelError::NotFitted(_))));

        let (x, y) = data();
        let mut net = NeuralNetwork::new(NeuralNetworkConfig::new().with_epochs(1));
        net.fit(&x, &y).unwrap();
        assert!(matches!(
            net.predict(&Array2::zeros((1, 3))),
            Err(ModelError::FeatureMismatch { expected: 2, actual: 3 })
        ));
    }
}
