use rand::rngs::StdRng;
use rand::Rng;

use oat_core::{Activation, ConfigError, ModelConfig};

/// One fully connected layer; `weights[o][i]` maps input `i` to output `o`.
#[derive(Debug, Clone)]
pub(crate) struct Linear {
    pub(crate) weights: Vec<Vec<f64>>,
    pub(crate) biases: Vec<f64>,
}

impl Linear {
    fn init(in_dim: usize, out_dim: usize, rng: &mut StdRng) -> Self {
        // Uniform init in ±1/√fan_in.
        let bound = 1.0 / (in_dim as f64).sqrt();
        let weights = (0..out_dim)
            .map(|_| (0..in_dim).map(|_| rng.gen_range(-bound..bound)).collect())
            .collect();
        let biases = (0..out_dim).map(|_| rng.gen_range(-bound..bound)).collect();
        Linear { weights, biases }
    }

    fn forward(&self, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        inputs
            .iter()
            .map(|row| {
                self.weights
                    .iter()
                    .zip(&self.biases)
                    .map(|(weights, bias)| {
                        weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + bias
                    })
                    .collect()
            })
            .collect()
    }

    fn in_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn out_dim(&self) -> usize {
        self.biases.len()
    }
}

/// Per-layer gradient (or accumulator) storage mirroring the layer shapes.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub(crate) weights: Vec<Vec<Vec<f64>>>,
    pub(crate) biases: Vec<Vec<f64>>,
}

/// Everything the backward pass needs from one training-mode forward pass.
pub struct TrainingPass {
    layer_inputs: Vec<Vec<Vec<f64>>>,
    hidden_outputs: Vec<Vec<Vec<f64>>>,
    masks: Vec<Vec<Vec<f64>>>,
    pub predictions: Vec<f64>,
}

/// Feed-forward regression network: input → hidden widths → one output unit.
/// Hidden layers apply the configured activation followed by inverted
/// dropout; the output layer is linear (raw regression output). With zero
/// hidden layers the network degenerates to a single linear map.
#[derive(Debug)]
pub struct Mlp {
    pub(crate) layers: Vec<Linear>,
    activation: Activation,
    dropout: f64,
}

impl Mlp {
    /// Build a fresh network for `input_dim` features. Fails fast when the
    /// hidden unit list does not agree with the declared layer count.
    pub fn new(input_dim: usize, config: &ModelConfig, rng: &mut StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut dims = Vec::with_capacity(config.hidden_layers + 2);
        dims.push(input_dim);
        dims.extend(config.hidden_units.iter().copied());
        dims.push(1);

        let layers = dims
            .windows(2)
            .map(|pair| Linear::init(pair[0], pair[1], rng))
            .collect();
        Ok(Mlp {
            layers,
            activation: config.activation,
            dropout: config.dropout,
        })
    }

    pub fn hidden_layers(&self) -> usize {
        self.layers.len() - 1
    }

    /// Inference-mode forward pass: no dropout, one prediction per row.
    pub fn predict(&self, inputs: &[Vec<f64>]) -> Vec<f64> {
        let hidden = self.hidden_layers();
        let mut current = inputs.to_vec();
        for (position, layer) in self.layers.iter().enumerate() {
            let mut z = layer.forward(&current);
            if position < hidden {
                for row in &mut z {
                    for value in row.iter_mut() {
                        *value = self.activation.apply(*value);
                    }
                }
            }
            current = z;
        }
        current.into_iter().map(|row| row[0]).collect()
    }

    /// Training-mode forward pass: activation then a fresh dropout mask after
    /// every hidden layer, with all intermediates cached for [`Mlp::backward`].
    pub fn forward_train(&self, inputs: &[Vec<f64>], rng: &mut StdRng) -> TrainingPass {
        let hidden = self.hidden_layers();
        let keep_scale = 1.0 / (1.0 - self.dropout);
        let mut layer_inputs = Vec::with_capacity(self.layers.len());
        let mut hidden_outputs = Vec::with_capacity(hidden);
        let mut masks = Vec::with_capacity(hidden);

        let mut current = inputs.to_vec();
        let mut predictions = Vec::new();
        for (position, layer) in self.layers.iter().enumerate() {
            layer_inputs.push(current.clone());
            let z = layer.forward(&current);
            if position < hidden {
                let activated: Vec<Vec<f64>> = z
                    .iter()
                    .map(|row| row.iter().map(|v| self.activation.apply(*v)).collect())
                    .collect();
                let mask: Vec<Vec<f64>> = activated
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|_| {
                                if rng.gen::<f64>() < self.dropout {
                                    0.0
                                } else {
                                    keep_scale
                                }
                            })
                            .collect()
                    })
                    .collect();
                current = activated
                    .iter()
                    .zip(&mask)
                    .map(|(row, mask_row)| {
                        row.iter().zip(mask_row).map(|(v, m)| v * m).collect()
                    })
                    .collect();
                hidden_outputs.push(activated);
                masks.push(mask);
            } else {
                predictions = z.into_iter().map(|row| row[0]).collect();
            }
        }

        TrainingPass {
            layer_inputs,
            hidden_outputs,
            masks,
            predictions,
        }
    }

    /// Hand-derived gradients of the mean-squared-error objective with
    /// respect to every weight and bias, for the cached forward pass.
    pub fn backward(&self, pass: &TrainingPass, targets: &[f64]) -> Gradients {
        let n = targets.len();
        assert_eq!(pass.predictions.len(), n, "forward pass and targets disagree");
        let scale = 2.0 / n as f64;

        // Output-layer error: d(MSE)/d(prediction).
        let mut delta: Vec<Vec<f64>> = pass
            .predictions
            .iter()
            .zip(targets)
            .map(|(pred, target)| vec![scale * (pred - target)])
            .collect();

        let mut weight_grads = vec![Vec::new(); self.layers.len()];
        let mut bias_grads = vec![Vec::new(); self.layers.len()];

        for position in (0..self.layers.len()).rev() {
            let layer = &self.layers[position];
            let inputs = &pass.layer_inputs[position];
            let (out_dim, in_dim) = (layer.out_dim(), layer.in_dim());

            let mut gw = vec![vec![0.0; in_dim]; out_dim];
            let mut gb = vec![0.0; out_dim];
            for (row, d_row) in inputs.iter().zip(&delta) {
                for (o, d) in d_row.iter().enumerate() {
                    gb[o] += d;
                    for (j, x) in row.iter().enumerate() {
                        gw[o][j] += d * x;
                    }
                }
            }
            weight_grads[position] = gw;
            bias_grads[position] = gb;

            if position > 0 {
                // Propagate through this layer's weights, then the previous
                // hidden layer's dropout mask and activation.
                let outputs = &pass.hidden_outputs[position - 1];
                let mask = &pass.masks[position - 1];
                let mut next_delta = vec![vec![0.0; in_dim]; delta.len()];
                for (i, d_row) in delta.iter().enumerate() {
                    for j in 0..in_dim {
                        let mut sum = 0.0;
                        for (o, d) in d_row.iter().enumerate() {
                            sum += d * layer.weights[o][j];
                        }
                        next_delta[i][j] = sum
                            * mask[i][j]
                            * self.activation.grad_from_output(outputs[i][j]);
                    }
                }
                delta = next_delta;
            }
        }

        Gradients {
            weights: weight_grads,
            biases: bias_grads,
        }
    }
}
