use crate::mlp::{Gradients, Mlp};

const ADAGRAD_EPS: f64 = 1e-10;

/// Adagrad: per-parameter accumulation of squared gradients, so frequently
/// updated parameters see a shrinking effective step size.
///
/// `accumulator += g²; parameter -= lr · g / (√accumulator + ε)`
#[derive(Debug)]
pub struct Adagrad {
    learning_rate: f64,
    weight_accum: Vec<Vec<Vec<f64>>>,
    bias_accum: Vec<Vec<f64>>,
}

impl Adagrad {
    /// Zero-initialized accumulators shaped like `model`'s parameters.
    pub fn new(learning_rate: f64, model: &Mlp) -> Self {
        let weight_accum = model
            .layers
            .iter()
            .map(|layer| {
                layer
                    .weights
                    .iter()
                    .map(|row| vec![0.0; row.len()])
                    .collect()
            })
            .collect();
        let bias_accum = model
            .layers
            .iter()
            .map(|layer| vec![0.0; layer.biases.len()])
            .collect();
        Adagrad {
            learning_rate,
            weight_accum,
            bias_accum,
        }
    }

    pub fn step(&mut self, model: &mut Mlp, grads: &Gradients) {
        for (position, layer) in model.layers.iter_mut().enumerate() {
            let layer_weight_accum = &mut self.weight_accum[position];
            for (o, row) in layer.weights.iter_mut().enumerate() {
                for (j, weight) in row.iter_mut().enumerate() {
                    let g = grads.weights[position][o][j];
                    layer_weight_accum[o][j] += g * g;
                    *weight -= self.learning_rate * g
                        / (layer_weight_accum[o][j].sqrt() + ADAGRAD_EPS);
                }
            }
            let layer_bias_accum = &mut self.bias_accum[position];
            for (o, bias) in layer.biases.iter_mut().enumerate() {
                let g = grads.biases[position][o];
                layer_bias_accum[o] += g * g;
                *bias -= self.learning_rate * g / (layer_bias_accum[o].sqrt() + ADAGRAD_EPS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oat_core::{Activation, ModelConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn linear_model() -> Mlp {
        let config = ModelConfig {
            hidden_layers: 0,
            hidden_units: vec![],
            learning_rate: 0.1,
            epochs: 1,
            activation: Activation::Relu,
            dropout: 0.0,
        };
        Mlp::new(1, &config, &mut StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn first_step_is_a_signed_unit_step() {
        let mut model = linear_model();
        let before = model.layers[0].weights[0][0];
        let grads = Gradients {
            weights: vec![vec![vec![0.5]]],
            biases: vec![vec![-0.25]],
        };
        let mut optimizer = Adagrad::new(0.1, &model);
        optimizer.step(&mut model, &grads);
        // g / (√(g²) + ε) ≈ sign(g), so the first update moves by ≈ lr.
        assert!((model.layers[0].weights[0][0] - (before - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn accumulation_shrinks_later_steps() {
        let mut model = linear_model();
        let grads = Gradients {
            weights: vec![vec![vec![1.0]]],
            biases: vec![vec![0.0]],
        };
        let mut optimizer = Adagrad::new(0.1, &model);
        let start = model.layers[0].weights[0][0];
        optimizer.step(&mut model, &grads);
        let first_step = start - model.layers[0].weights[0][0];
        let mid = model.layers[0].weights[0][0];
        optimizer.step(&mut model, &grads);
        let second_step = mid - model.layers[0].weights[0][0];
        assert!(second_step < first_step);
        assert!(second_step > 0.0);
    }
}
