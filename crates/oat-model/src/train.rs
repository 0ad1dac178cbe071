use anyhow::{bail, Result};
use rand::rngs::StdRng;
use tracing::debug;

use crate::metrics::mse;
use crate::mlp::Mlp;
use crate::optim::Adagrad;

/// Consecutive-epoch loss change below which training stops early.
pub const LOSS_PLATEAU_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Training-mode MSE at the last evaluated epoch.
    pub final_loss: f64,
    /// Parameter updates actually applied (< the budget when the loss
    /// plateaued).
    pub epochs_run: usize,
    pub converged: bool,
}

/// Full-batch gradient descent with Adagrad and MSE loss. Runs for up to
/// `epochs` updates, stopping early once the loss changes by less than
/// [`LOSS_PLATEAU_TOLERANCE`] between consecutive epochs.
pub fn train(
    model: &mut Mlp,
    inputs: &[Vec<f64>],
    targets: &[f64],
    epochs: usize,
    learning_rate: f64,
    rng: &mut StdRng,
) -> Result<TrainReport> {
    if inputs.is_empty() {
        bail!("cannot train on an empty batch");
    }
    if inputs.len() != targets.len() {
        bail!(
            "batch has {} rows but {} targets",
            inputs.len(),
            targets.len()
        );
    }

    let mut optimizer = Adagrad::new(learning_rate, model);
    let mut previous_loss = 0.0;
    let mut final_loss = mse(&model.predict(inputs), targets);
    let mut epochs_run = 0;
    let mut converged = false;

    for epoch in 0..epochs {
        let pass = model.forward_train(inputs, rng);
        let loss = mse(&pass.predictions, targets);
        final_loss = loss;
        if epoch % 1000 == 0 {
            debug!(epoch, loss, "training loss");
        }
        if (loss - previous_loss).abs() < LOSS_PLATEAU_TOLERANCE {
            converged = true;
            break;
        }
        previous_loss = loss;
        let grads = model.backward(&pass, targets);
        optimizer.step(model, &grads);
        epochs_run = epoch + 1;
    }

    Ok(TrainReport {
        final_loss,
        epochs_run,
        converged,
    })
}
