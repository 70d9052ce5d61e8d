use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::error::{NnError, Result};
use crate::loss::squared_error::SquaredErrorLoss;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the total
/// training loss of every epoch, in order.
///
/// # Arguments
/// - `network`   — mutable reference to the network; modified in place
/// - `inputs`    — training samples, each of length `network.input_size()`
/// - `targets`   — corresponding targets, same length as `inputs`
/// - `optimizer` — learning rate and momentum
/// - `config`    — epochs, batch size, shuffling, logging, progress channel
///
/// # Shuffling
/// With `config.shuffle`, epoch `e` permutes the sample order with a fresh
/// `StdRng` seeded by `e`. The permutation is applied to the previous
/// epoch's order, so runs are reproducible and inputs stay paired with
/// their targets. The caller's slices are never reordered.
///
/// # Errors
/// `LengthMismatch` if `inputs.len() != targets.len()`; `EmptyDataset` if
/// there are no samples or `batch_size == 0`; `InputSizeMismatch` or
/// `ShapeMismatch` if a sample does not fit the network. These are checked
/// before any weight changes. Any other forward/backward error aborts the
/// run and discards the gradients accumulated since the last update.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<Vec<f64>> {
    if inputs.len() != targets.len() {
        return Err(NnError::LengthMismatch { inputs: inputs.len(), targets: targets.len() });
    }
    if inputs.is_empty() || config.batch_size == 0 {
        return Err(NnError::EmptyDataset);
    }
    check_sample_widths(network, inputs, targets)?;

    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        if config.shuffle {
            let mut rng = StdRng::seed_from_u64(epoch as u64);
            order.shuffle(&mut rng);
        }

        let t_start = Instant::now();
        let total_loss = match run_one_epoch(network, inputs, targets, &order, optimizer, config.batch_size) {
            Ok(loss) => loss,
            Err(e) => {
                network.clear_gradients();
                return Err(e);
            }
        };
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if config.verbose {
            info!(epoch = epoch + 1, loss = total_loss, "epoch complete");
        } else {
            debug!(epoch = epoch + 1, loss = total_loss, elapsed_ms, "epoch complete");
        }
        history.push(total_loss);

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch: epoch + 1,
                total_epochs: config.epochs,
                total_loss,
                mean_loss: total_loss / inputs.len() as f64,
                elapsed_ms,
            };
            // Nobody listening is not a reason to stop.
            let _ = tx.send(stats);
        }
    }

    if let Some(last) = history.last() {
        info!(loss = *last, epochs = history.len(), "training finished");
    }
    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_sample_widths(network: &Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if let Some(expected) = network.input_size() {
        if let Some(bad) = inputs.iter().find(|x| x.len() != expected) {
            return Err(NnError::InputSizeMismatch { expected, got: bad.len() });
        }
    }
    if let Some(width) = network.output_size() {
        if let Some((idx, bad)) = targets.iter().enumerate().find(|(_, t)| t.len() != width) {
            return Err(NnError::ShapeMismatch(format!(
                "network produces {} outputs but sample {} has {} targets",
                width,
                idx,
                bad.len()
            )));
        }
    }
    Ok(())
}

/// d loss / d output in `Network::backward`'s shape: a single gradient
/// source holding one entry per output unit. With one output unit this is
/// `[[-(t - p)]]`.
fn output_gradient(output: &[f64], target: &[f64]) -> Vec<Vec<f64>> {
    vec![SquaredErrorLoss::derivative(output, target)]
}

/// One pass over the samples in `order`. Every sample gets a forward and a
/// backward pass; weights are updated after each `batch_size` samples and
/// once more for a trailing partial batch. Returns the summed loss.
fn run_one_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    order: &[usize],
    optimizer: &Sgd,
    batch_size: usize,
) -> Result<f64> {
    let mut total_loss = 0.0;
    let mut pending = 0;

    for &idx in order {
        let target = &targets[idx];
        let output = network.forward(&inputs[idx])?;
        if output.len() != target.len() {
            return Err(NnError::ShapeMismatch(format!(
                "network produced {} outputs but sample {} has {} targets",
                output.len(),
                idx,
                target.len()
            )));
        }

        total_loss += SquaredErrorLoss::loss(&output, target);

        network.backward(&output_gradient(&output, target))?;
        pending += 1;

        if pending == batch_size {
            optimizer.step(network)?;
            pending = 0;
        }
    }

    if pending > 0 {
        debug!(samples = pending, "applying trailing partial batch");
        optimizer.step(network)?;
    }

    Ok(total_loss)
}
