use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NnError, Result};

/// Train/test partition of paired inputs and targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub train_inputs: Vec<Vec<f64>>,
    pub train_targets: Vec<Vec<f64>>,
    pub test_inputs: Vec<Vec<f64>>,
    pub test_targets: Vec<Vec<f64>>,
}

/// Splits binary-labelled samples so both partitions keep the class ratio.
///
/// A sample is positive when its first target value is at least 0.5. Each
/// class is shuffled with `rng` and `round(train_fraction * class_size)` of
/// it goes to training. Positives come first in both partitions.
pub fn stratified_split<R: Rng + ?Sized>(
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    train_fraction: f64,
    rng: &mut R,
) -> Result<Split> {
    if inputs.len() != targets.len() {
        return Err(NnError::LengthMismatch { inputs: inputs.len(), targets: targets.len() });
    }
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(NnError::Config(format!(
            "train fraction must lie strictly between 0 and 1, got {}",
            train_fraction
        )));
    }

    let (mut positives, mut negatives): (Vec<usize>, Vec<usize>) = (0..inputs.len())
        .partition(|&i| targets[i].first().map_or(false, |&t| t >= 0.5));
    positives.shuffle(&mut *rng);
    negatives.shuffle(&mut *rng);

    let mut split = Split::default();
    for class in [&positives, &negatives] {
        let n_train = (train_fraction * class.len() as f64).round() as usize;
        let (train, test) = class.split_at(n_train);
        for &i in train {
            split.train_inputs.push(inputs[i].clone());
            split.train_targets.push(targets[i].clone());
        }
        for &i in test {
            split.test_inputs.push(inputs[i].clone());
            split.test_targets.push(targets[i].clone());
        }
    }

    Ok(split)
}
