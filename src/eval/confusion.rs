use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::network::network::Network;

/// Binary confusion matrix for a single-output classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// A prediction above `threshold` counts as positive; a target of at
    /// least 0.5 is a positive label.
    pub fn record(&mut self, prediction: f64, target: f64, threshold: f64) {
        match (target >= 0.5, prediction > threshold) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_negative += 1,
            (false, true) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
        }
    }

    pub fn from_predictions(predictions: &[f64], targets: &[f64], threshold: f64) -> Result<Self> {
        if predictions.len() != targets.len() {
            return Err(NnError::LengthMismatch { inputs: predictions.len(), targets: targets.len() });
        }
        let mut matrix = ConfusionMatrix::default();
        for (&p, &t) in predictions.iter().zip(targets) {
            matrix.record(p, t, threshold);
        }
        Ok(matrix)
    }

    /// Runs `network.predict` on every input and scores the first output unit.
    pub fn evaluate(
        network: &mut Network,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        threshold: f64,
    ) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(NnError::LengthMismatch { inputs: inputs.len(), targets: targets.len() });
        }
        let mut matrix = ConfusionMatrix::default();
        for (input, target) in inputs.iter().zip(targets) {
            let output = network.predict(input)?;
            match (output.first(), target.first()) {
                (Some(&p), Some(&t)) => matrix.record(p, t, threshold),
                _ => return Err(NnError::ShapeMismatch("evaluation needs one output and one target".into())),
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "              pred 1  pred 0")?;
        writeln!(f, "actual 1  {:>8}{:>8}", self.true_positive, self.false_negative)?;
        writeln!(f, "actual 0  {:>8}{:>8}", self.false_positive, self.true_negative)?;
        writeln!(f, "Accuracy  {:.2} %", self.accuracy() * 100.0)?;
        writeln!(f, "Precision {:.2}", self.precision())?;
        writeln!(f, "Recall    {:.2}", self.recall())?;
        write!(f, "F1        {:.2}", self.f1())
    }
}

/// `num / den`, or 0 when there is nothing to divide by.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_each_quadrant() {
        let m = ConfusionMatrix::from_predictions(
            &[0.9, 0.2, 0.7, 0.1, 0.6],
            &[1.0, 1.0, 0.0, 0.0, 1.0],
            0.5,
        ).unwrap();
        assert_eq!(m, ConfusionMatrix { true_positive: 2, true_negative: 1, false_positive: 1, false_negative: 1 });
        assert_relative_eq!(m.accuracy(), 0.6);
        assert_relative_eq!(m.precision(), 2.0 / 3.0);
        assert_relative_eq!(m.recall(), 2.0 / 3.0);
        assert_relative_eq!(m.f1(), 2.0 / 3.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let m = ConfusionMatrix::from_predictions(&[0.5], &[1.0], 0.5).unwrap();
        assert_eq!(m.false_negative, 1);
    }

    #[test]
    fn empty_metrics_are_zero() {
        let m = ConfusionMatrix::default();
        assert_eq!(m.accuracy(), 0.0);
        assert_eq!(m.precision(), 0.0);
        assert_eq!(m.recall(), 0.0);
        assert_eq!(m.f1(), 0.0);
    }

    #[test]
    fn display_reports_metrics() {
        let m = ConfusionMatrix { true_positive: 1, true_negative: 1, false_positive: 0, false_negative: 0 };
        let text = m.to_string();
        assert!(text.contains("Accuracy  100.00 %"));
        assert!(text.contains("F1        1.00"));
    }
}
