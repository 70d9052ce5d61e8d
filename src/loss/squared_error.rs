/// Half squared error, summed over output units.
pub struct SquaredErrorLoss;

impl SquaredErrorLoss {
    /// Scalar loss: Σ 0.5·(expected - predicted)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, t)| 0.5 * (t - p).powi(2))
            .sum()
    }

    /// Per-output gradient: -(expected - predicted)
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, t)| -(t - p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_half_squared_error_sum() {
        assert_eq!(SquaredErrorLoss::loss(&[0.5, 2.0], &[1.0, 0.0]), 0.125 + 2.0);
        assert_eq!(SquaredErrorLoss::loss(&[0.3], &[0.3]), 0.0);
    }

    #[test]
    fn derivative_is_prediction_minus_target() {
        assert_eq!(SquaredErrorLoss::derivative(&[0.5, 2.0], &[1.0, 0.0]), vec![-0.5, 2.0]);
    }
}
