use crate::error::{NnError, Result};

/// Per-column min-max scaling into [0, 1].
///
/// Fit on the training rows, then transform every split with the same
/// bounds. Columns that were constant during fitting map to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<MinMaxScaler> {
        let first = rows.first().ok_or(NnError::EmptyDataset)?;
        let mut min = first.clone();
        let mut max = first.clone();

        for row in &rows[1..] {
            if row.len() != min.len() {
                return Err(NnError::InputSizeMismatch { expected: min.len(), got: row.len() });
            }
            for (j, &v) in row.iter().enumerate() {
                min[j] = min[j].min(v);
                max[j] = max[j].max(v);
            }
        }

        Ok(MinMaxScaler { min, max })
    }

    pub fn width(&self) -> usize {
        self.min.len()
    }

    /// Values outside the fitted range land outside [0, 1]; they are not clamped.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.width() {
                    return Err(NnError::InputSizeMismatch { expected: self.width(), got: row.len() });
                }
                Ok(row.iter()
                    .zip(self.min.iter().zip(&self.max))
                    .map(|(&v, (&lo, &hi))| {
                        let range = hi - lo;
                        if range > 0.0 { (v - lo) / range } else { 0.0 }
                    })
                    .collect())
            })
            .collect()
    }

    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(MinMaxScaler, Vec<Vec<f64>>)> {
        let scaler = MinMaxScaler::fit(rows)?;
        let scaled = scaler.transform(rows)?;
        Ok((scaler, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_each_column_independently() {
        let rows = vec![vec![0.0, 10.0, 5.0], vec![2.0, 30.0, 5.0], vec![1.0, 20.0, 5.0]];
        let (_, scaled) = MinMaxScaler::fit_transform(&rows).unwrap();
        assert_eq!(scaled, vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.5, 0.5, 0.0],
        ]);
    }

    #[test]
    fn reuses_training_bounds() {
        let scaler = MinMaxScaler::fit(&[vec![0.0], vec![4.0]]).unwrap();
        assert_eq!(scaler.transform(&[vec![2.0], vec![8.0]]).unwrap(), vec![vec![0.5], vec![2.0]]);
    }

    #[test]
    fn width_mismatch_and_empty_fail() {
        assert!(matches!(MinMaxScaler::fit(&[]), Err(NnError::EmptyDataset)));
        assert!(MinMaxScaler::fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        let scaler = MinMaxScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(scaler.transform(&[vec![1.0]]).is_err());
    }
}
