//! Standard Feature Scaler
//!
//! Mean/std normalization fitted once at training time. Never refit at
//! inference time - the stored parameters are part of the artifact.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column standardization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fit mean and std per column
    pub fn fit(data: &Array2<f64>) -> Self {
        let n = data.nrows().max(1) as f64;
        let mean: Vec<f64> = data
            .axis_iter(Axis(1))
            .map(|col| col.sum() / n)
            .collect();
        let std: Vec<f64> = data
            .axis_iter(Axis(1))
            .zip(mean.iter())
            .map(|(col, &m)| {
                let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
                let s = var.sqrt();
                // constant columns scale by 1 to avoid division by zero
                if s > 0.0 { s } else { 1.0 }
            })
            .collect();

        Self { mean, std }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Scale a single row
    pub fn transform_row(&self, row: &[f64]) -> Array1<f64> {
        Array1::from_iter(row.iter().enumerate().map(|(i, &v)| {
            let m = self.mean.get(i).copied().unwrap_or(0.0);
            let s = self.std.get(i).copied().unwrap_or(1.0);
            (v - m) / s
        }))
    }

    /// Scale a full matrix
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut out = data.clone();
        for mut row in out.axis_iter_mut(Axis(0)) {
            for (i, v) in row.iter_mut().enumerate() {
                let m = self.mean.get(i).copied().unwrap_or(0.0);
                let s = self.std.get(i).copied().unwrap_or(1.0);
                *v = (*v - m) / s;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_transform() {
        let data = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let scaler = StandardScaler::fit(&data);

        let scaled = scaler.transform(&data);
        // first column: mean 3, centered
        assert!((scaled[[0, 0]] + scaled[[2, 0]]).abs() < 1e-9);
        assert!(scaled[[1, 0]].abs() < 1e-9);
        // constant column maps to zero, not NaN
        assert_eq!(scaled[[0, 1]], 0.0);
    }

    #[test]
    fn test_transform_row_matches_matrix() {
        let data = array![[2.0, 4.0], [6.0, 8.0]];
        let scaler = StandardScaler::fit(&data);

        let row = scaler.transform_row(&[2.0, 4.0]);
        let matrix = scaler.transform(&data);
        assert!((row[0] - matrix[[0, 0]]).abs() < 1e-9);
        assert!((row[1] - matrix[[0, 1]]).abs() < 1e-9);
    }
}
