use serde::{Deserialize, Serialize};

/// Loss and goodness of fit of one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepMetrics {
    pub loss: f64,
    pub r2: f64,
}

/// Mean squared error over all values. Returns 0 for empty input.
pub fn mse(predicted: &[f64], truth: &[f64]) -> f64 {
    debug_assert_eq!(predicted.len(), truth.len());
    if truth.is_empty() {
        return 0.0;
    }
    let sum: f64 = predicted
        .iter()
        .zip(truth)
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    sum / truth.len() as f64
}

/// Coefficient of determination averaged uniformly over `n_tasks` interleaved
/// outputs (row-major `[sample][task]` layout).
///
/// A task whose true values are constant scores 1 when predicted exactly and 0
/// otherwise.
pub fn r2(predicted: &[f64], truth: &[f64], n_tasks: usize) -> f64 {
    debug_assert_eq!(predicted.len(), truth.len());
    if n_tasks == 0 || truth.is_empty() {
        return 0.0;
    }

    let rows = truth.len() / n_tasks;
    let mut total = 0.0;
    for task in 0..n_tasks {
        let column = |values: &[f64]| -> Vec<f64> {
            (0..rows).map(|r| values[r * n_tasks + task]).collect()
        };
        let t = column(truth);
        let p = column(predicted);

        let mean = t.iter().sum::<f64>() / rows as f64;
        let ss_tot: f64 = t.iter().map(|v| (v - mean) * (v - mean)).sum();
        let ss_res: f64 = t.iter().zip(&p).map(|(v, q)| (v - q) * (v - q)).sum();

        total += if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };
    }
    total / n_tasks as f64
}
