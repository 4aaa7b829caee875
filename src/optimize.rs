//! Bounded minimization of in-sample error over smoothing parameters
//!
//! All smoothing parameters live in `[0, 1]`, so a deterministic grid sweep
//! with shrinking refinement around the incumbent is enough to reach a
//! comparable optimum, terminates by construction and needs no external
//! solver.

use crate::error::{ForecastError, Result};

/// Number of refinement passes after the coarse sweep
const REFINE_PASSES: usize = 2;
/// Grid points per dimension and pass
const GRID_POINTS: usize = 11;
/// Shrink factor applied to the search radius between passes
const SHRINK: f64 = 0.2;

/// Minimize `objective` over `[0, 1]^dims`
///
/// The objective may return non-finite values for hostile parameter
/// combinations; those are skipped. If no combination anywhere produces a
/// finite value the fit has failed.
pub(crate) fn minimize_bounded<F>(objective: F, dims: usize) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut center = vec![0.5; dims];
    let mut radius = 0.5;
    let mut best_value = f64::INFINITY;

    for _ in 0..=REFINE_PASSES {
        let (point, value) = sweep(&objective, &center, radius, dims);
        if value < best_value {
            best_value = value;
            center = point;
        }
        radius *= SHRINK;
    }

    if !best_value.is_finite() {
        return Err(ForecastError::ModelFit(
            "no parameter combination produced a finite in-sample error".to_string(),
        ));
    }

    Ok(center)
}

/// Evaluate a full grid of `GRID_POINTS` per dimension around `center`
fn sweep<F>(objective: &F, center: &[f64], radius: f64, dims: usize) -> (Vec<f64>, f64)
where
    F: Fn(&[f64]) -> f64,
{
    let axes: Vec<Vec<f64>> = center
        .iter()
        .map(|&c| {
            (0..GRID_POINTS)
                .map(|i| {
                    let t = i as f64 / (GRID_POINTS - 1) as f64;
                    (c - radius + 2.0 * radius * t).clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect();

    let mut best_point = center.to_vec();
    let mut best_value = f64::INFINITY;
    let mut indices = vec![0usize; dims];

    loop {
        let point: Vec<f64> = indices.iter().enumerate().map(|(d, &i)| axes[d][i]).collect();
        let value = objective(&point);
        if value.is_finite() && value < best_value {
            best_value = value;
            best_point = point;
        }

        // Advance the mixed-radix counter over the grid
        let mut d = 0;
        loop {
            if d == dims {
                return (best_point, best_value);
            }
            indices[d] += 1;
            if indices[d] < GRID_POINTS {
                break;
            }
            indices[d] = 0;
            d += 1;
        }
    }
}
