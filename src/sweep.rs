//! Parameter-sweep driver.
//!
//! Varies the proportion of unconditional cooperators while keeping the
//! ratio of conditional cooperators to free riders fixed, and records the
//! proportion of successful groups per setting. The output is a plain
//! sequence of points; plotting is left to external consumers.

use crate::engine::Simulation;
use crate::model::Distribution;
use anyhow::{Context, Result, ensure};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Empirical ratio of conditional cooperators to free riders
/// (CC 0.358 / FR 0.035).
pub const CC_TO_FR_RATIO: f64 = 10.2;

/// Tolerance on the proportion sum; a larger deviation is a configuration
/// bug, not a recoverable condition.
const RATIO_TOLERANCE: f64 = 1e-4;

/// Outcome of one sweep setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub param: f64,
    pub proportion: f64,
}

/// Evenly spaced parameter values `i / resolution` for `i = 0..=resolution`.
pub fn uc_grid(resolution: usize) -> Vec<f64> {
    (0..=resolution)
        .map(|i| i as f64 / resolution as f64)
        .collect()
}

/// Proportion of free riders implied by a proportion of unconditional
/// cooperators, keeping conditional cooperators at [`CC_TO_FR_RATIO`]
/// times the free riders.
pub fn free_rider_share(uc: f64) -> f64 {
    (1.0 - uc) / (1.0 + CC_TO_FR_RATIO)
}

/// Run a fresh simulation per parameter value and record the proportion of
/// successful groups.
pub fn sweep<R, F>(
    param_values: &[f64],
    ratio_fn: F,
    population_size: usize,
    n_rounds: usize,
    threshold: f64,
    rng: &mut R,
) -> Result<Vec<SweepPoint>>
where
    R: Rng,
    F: Fn(f64) -> f64,
{
    let mut points = Vec::with_capacity(param_values.len());

    for (idx, &uc) in param_values.iter().enumerate() {
        let fr = ratio_fn(uc);
        let sum = uc + fr * (1.0 + CC_TO_FR_RATIO);
        ensure!(
            (sum - 1.0).abs() < RATIO_TOLERANCE,
            "type proportions for uc = {uc} sum to {sum}, not 1"
        );

        let distribution = Distribution::new(uc, fr)
            .with_context(|| format!("invalid distribution for uc = {uc}"))?;
        let mut simulation = Simulation::new(population_size, &distribution, rng)
            .context("failed to sample population")?;
        simulation.run(n_rounds).context("failed to run simulation")?;
        let proportion = simulation
            .proportion_successful_groups(threshold)
            .context("failed to compute proportion of successful groups")?;

        points.push(SweepPoint {
            param: uc,
            proportion,
        });

        let progress = 100.0 * (idx + 1) as f64 / param_values.len() as f64;
        log::info!("completed {progress:06.2}%");
    }

    Ok(points)
}
