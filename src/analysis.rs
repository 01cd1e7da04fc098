use crate::engine::Simulation;
use crate::model::Group;
use crate::stats::Accumulator;
use anyhow::{Context, Result};
use std::{fs::File, io::BufWriter, path::Path};

/// Observable over the groups of a finished simulation.
pub trait Obs {
    fn update(&mut self, group: &Group) -> Result<()>;
    fn report(&self) -> serde_json::Value;
}

/// Fraction of groups whose final contribution reaches the threshold.
pub struct SuccessRate {
    threshold: f64,
    n_groups: usize,
    n_successful: usize,
}

impl SuccessRate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            n_groups: 0,
            n_successful: 0,
        }
    }
}

impl Obs for SuccessRate {
    fn update(&mut self, group: &Group) -> Result<()> {
        let final_contribution = group
            .final_contribution()
            .context("group has no final contribution")?;
        self.n_groups += 1;
        if final_contribution >= self.threshold {
            self.n_successful += 1;
        }
        Ok(())
    }

    fn report(&self) -> serde_json::Value {
        let proportion = if self.n_groups > 0 {
            self.n_successful as f64 / self.n_groups as f64
        } else {
            f64::NAN
        };
        serde_json::json!({
            "success_rate": {
                "threshold": self.threshold,
                "proportion": proportion,
            }
        })
    }
}

/// Mean and spread of the final group contributions.
pub struct FinalContribution {
    acc: Accumulator,
}

impl FinalContribution {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }
}

impl Default for FinalContribution {
    fn default() -> Self {
        Self::new()
    }
}

impl Obs for FinalContribution {
    fn update(&mut self, group: &Group) -> Result<()> {
        let final_contribution = group
            .final_contribution()
            .context("group has no final contribution")?;
        self.acc.add(final_contribution);
        Ok(())
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ "final_contribution": self.acc.report() })
    }
}

/// Runs all observables over a finished simulation and writes their reports.
pub struct Analyzer {
    obs_ptr_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new(threshold: f64) -> Self {
        let mut obs_ptr_vec: Vec<Box<dyn Obs>> = Vec::new();
        obs_ptr_vec.push(Box::new(SuccessRate::new(threshold)));
        obs_ptr_vec.push(Box::new(FinalContribution::new()));
        Self { obs_ptr_vec }
    }

    pub fn scan(&mut self, simulation: &Simulation) -> Result<()> {
        for group in simulation.population().groups() {
            for obs in &mut self.obs_ptr_vec {
                obs.update(group).context("failed to update observable")?;
            }
        }
        Ok(())
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        let reports: Vec<_> = self.obs_ptr_vec.iter().map(|obs| obs.report()).collect();
        serde_json::to_writer_pretty(writer, &reports)?;
        Ok(())
    }
}
