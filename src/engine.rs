use crate::model::{Distribution, GROUP_SIZE, Group, SimError};
use crate::stats::Accumulator;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Population of independently sampled groups.
#[derive(Debug)]
pub struct Population {
    groups: Vec<Group>,
}

impl Population {
    /// Sample `size / 4` independent groups from the distribution.
    ///
    /// The population is materialized eagerly; at the target sizes (up to a
    /// few thousand agents) this is cheap.
    pub fn sample<R: Rng>(
        size: usize,
        distribution: &Distribution,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if size == 0 || size % GROUP_SIZE != 0 {
            return Err(SimError::InvalidPopulationSize(size));
        }

        let n_groups = size / GROUP_SIZE;
        let mut groups = Vec::with_capacity(n_groups);
        for _ in 0..n_groups {
            groups.push(distribution.sample_group(rng));
        }

        Ok(Self { groups })
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// Point of the per-round population trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub step: usize,
    pub average: f64,
}

/// One run of the agent-based simulation.
///
/// Owns a population, runs the repeated game on every group, and exposes
/// the aggregate outcome metric and the per-round contribution trace.
#[derive(Debug)]
pub struct Simulation {
    population: Population,
    trace: Vec<TracePoint>,
}

impl Simulation {
    /// Create a simulation with a freshly sampled population.
    pub fn new<R: Rng>(
        size: usize,
        distribution: &Distribution,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        Ok(Self {
            population: Population::sample(size, distribution, rng)?,
            trace: Vec::new(),
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Run every group for `n_rounds`.
    ///
    /// Groups share no state, so they run on the rayon thread pool; the
    /// results do not depend on scheduling order.
    pub fn run(&mut self, n_rounds: usize) -> Result<(), SimError> {
        self.population
            .groups
            .par_iter_mut()
            .try_for_each(|group| group.run(n_rounds))?;

        let n_observed = n_rounds.saturating_sub(1);
        let mut acc_vec = Vec::new();
        acc_vec.resize_with(n_observed, Accumulator::new);
        for group in &self.population.groups {
            for (acc, &average) in acc_vec.iter_mut().zip(group.round_averages()) {
                acc.add(average);
            }
        }
        self.trace = acc_vec
            .iter()
            .enumerate()
            .map(|(idx, acc)| TracePoint {
                step: idx + 1,
                average: acc.report().mean,
            })
            .collect();

        Ok(())
    }

    /// Per-round population average contribution, available after
    /// [`Simulation::run`].
    pub fn trace(&self) -> &[TracePoint] {
        &self.trace
    }

    /// Fraction of groups whose final contribution reaches `threshold`.
    pub fn proportion_successful_groups(&self, threshold: f64) -> Result<f64, SimError> {
        let mut successful = 0;
        for group in &self.population.groups {
            let final_contribution = group
                .final_contribution()
                .ok_or(SimError::Precondition("simulation has not been run"))?;
            if final_contribution >= threshold {
                successful += 1;
            }
        }
        Ok(successful as f64 / self.population.n_groups() as f64)
    }
}
