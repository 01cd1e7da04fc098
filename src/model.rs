//! Agents, groups and the type distribution of the public goods game.

use crate::params::{self, TypeParameters};
use rand::Rng;
use thiserror::Error;

/// Number of agents interacting in each group.
pub const GROUP_SIZE: usize = 4;

/// Maximum effective contribution an agent can make in one round.
pub const MAX_CONTRIBUTION: f64 = 20.0;

/// Precondition violations of the simulation engine.
///
/// All variants are raised synchronously at the violating call; none are
/// retried or recovered from.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("invalid distribution: uc = {uc}, fr = {fr}")]
    InvalidDistribution { uc: f64, fr: f64 },

    #[error("population size must be a positive multiple of 4, but is {0}")]
    InvalidPopulationSize(usize),

    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

/// Behavioral type of an agent, as classified by the underlying experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    UnconditionalCooperator,
    ConditionalCooperator,
    FreeRider,
}

impl AgentType {
    /// Canonical linear-response parameters of this type.
    pub fn parameters(self) -> &'static TypeParameters {
        match self {
            AgentType::UnconditionalCooperator => &params::UNCONDITIONAL_COOPERATOR,
            AgentType::ConditionalCooperator => &params::CONDITIONAL_COOPERATOR,
            AgentType::FreeRider => &params::FREE_RIDER,
        }
    }
}

/// Agent of the simulation.
///
/// Holds its behavioral type and the contribution it made in the last
/// round. The stored value is the raw linear response, not the capped one:
/// the uncapped value is what feeds the next round's averages.
#[derive(Debug, Clone)]
pub struct Agent {
    kind: AgentType,
    last_contribution: Option<f64>,
}

impl Agent {
    pub fn new(kind: AgentType) -> Self {
        Self {
            kind,
            last_contribution: None,
        }
    }

    pub fn kind(&self) -> AgentType {
        self.kind
    }

    /// Contribution recorded in the last round, if any round has run.
    pub fn last_contribution(&self) -> Option<f64> {
        self.last_contribution
    }

    /// First-round contribution: the calibrated baseline, never capped.
    pub fn contribute_first(&mut self) -> f64 {
        let contribution = self.kind.parameters().first_round;
        self.last_contribution = Some(contribution);
        contribution
    }

    /// Response contribution of every round after the first.
    ///
    /// Records the raw linear response as the last contribution and returns
    /// it capped to `[0, MAX_CONTRIBUTION]`.
    pub fn contribute(&mut self, others_average: f64) -> f64 {
        let par = self.kind.parameters();
        let raw = par.intercept + par.slope * others_average;
        self.last_contribution = Some(raw);
        raw.clamp(0.0, MAX_CONTRIBUTION)
    }
}

/// Probability distribution over the three agent types.
///
/// The proportion of conditional cooperators is derived from the other two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    uc: f64,
    fr: f64,
    cc: f64,
}

impl Distribution {
    /// Create a distribution from the proportions of unconditional
    /// cooperators and free riders.
    pub fn new(uc: f64, fr: f64) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&uc) || !(0.0..=1.0).contains(&fr) || uc + fr > 1.0 {
            return Err(SimError::InvalidDistribution { uc, fr });
        }
        Ok(Self {
            uc,
            fr,
            cc: 1.0 - (uc + fr),
        })
    }

    pub fn uc(&self) -> f64 {
        self.uc
    }

    pub fn fr(&self) -> f64 {
        self.fr
    }

    pub fn cc(&self) -> f64 {
        self.cc
    }

    /// Sample one agent type with a single uniform draw.
    pub fn sample_type<R: Rng>(&self, rng: &mut R) -> AgentType {
        let r: f64 = rng.random();
        if r < self.uc {
            AgentType::UnconditionalCooperator
        } else if r < self.uc + self.fr {
            AgentType::FreeRider
        } else {
            AgentType::ConditionalCooperator
        }
    }

    /// Sample a full group of four independent agents.
    pub fn sample_group<R: Rng>(&self, rng: &mut R) -> Group {
        Group::new(std::array::from_fn(|_| Agent::new(self.sample_type(rng))))
    }
}

/// Group of four agents interacting in the repeated public goods game.
#[derive(Debug, Clone)]
pub struct Group {
    agents: [Agent; GROUP_SIZE],
    final_contribution: Option<f64>,
    round_averages: Vec<f64>,
}

impl Group {
    pub fn new(agents: [Agent; GROUP_SIZE]) -> Self {
        Self {
            agents,
            final_contribution: None,
            round_averages: Vec::new(),
        }
    }

    pub fn agents(&self) -> &[Agent; GROUP_SIZE] {
        &self.agents
    }

    /// Total capped contribution of the last round, set by [`Group::run`].
    pub fn final_contribution(&self) -> Option<f64> {
        self.final_contribution
    }

    /// Mean effective contribution of the group per observed round.
    pub fn round_averages(&self) -> &[f64] {
        &self.round_averages
    }

    /// Play the repeated game for `n_rounds`.
    ///
    /// Round 1 records every agent's baseline contribution. Steps
    /// `2..n_rounds` are response rounds: each agent responds to the mean of
    /// the other three agents' contributions from the previous round, all
    /// four updating synchronously. The capped contributions of the last
    /// step are summed into the final group contribution.
    pub fn run(&mut self, n_rounds: usize) -> Result<(), SimError> {
        self.round_averages.clear();
        self.final_contribution = None;

        let mut first = [0.0; GROUP_SIZE];
        for (idx, agent) in self.agents.iter_mut().enumerate() {
            first[idx] = agent.contribute_first();
        }
        self.round_averages.push(mean(&first));

        for step in 2..n_rounds {
            // Snapshot before any update: all four responses of a round use
            // the previous round's contributions.
            let prior = self.prior_contributions()?;
            let total: f64 = prior.iter().sum();

            let mut effective = [0.0; GROUP_SIZE];
            for (idx, agent) in self.agents.iter_mut().enumerate() {
                let others_average = (total - prior[idx]) / (GROUP_SIZE - 1) as f64;
                effective[idx] = agent.contribute(others_average);
            }
            self.round_averages.push(mean(&effective));

            if step == n_rounds - 1 {
                self.final_contribution = Some(effective.iter().sum());
            }
        }

        Ok(())
    }

    fn prior_contributions(&self) -> Result<[f64; GROUP_SIZE], SimError> {
        let mut prior = [0.0; GROUP_SIZE];
        for (idx, agent) in self.agents.iter().enumerate() {
            prior[idx] = agent
                .last_contribution()
                .ok_or(SimError::Precondition("agent has no recorded contribution"))?;
        }
        Ok(prior)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
