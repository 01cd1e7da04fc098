use crate::model::{GROUP_SIZE, MAX_CONTRIBUTION};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed of the random number generator; fresh OS entropy when unset.
    pub seed: Option<u64>,

    pub game: GameConfig,
    pub population: PopulationConfig,
    pub distribution: DistributionConfig,
    pub sweep: SweepConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of rounds per group (the last one sets the final contribution).
    pub rounds: usize,
    /// Total group contribution counted as a success.
    pub success_threshold: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents; must be a multiple of 4.
    pub size: usize,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Proportion of unconditional cooperators.
    pub uc: f64,
    /// Proportion of free riders.
    pub fr: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of intervals of the parameter grid (`resolution + 1` settings).
    pub resolution: usize,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.game.rounds, 3..100_000).context("invalid number of rounds")?;
        check_num(
            self.game.success_threshold,
            0.0..=(GROUP_SIZE as f64 * MAX_CONTRIBUTION),
        )
        .context("invalid success threshold")?;

        check_num(self.population.size, GROUP_SIZE..1_000_000)
            .context("invalid population size")?;
        if self.population.size % GROUP_SIZE != 0 {
            bail!(
                "population size must be a multiple of {GROUP_SIZE}, but is {}",
                self.population.size
            );
        }

        check_num(self.distribution.uc, 0.0..=1.0)
            .context("invalid proportion of unconditional cooperators")?;
        check_num(self.distribution.fr, 0.0..=1.0)
            .context("invalid proportion of free riders")?;
        let sum = self.distribution.uc + self.distribution.fr;
        if sum > 1.0 {
            bail!("type proportions must sum to at most 1.0, but sum to {sum}");
        }

        check_num(self.sweep.resolution, 1..10_000).context("invalid sweep resolution")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
