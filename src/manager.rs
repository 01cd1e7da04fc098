use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Simulation;
use crate::model::Distribution;
use crate::sweep::{free_rider_share, sweep, uc_grid};
use anyhow::{Context, Result};
use glob::glob;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Orchestrates simulation runs inside a simulation directory.
///
/// The directory holds a `config.toml` and one `run-NNNN` subdirectory per
/// completed command, containing the JSON result files.
pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(sim_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg })
    }

    /// Sweep the proportion of unconditional cooperators over the configured
    /// grid and write the resulting points to `sweep.json`.
    pub fn run_sweep(&self) -> Result<()> {
        let run_dir = self.create_run_dir()?;
        let mut rng = self.build_rng()?;

        let values = uc_grid(self.cfg.sweep.resolution);
        let points = sweep(
            &values,
            free_rider_share,
            self.cfg.population.size,
            self.cfg.game.rounds,
            self.cfg.game.success_threshold,
            &mut rng,
        )
        .context("failed to run sweep")?;

        let file = run_dir.join("sweep.json");
        let file = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &points)
            .context("failed to serialize sweep points")?;

        Ok(())
    }

    /// Run a single simulation at the configured distribution and write its
    /// per-round trace (`trace.json`) and observable reports
    /// (`results.json`).
    pub fn run_trace(&self) -> Result<()> {
        let run_dir = self.create_run_dir()?;
        let mut rng = self.build_rng()?;

        let distribution = Distribution::new(self.cfg.distribution.uc, self.cfg.distribution.fr)
            .context("failed to construct distribution")?;
        let mut simulation = Simulation::new(self.cfg.population.size, &distribution, &mut rng)
            .context("failed to sample population")?;
        simulation
            .run(self.cfg.game.rounds)
            .context("failed to run simulation")?;

        let file = run_dir.join("trace.json");
        let file = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), simulation.trace())
            .context("failed to serialize trace")?;

        let mut analyzer = Analyzer::new(self.cfg.game.success_threshold);
        analyzer.scan(&simulation).context("failed to scan simulation")?;
        analyzer
            .save_results(run_dir.join("results.json"))
            .context("failed to save results")?;

        Ok(())
    }

    /// Remove all run directories.
    pub fn clean_sim(&self) -> Result<()> {
        let n_runs = self.count_run_dirs().context("failed to count run dirs")?;
        for run_idx in 0..n_runs {
            let run_dir = self.run_dir(run_idx);
            fs::remove_dir_all(&run_dir)
                .with_context(|| format!("failed to remove {run_dir:?}"))?;
            log::info!("removed {run_dir:?}");
        }
        Ok(())
    }

    fn build_rng(&self) -> Result<ChaCha12Rng> {
        let rng = match self.cfg.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };
        Ok(rng)
    }

    fn create_run_dir(&self) -> Result<PathBuf> {
        let run_idx = self.count_run_dirs().context("failed to count run dirs")?;
        let run_dir = self.run_dir(run_idx);
        fs::create_dir_all(&run_dir).with_context(|| format!("failed to create {run_dir:?}"))?;
        log::info!("created {run_dir:?}");
        Ok(run_dir)
    }

    fn count_run_dirs(&self) -> Result<usize> {
        let pattern = self.sim_dir.join("run-*");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let count = glob(pattern)
            .context("failed to glob run dirs")?
            .filter_map(Result::ok)
            .filter(|p| p.is_dir())
            .count();
        Ok(count)
    }

    fn run_dir(&self, run_idx: usize) -> PathBuf {
        self.sim_dir.join(format!("run-{run_idx:04}"))
    }
}
