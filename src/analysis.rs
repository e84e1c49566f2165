//! Likelihood scoring of observed decisions over a parameter grid.

use crate::allocation::AllocationCache;
use crate::choice::ChoiceRule;
use crate::config::Config;
use crate::data::{Decision, Trajectory};
use crate::model::Model;
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result, bail};
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Score of one `(r, temperature, rule)` combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitEntry {
    pub r: f64,
    pub temperature: f64,
    pub rule: ChoiceRule,
    /// Sum of log-probabilities of all decisions.
    pub log_likelihood: f64,
    /// Log-probability statistics per decision; decisions with zero
    /// probability are counted in `n_non_finite`.
    pub per_decision: AccumulatorReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub n_decisions: usize,
    pub entries: Vec<FitEntry>,
    /// Entry with the highest log-likelihood.
    pub best: FitEntry,
}

impl FitReport {
    pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write(&mut writer, self).context("failed to serialize fit report")?;
        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        decode::from_read(&mut reader).context("failed to deserialize fit report")
    }
}

pub struct Fit {
    cfg: Config,
    cache: AllocationCache,
    decisions: Vec<Decision>,
}

impl Fit {
    pub fn new(cfg: Config) -> Self {
        let cache = AllocationCache::new(cfg.model.n_positions);
        Self {
            cfg,
            cache,
            decisions: Vec::new(),
        }
    }

    pub fn n_decisions(&self) -> usize {
        self.decisions.len()
    }

    pub fn add_trajectory(&mut self, trajectory: &Trajectory) {
        self.decisions.extend(trajectory.decisions());
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let trajectory = Trajectory::from_file(file).context("failed to load trajectory")?;
        self.add_trajectory(&trajectory);
        Ok(())
    }

    /// Score every combination of the configured grid.
    pub fn run(&mut self) -> Result<FitReport> {
        if self.decisions.is_empty() {
            bail!("no decisions to score");
        }

        let n_combinations =
            self.cfg.fit.r_values.len() * self.cfg.fit.temperatures.len() * ChoiceRule::ALL.len();
        let mut entries = Vec::with_capacity(n_combinations);

        for &r in &self.cfg.fit.r_values {
            let allocation = self
                .cache
                .get_or_build(r)
                .with_context(|| format!("failed to build consumer allocation for r = {r}"))?;
            let model = Model::with_allocation(self.cfg.model.clone(), allocation)
                .context("failed to construct model")?;

            for &temperature in &self.cfg.fit.temperatures {
                for rule in ChoiceRule::ALL {
                    let log_probs = model
                        .log_likelihoods(rule, &self.decisions, temperature)
                        .with_context(|| {
                            format!("failed to score decisions (r = {r}, temperature = {temperature}, rule = {rule})")
                        })?;

                    let mut acc = Accumulator::new();
                    log_probs.iter().for_each(|&val| acc.add(val));

                    entries.push(FitEntry {
                        r,
                        temperature,
                        rule,
                        log_likelihood: log_probs.iter().sum(),
                        per_decision: acc.report(),
                    });
                }
            }

            let progress = 100.0 * entries.len() as f64 / n_combinations as f64;
            log::info!("completed {progress:06.2}%");
        }

        let best = entries
            .iter()
            .max_by(|a, b| a.log_likelihood.total_cmp(&b.log_likelihood))
            .cloned()
            .context("parameter grid is empty")?;
        log::info!(
            "best fit: r = {}, temperature = {}, rule = {}, log-likelihood = {}",
            best.r,
            best.temperature,
            best.rule,
            best.log_likelihood
        );

        Ok(FitReport {
            n_decisions: self.decisions.len(),
            entries,
            best,
        })
    }
}
