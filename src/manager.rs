use crate::analysis::Fit;
use crate::choice::ChoiceRule;
use crate::config::Config;
use crate::data::Decision;
use crate::model::Model;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub struct Manager {
    run_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(run_dir: P) -> Result<Self> {
        let run_dir = run_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(run_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { run_dir, cfg })
    }

    pub fn fit(&self) -> Result<()> {
        let trajectory_files = self
            .trajectory_files()
            .context("failed to list trajectory files")?;
        if trajectory_files.is_empty() {
            bail!("no trajectory files in {:?}", self.run_dir);
        }

        let mut fit = Fit::new(self.cfg.clone());
        for file in &trajectory_files {
            fit.add_file(file)
                .with_context(|| format!("failed to add {file:?}"))?;
        }
        log::info!(
            "loaded {} decisions from {} trajectory files",
            fit.n_decisions(),
            trajectory_files.len()
        );

        let report = fit.run().context("failed to run fit")?;

        let results_file = self.results_file();
        report
            .save(&results_file)
            .with_context(|| format!("failed to save {results_file:?}"))?;
        log::info!("saved {results_file:?}");

        Ok(())
    }

    pub fn query(&self, r: f64, decision: &Decision) -> Result<()> {
        let model = Model::new(self.cfg.model.clone(), r).context("failed to construct model")?;

        let strategies = model.strategies();
        let move_a = strategies.index_of(decision.player_position, decision.player_price)?;
        let move_b = strategies.index_of(decision.opp_position, decision.opp_price)?;

        let consumers = model.consumers_for_moves(move_a, move_b)?;
        let profits = model.profit(move_a, move_b)?;
        log::info!("consumers: {consumers:?}");
        log::info!("profits: {profits:?}");

        for &temperature in &self.cfg.fit.temperatures {
            for rule in ChoiceRule::ALL {
                let p = model.choice_probability(rule, decision, temperature)?;
                log::info!("p_{rule}(temperature = {temperature}) = {p}");
            }
        }

        Ok(())
    }

    pub fn clean(&self) -> Result<()> {
        let results_file = self.results_file();
        if results_file.exists() {
            fs::remove_file(&results_file)
                .with_context(|| format!("failed to remove {results_file:?}"))?;
            log::info!("removed {results_file:?}");
        }
        Ok(())
    }

    fn trajectory_files(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.run_dir.join("trajectory-*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut files: Vec<PathBuf> = glob(pattern)
            .context("failed to glob trajectory files")?
            .filter_map(Result::ok)
            .collect();
        files.sort();
        Ok(files)
    }

    fn results_file(&self) -> PathBuf {
        self.run_dir.join("results.msgpack")
    }
}
