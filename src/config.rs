use crate::model::ModelParams;
use crate::utils::{check_grid, check_num};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Study configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model constants.
    pub model: ModelParams,
    /// Parameter grid scored against the observed decisions.
    pub fit: FitConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Visibility radius fractions.
    pub r_values: Vec<f64>,
    /// Softmax temperatures.
    pub temperatures: Vec<f64>,
}

impl Config {
    /// Load a [`Config`] from a file.
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
        self.model.validate().context("invalid model parameters")?;
        check_num(self.model.n_positions, 1..10_000).context("invalid number of positions")?;
        check_num(self.model.n_prices, 2..10_000).context("invalid number of prices")?;

        check_grid(&self.fit.r_values, 0.0..=1.0).context("invalid visibility radii")?;
        check_grid(&self.fit.temperatures, f64::MIN_POSITIVE..)
            .context("invalid temperatures")?;

        Ok(())
    }
}
