//! Finite strategy space of a firm.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position on the market and index into the price levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    pub position: usize,
    pub price_idx: usize,
}

/// All `n_positions x n_prices` strategies, in row-major order
/// (position outer, price inner), with lookups in both directions.
#[derive(Debug, Clone)]
pub struct StrategySpace {
    p_min: u32,
    n_prices: usize,
    strategies: Vec<Strategy>,
    idx_by_value: HashMap<(usize, u32), usize>,
}

impl StrategySpace {
    /// Enumerate the strategies for the price levels `p_min..=p_max`.
    ///
    /// Fails if the price range does not hold exactly `n_prices` integer levels.
    pub fn new(n_positions: usize, p_min: u32, p_max: u32, n_prices: usize) -> ModelResult<Self> {
        if p_max < p_min || (p_max - p_min) as usize + 1 != n_prices {
            return Err(ModelError::Config(format!(
                "price range {p_min}..={p_max} must have exactly {n_prices} levels"
            )));
        }

        let mut strategies = Vec::with_capacity(n_positions * n_prices);
        let mut idx_by_value = HashMap::with_capacity(n_positions * n_prices);
        for position in 0..n_positions {
            for price_idx in 0..n_prices {
                idx_by_value.insert((position, p_min + price_idx as u32), strategies.len());
                strategies.push(Strategy {
                    position,
                    price_idx,
                });
            }
        }

        Ok(Self {
            p_min,
            n_prices,
            strategies,
            idx_by_value,
        })
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn n_prices(&self) -> usize {
        self.n_prices
    }

    /// Strategy stored at `idx`.
    pub fn get(&self, idx: usize) -> ModelResult<Strategy> {
        self.strategies
            .get(idx)
            .copied()
            .ok_or(ModelError::StrategyIndex {
                idx,
                n_strategies: self.strategies.len(),
            })
    }

    /// Index of the strategy at `position` with price value `price`.
    pub fn index_of(&self, position: usize, price: u32) -> ModelResult<usize> {
        self.idx_by_value
            .get(&(position, price))
            .copied()
            .ok_or(ModelError::StrategyValue { position, price })
    }

    /// Price value of a strategy.
    pub fn price(&self, strategy: Strategy) -> u32 {
        self.p_min + strategy.price_idx as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }
}
