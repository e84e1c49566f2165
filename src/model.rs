//! Duopoly model: strategy space, consumer allocation and profits.

use crate::allocation::{Allocation, Split};
use crate::error::{ModelError, ModelResult};
use crate::strategy::{Strategy, StrategySpace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Model constants shared by every model instance of a study.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Number of positions on the market.
    pub n_positions: usize,
    /// Number of price levels.
    pub n_prices: usize,
    /// Lowest price.
    pub p_min: u32,
    /// Highest price.
    pub p_max: u32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_positions: 21,
            n_prices: 11,
            p_min: 1,
            p_max: 11,
        }
    }
}

impl ModelParams {
    pub fn validate(&self) -> ModelResult<()> {
        if self.n_positions < 1 {
            return Err(ModelError::Config(format!(
                "number of positions must be at least 1, but is {}",
                self.n_positions
            )));
        }
        if self.p_min >= self.p_max {
            return Err(ModelError::Config(format!(
                "minimum price {} must be lower than maximum price {}",
                self.p_min, self.p_max
            )));
        }
        let n_levels = (self.p_max - self.p_min) as usize + 1;
        if n_levels != self.n_prices {
            return Err(ModelError::Config(format!(
                "price range {}..={} has {n_levels} levels, but the number of prices is {}",
                self.p_min, self.p_max, self.n_prices
            )));
        }
        Ok(())
    }

    /// Upper bound on the profit of a single firm, used to scale profits.
    pub fn max_profit(&self) -> f64 {
        self.p_max as f64 * self.n_positions as f64
    }
}

/// Model instance for one visibility radius.
///
/// Immutable after construction, so it can be shared among threads.
#[derive(Debug, Clone)]
pub struct Model {
    params: ModelParams,
    strategies: StrategySpace,
    allocation: Arc<Allocation>,
}

impl Model {
    /// Build a model and its consumer allocation for `r_fraction`.
    pub fn new(params: ModelParams, r_fraction: f64) -> ModelResult<Self> {
        params.validate()?;
        let allocation = Allocation::build(params.n_positions, r_fraction)?;
        Self::with_allocation(params, Arc::new(allocation))
    }

    /// Build a model around an allocation computed beforehand, e.g. taken from
    /// an [`AllocationCache`](crate::allocation::AllocationCache).
    pub fn with_allocation(params: ModelParams, allocation: Arc<Allocation>) -> ModelResult<Self> {
        params.validate()?;
        if allocation.n_positions() != params.n_positions {
            return Err(ModelError::Config(format!(
                "allocation has {} positions, but the model has {}",
                allocation.n_positions(),
                params.n_positions
            )));
        }

        let strategies =
            StrategySpace::new(params.n_positions, params.p_min, params.p_max, params.n_prices)?;

        Ok(Self {
            params,
            strategies,
            allocation,
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn strategies(&self) -> &StrategySpace {
        &self.strategies
    }

    pub fn n_strategies(&self) -> usize {
        self.strategies.len()
    }

    pub fn r_fraction(&self) -> f64 {
        self.allocation.r_fraction()
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn max_profit(&self) -> f64 {
        self.params.max_profit()
    }

    /// Expected number of consumers of each firm.
    ///
    /// Shared consumers go to the cheaper firm, or half to each on equal
    /// prices, so counts may be fractional.
    pub fn consumers_for_moves(&self, move_a: usize, move_b: usize) -> ModelResult<[f64; 2]> {
        let strategy_a = self.strategies.get(move_a)?;
        let strategy_b = self.strategies.get(move_b)?;
        Ok(self.consumers_for_strategies(strategy_a, strategy_b))
    }

    /// Profit of each firm.
    pub fn profit(&self, move_a: usize, move_b: usize) -> ModelResult<[f64; 2]> {
        let consumers = self.consumers_for_moves(move_a, move_b)?;
        self.profit_given_consumers(move_a, move_b, consumers)
    }

    /// Profit of each firm for a consumer count computed beforehand.
    pub fn profit_given_consumers(
        &self,
        move_a: usize,
        move_b: usize,
        consumers: [f64; 2],
    ) -> ModelResult<[f64; 2]> {
        let price_a = self.strategies.price(self.strategies.get(move_a)?) as f64;
        let price_b = self.strategies.price(self.strategies.get(move_b)?) as f64;
        Ok([consumers[0] * price_a, consumers[1] * price_b])
    }

    pub(crate) fn profit_for_strategies(
        &self,
        strategy_a: Strategy,
        strategy_b: Strategy,
    ) -> [f64; 2] {
        let consumers = self.consumers_for_strategies(strategy_a, strategy_b);
        [
            consumers[0] * self.strategies.price(strategy_a) as f64,
            consumers[1] * self.strategies.price(strategy_b) as f64,
        ]
    }

    fn consumers_for_strategies(&self, strategy_a: Strategy, strategy_b: Strategy) -> [f64; 2] {
        let Split {
            captive_a,
            captive_b,
            shared,
        } = self.allocation.get(strategy_a.position, strategy_b.position);

        let mut consumers = [captive_a as f64, captive_b as f64];
        if shared > 0 {
            let shared = shared as f64;
            match strategy_a.price_idx.cmp(&strategy_b.price_idx) {
                std::cmp::Ordering::Equal => {
                    consumers[0] += shared / 2.0;
                    consumers[1] += shared / 2.0;
                }
                std::cmp::Ordering::Less => consumers[0] += shared,
                std::cmp::Ordering::Greater => consumers[1] += shared,
            }
        }
        consumers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_model(r: f64) -> Model {
        Model::new(ModelParams::default(), r).unwrap()
    }

    fn move_of(model: &Model, position: usize, price: u32) -> usize {
        model.strategies().index_of(position, price).unwrap()
    }

    #[test]
    fn reference_configuration() {
        let model = reference_model(0.5);
        assert_eq!(model.n_strategies(), 231);
        assert_eq!(model.max_profit(), 231.0);
    }

    #[test]
    fn identical_moves_give_identical_profits() {
        let model = reference_model(0.5);
        for mv in 0..model.n_strategies() {
            let [profit_a, profit_b] = model.profit(mv, mv).unwrap();
            assert_eq!(profit_a, profit_b);
        }
    }

    #[test]
    fn equal_prices_split_shared_consumers_evenly() {
        // Radius 2: positions 0 and 3 share locations 1 and 2.
        let model = reference_model(0.1);
        let move_a = move_of(&model, 0, 5);
        let move_b = move_of(&model, 3, 5);
        assert_eq!(model.consumers_for_moves(move_a, move_b).unwrap(), [2.0, 4.0]);
        assert_eq!(model.profit(move_a, move_b).unwrap(), [10.0, 20.0]);

        // Odd shared count yields half consumers.
        let model = reference_model(1.0);
        let move_a = move_of(&model, 4, 3);
        let move_b = move_of(&model, 15, 3);
        assert_eq!(model.consumers_for_moves(move_a, move_b).unwrap(), [10.5, 10.5]);
    }

    #[test]
    fn cheaper_firm_takes_all_shared_consumers() {
        let model = reference_model(0.1);
        let move_a = move_of(&model, 0, 4);
        let move_b = move_of(&model, 3, 5);
        assert_eq!(model.consumers_for_moves(move_a, move_b).unwrap(), [3.0, 3.0]);
        assert_eq!(model.consumers_for_moves(move_b, move_a).unwrap(), [3.0, 3.0]);
        assert_eq!(model.profit(move_a, move_b).unwrap(), [12.0, 15.0]);

        let move_a = move_of(&model, 0, 6);
        assert_eq!(model.consumers_for_moves(move_a, move_b).unwrap(), [1.0, 5.0]);
        assert_eq!(model.profit(move_a, move_b).unwrap(), [6.0, 25.0]);
    }

    #[test]
    fn profit_given_consumers_uses_own_prices() {
        let model = reference_model(0.5);
        let move_a = move_of(&model, 2, 7);
        let move_b = move_of(&model, 9, 2);
        assert_eq!(
            model
                .profit_given_consumers(move_a, move_b, [1.5, 4.0])
                .unwrap(),
            [10.5, 8.0]
        );
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let model = reference_model(0.5);
        assert!(matches!(
            model.profit(231, 0),
            Err(ModelError::StrategyIndex { idx: 231, .. })
        ));
        assert!(matches!(
            model.consumers_for_moves(0, 1000),
            Err(ModelError::StrategyIndex { idx: 1000, .. })
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = ModelParams {
            p_min: 5,
            p_max: 5,
            n_prices: 1,
            ..ModelParams::default()
        };
        assert!(matches!(Model::new(params, 0.5), Err(ModelError::Config(_))));

        let params = ModelParams {
            n_positions: 0,
            ..ModelParams::default()
        };
        assert!(matches!(Model::new(params, 0.5), Err(ModelError::Config(_))));

        let params = ModelParams {
            n_prices: 12,
            ..ModelParams::default()
        };
        assert!(matches!(Model::new(params, 0.5), Err(ModelError::Config(_))));

        assert!(matches!(
            Model::new(ModelParams::default(), 1.5),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn price_level_count_is_validated() {
        assert_eq!(ModelParams::default().validate(), Ok(()));
        for n_prices in [10, 12] {
            let params = ModelParams {
                n_prices,
                ..ModelParams::default()
            };
            assert!(matches!(params.validate(), Err(ModelError::Config(_))));
        }
    }

    #[test]
    fn allocation_must_match_positions() {
        let allocation = Arc::new(Allocation::build(10, 0.5).unwrap());
        assert!(matches!(
            Model::with_allocation(ModelParams::default(), allocation),
            Err(ModelError::Config(_))
        ));
    }
}
