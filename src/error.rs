//! Model error type.

use thiserror::Error;

/// Errors reported by the numerical core.
///
/// Every variant is a caller bug: nothing is retried or recovered locally.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("strategy index {idx} out of range (number of strategies: {n_strategies})")]
    StrategyIndex { idx: usize, n_strategies: usize },

    #[error("position {position} out of range (number of positions: {n_positions})")]
    Position { position: usize, n_positions: usize },

    #[error("strategy (position {position}, price {price}) is not in the strategy space")]
    StrategyValue { position: usize, price: u32 },

    #[error("temperature must be finite and strictly positive, but is {0}")]
    Temperature(f64),
}

/// Shorthand result type for the numerical core.
pub type ModelResult<T> = Result<T, ModelError>;
