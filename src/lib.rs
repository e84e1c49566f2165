//! Discrete spatial duopoly.
//!
//! Two firms each pick a position on a linear market and a price. Consumers
//! see only the firms within their field of view and buy from the cheapest
//! visible one. The model computes consumer splits and profits for every pair
//! of strategies, and logit choice probabilities used to score observed firm
//! decisions.

pub mod allocation;
pub mod analysis;
pub mod choice;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod model;
pub mod stats;
pub mod strategy;

mod utils;

pub use allocation::{Allocation, AllocationCache, Split};
pub use choice::{ChoiceRule, softmax};
pub use data::{Decision, Trajectory};
pub use error::{ModelError, ModelResult};
pub use model::{Model, ModelParams};
pub use strategy::{Strategy, StrategySpace};
