//! Logit choice probabilities.
//!
//! A player facing a fixed opponent strategy picks each of its strategies
//! with probability `softmax(score / max_profit, temperature)`, where the
//! score is either its own profit or its profit lead over the opponent.

use crate::data::Decision;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantity a player is assumed to maximize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceRule {
    /// Own profit.
    Profit,
    /// Own profit minus the opponent's profit.
    Competition,
}

impl ChoiceRule {
    pub const ALL: [ChoiceRule; 2] = [ChoiceRule::Profit, ChoiceRule::Competition];
}

impl fmt::Display for ChoiceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceRule::Profit => write!(f, "profit"),
            ChoiceRule::Competition => write!(f, "competition"),
        }
    }
}

pub fn check_temperature(temperature: f64) -> ModelResult<()> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(ModelError::Temperature(temperature));
    }
    Ok(())
}

/// `exp(v / temperature) / sum(exp(v / temperature))`.
///
/// The maximum is subtracted before exponentiating, so the result stays
/// finite for any positive temperature; as the temperature goes to zero
/// the mass goes to the maximizers, split evenly among ties.
pub fn softmax(values: &[f64], temperature: f64) -> ModelResult<Vec<f64>> {
    check_temperature(temperature)?;

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut dist: Vec<f64> = values
        .iter()
        .map(|&val| ((val - max) / temperature).exp())
        .collect();

    let sum: f64 = dist.iter().sum();
    dist.iter_mut().for_each(|ele| *ele /= sum);

    Ok(dist)
}

impl Model {
    /// Scaled scores of every player strategy against `opp_move`.
    pub fn choice_scores(&self, rule: ChoiceRule, opp_move: usize) -> ModelResult<Vec<f64>> {
        let opp = self.strategies().get(opp_move)?;
        let max_profit = self.max_profit();

        let scores = self
            .strategies()
            .iter()
            .map(|&candidate| {
                let [own, other] = self.profit_for_strategies(candidate, opp);
                match rule {
                    ChoiceRule::Profit => own / max_profit,
                    ChoiceRule::Competition => (own - other) / max_profit,
                }
            })
            .collect();

        Ok(scores)
    }

    /// Probability of every player strategy against `opp_move`.
    pub fn choice_distribution(
        &self,
        rule: ChoiceRule,
        opp_move: usize,
        temperature: f64,
    ) -> ModelResult<Vec<f64>> {
        softmax(&self.choice_scores(rule, opp_move)?, temperature)
    }

    /// Probability that the player picks `(player_position, player_price)`
    /// under `rule` when the opponent plays `(opp_position, opp_price)`.
    pub fn choice_probability(
        &self,
        rule: ChoiceRule,
        decision: &Decision,
        temperature: f64,
    ) -> ModelResult<f64> {
        let strategies = self.strategies();
        let player_move = strategies.index_of(decision.player_position, decision.player_price)?;
        let opp_move = strategies.index_of(decision.opp_position, decision.opp_price)?;

        let dist = self.choice_distribution(rule, opp_move, temperature)?;
        Ok(dist[player_move])
    }

    /// Logit probability of the player's strategy, scoring absolute profit.
    pub fn p_profit(
        &self,
        player_position: usize,
        player_price: u32,
        opp_position: usize,
        opp_price: u32,
        temperature: f64,
    ) -> ModelResult<f64> {
        let decision = Decision {
            player_position,
            player_price,
            opp_position,
            opp_price,
        };
        self.choice_probability(ChoiceRule::Profit, &decision, temperature)
    }

    /// Logit probability of the player's strategy, scoring profit lead over the opponent.
    pub fn p_competition(
        &self,
        player_position: usize,
        player_price: u32,
        opp_position: usize,
        opp_price: u32,
        temperature: f64,
    ) -> ModelResult<f64> {
        let decision = Decision {
            player_position,
            player_price,
            opp_position,
            opp_price,
        };
        self.choice_probability(ChoiceRule::Competition, &decision, temperature)
    }

    /// Sum of log-probabilities of `decisions`, evaluated in parallel.
    pub fn log_likelihood(
        &self,
        rule: ChoiceRule,
        decisions: &[Decision],
        temperature: f64,
    ) -> ModelResult<f64> {
        Ok(self
            .log_likelihoods(rule, decisions, temperature)?
            .iter()
            .sum())
    }

    /// Log-probability of each decision, in input order.
    pub fn log_likelihoods(
        &self,
        rule: ChoiceRule,
        decisions: &[Decision],
        temperature: f64,
    ) -> ModelResult<Vec<f64>> {
        check_temperature(temperature)?;
        decisions
            .par_iter()
            .map(|decision| {
                self.choice_probability(rule, decision, temperature)
                    .map(f64::ln)
            })
            .collect()
    }
}
