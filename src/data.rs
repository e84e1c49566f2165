//! Observed firm decisions.

use anyhow::{Context, Result, bail};
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// A player's observed strategy together with the opponent strategy it responded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub player_position: usize,
    pub player_price: u32,
    pub opp_position: usize,
    pub opp_price: u32,
}

/// Positions and prices of both firms over one session.
///
/// Row `t` holds the strategies of firm A (index 0) and firm B (index 1) at step `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub positions: Vec<[usize; 2]>,
    pub prices: Vec<[u32; 2]>,
}

impl Trajectory {
    pub fn new(positions: Vec<[usize; 2]>, prices: Vec<[u32; 2]>) -> Result<Self> {
        let trajectory = Self { positions, prices };
        trajectory.validate()?;
        Ok(trajectory)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let n_positions = self.positions.len();
        let n_prices = self.prices.len();
        if n_positions != n_prices {
            bail!("trajectory has {n_positions} position rows but {n_prices} price rows");
        }
        Ok(())
    }

    /// Decisions of both firms.
    ///
    /// At every step `t >= 1` each firm's strategy is paired with the
    /// opponent's strategy at step `t - 1`.
    pub fn decisions(&self) -> Vec<Decision> {
        let mut decisions = Vec::with_capacity(2 * self.len().saturating_sub(1));
        for t in 1..self.len() {
            for firm in 0..2 {
                let opp = 1 - firm;
                decisions.push(Decision {
                    player_position: self.positions[t][firm],
                    player_price: self.prices[t][firm],
                    opp_position: self.positions[t - 1][opp],
                    opp_price: self.prices[t - 1][opp],
                });
            }
        }
        decisions
    }

    /// Load a MessagePack-encoded trajectory.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        let trajectory: Trajectory =
            decode::from_read(&mut reader).context("failed to deserialize trajectory")?;
        trajectory.validate().context("invalid trajectory")?;
        Ok(trajectory)
    }

    /// Save the trajectory MessagePack-encoded.
    pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write(&mut writer, self).context("failed to serialize trajectory")?;
        writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_respond_to_previous_opponent_step() {
        let trajectory = Trajectory::new(
            vec![[0, 20], [5, 15], [10, 10]],
            vec![[11, 11], [9, 8], [4, 4]],
        )
        .unwrap();

        let decisions = trajectory.decisions();
        assert_eq!(decisions.len(), 4);
        assert_eq!(
            decisions[0],
            Decision {
                player_position: 5,
                player_price: 9,
                opp_position: 20,
                opp_price: 11,
            }
        );
        assert_eq!(
            decisions[1],
            Decision {
                player_position: 15,
                player_price: 8,
                opp_position: 0,
                opp_price: 11,
            }
        );
        assert_eq!(
            decisions[3],
            Decision {
                player_position: 10,
                player_price: 4,
                opp_position: 5,
                opp_price: 9,
            }
        );
    }

    #[test]
    fn short_trajectories_have_no_decisions() {
        assert!(Trajectory::new(vec![], vec![]).unwrap().decisions().is_empty());
        assert!(
            Trajectory::new(vec![[1, 2]], vec![[3, 4]])
                .unwrap()
                .decisions()
                .is_empty()
        );
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        assert!(Trajectory::new(vec![[1, 2]], vec![]).is_err());
    }

    #[test]
    fn file_roundtrip() {
        let file = std::env::temp_dir().join(format!(
            "duopoly-trajectory-{}.msgpack",
            std::process::id()
        ));
        let trajectory = Trajectory::new(vec![[3, 7], [4, 7]], vec![[2, 5], [2, 6]]).unwrap();
        trajectory.save(&file).unwrap();
        assert_eq!(Trajectory::from_file(&file).unwrap(), trajectory);
        std::fs::remove_file(&file).ok();
    }
}
