//! Consumer allocation tensor.
//!
//! For every ordered pair of firm positions `(i, j)` the tensor holds the
//! number of consumer locations that see only the firm at `i`, only the firm
//! at `j`, or both. Locations that see neither firm are not counted.

use crate::error::{ModelError, ModelResult};
use crate::geometry::{FieldOfView, field_of_view};
use std::{collections::HashMap, sync::Arc};

/// Consumer split for one pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Split {
    pub captive_a: u32,
    pub captive_b: u32,
    pub shared: u32,
}

impl Split {
    /// Split seen from the other firm.
    pub fn swapped(self) -> Self {
        Self {
            captive_a: self.captive_b,
            captive_b: self.captive_a,
            shared: self.shared,
        }
    }

    pub fn total(&self) -> u32 {
        self.captive_a + self.captive_b + self.shared
    }
}

/// Read-only lookup table of consumer splits, built once per visibility radius.
#[derive(Debug, Clone)]
pub struct Allocation {
    n_positions: usize,
    r_fraction: f64,
    splits: Vec<Split>,
}

impl Allocation {
    /// Build the tensor for visibility radius fraction `r_fraction`.
    pub fn build(n_positions: usize, r_fraction: f64) -> ModelResult<Self> {
        check_r_fraction(r_fraction)?;
        if n_positions == 0 {
            return Err(ModelError::Config(
                "number of positions must be at least 1".to_string(),
            ));
        }

        let fov_vec: Vec<FieldOfView> = (0..n_positions)
            .map(|x| field_of_view(x, r_fraction, n_positions))
            .collect();

        let mut splits = vec![Split::default(); n_positions * n_positions];

        // Upper triangle only, the lower one is the mirror image.
        for i in 0..n_positions {
            for j in i..n_positions {
                let mut split = Split::default();
                for fov in &fov_vec {
                    match (fov.contains(i), fov.contains(j)) {
                        (true, true) => split.shared += 1,
                        (true, false) => split.captive_a += 1,
                        (false, true) => split.captive_b += 1,
                        (false, false) => {}
                    }
                }
                splits[i * n_positions + j] = split;
                splits[j * n_positions + i] = split.swapped();
            }
        }

        log::debug!("built consumer allocation for r = {r_fraction}");

        Ok(Self {
            n_positions,
            r_fraction,
            splits,
        })
    }

    pub fn n_positions(&self) -> usize {
        self.n_positions
    }

    pub fn r_fraction(&self) -> f64 {
        self.r_fraction
    }

    /// Split for firm A at position `i` and firm B at position `j`.
    pub fn split(&self, i: usize, j: usize) -> ModelResult<Split> {
        for position in [i, j] {
            if position >= self.n_positions {
                return Err(ModelError::Position {
                    position,
                    n_positions: self.n_positions,
                });
            }
        }
        Ok(self.get(i, j))
    }

    /// Unchecked lookup; positions come from a validated strategy.
    pub(crate) fn get(&self, i: usize, j: usize) -> Split {
        self.splits[i * self.n_positions + j]
    }
}

fn check_r_fraction(r_fraction: f64) -> ModelResult<()> {
    if !(0.0..=1.0).contains(&r_fraction) {
        return Err(ModelError::Config(format!(
            "visibility radius fraction must be in [0, 1], but is {r_fraction}"
        )));
    }
    Ok(())
}

/// Allocation tensors shared among models, one per distinct `r_fraction`.
#[derive(Debug)]
pub struct AllocationCache {
    n_positions: usize,
    entries: HashMap<u64, Arc<Allocation>>,
}

impl AllocationCache {
    pub fn new(n_positions: usize) -> Self {
        Self {
            n_positions,
            entries: HashMap::new(),
        }
    }

    /// Return the tensor for `r_fraction`, building it on first request.
    pub fn get_or_build(&mut self, r_fraction: f64) -> ModelResult<Arc<Allocation>> {
        check_r_fraction(r_fraction)?;

        // Normalize -0.0 so both zeros share one entry.
        let key = (r_fraction + 0.0).to_bits();
        if let Some(allocation) = self.entries.get(&key) {
            log::debug!("reusing consumer allocation for r = {r_fraction}");
            return Ok(Arc::clone(allocation));
        }

        let allocation = Arc::new(Allocation::build(self.n_positions, r_fraction)?);
        self.entries.insert(key, Arc::clone(&allocation));
        Ok(allocation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
