//! Consumer field of view on the linear market.

/// Inclusive interval of positions visible to a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOfView {
    pub min: usize,
    pub max: usize,
}

impl FieldOfView {
    pub fn contains(&self, position: usize) -> bool {
        self.min <= position && position <= self.max
    }
}

/// Integer visibility radius, `r_fraction * n_positions` truncated toward zero.
pub fn radius(r_fraction: f64, n_positions: usize) -> usize {
    (r_fraction * n_positions as f64) as usize
}

/// Field of view of a consumer at `x`, clamped to `[0, n_positions - 1]`.
pub fn field_of_view(x: usize, r_fraction: f64, n_positions: usize) -> FieldOfView {
    let r = radius(r_fraction, n_positions);
    FieldOfView {
        min: x.saturating_sub(r),
        max: (x + r).min(n_positions.saturating_sub(1)),
    }
}
