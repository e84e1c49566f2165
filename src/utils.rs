use anyhow::{Result, bail};
use std::{fmt::Debug, ops::RangeBounds};

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {:?}, but is {:?}", range, num);
    }

    Ok(())
}

pub fn check_grid<R>(grid: &[f64], range: R) -> Result<()>
where
    R: RangeBounds<f64> + Debug,
{
    if grid.is_empty() {
        bail!("grid must have at least one value");
    }

    for (i_val, &val) in grid.iter().enumerate() {
        if !val.is_finite() {
            bail!("grid value {i_val} must be finite, but is {val}");
        }
        if !range.contains(&val) {
            bail!("grid value {i_val} must be in the range {range:?}, but is {val}");
        }
    }

    Ok(())
}
