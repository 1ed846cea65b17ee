//! Statistics passes over the record collection.
//!
//! Each submodule holds one family of reductions. The aggregator runs
//! them in a fixed order, because imputation and annotation mutate
//! the records that later passes read.

pub mod age;
pub mod aggregator;
pub mod correlation;
pub mod demographics;
pub mod medicines;
pub mod phone;

pub use aggregator::*;

/// `part` as a percentage of `total`, or 0 when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}
