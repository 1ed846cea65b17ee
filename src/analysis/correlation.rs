//! Correlation between patient age and prescription count.

use super::age::record_age;
use crate::models::Record;
use tracing::debug;

/// Pearson correlation coefficient of two paired samples.
///
/// Uses population standard deviations. Returns `None` for empty or
/// mismatched input, and when either sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut covariance, mut sum_sq_x, mut sum_sq_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let std_x = (sum_sq_x / n).sqrt();
    let std_y = (sum_sq_y / n).sqrt();
    let denominator = n * std_x * std_y;

    if denominator == 0.0 {
        return None;
    }

    Some(covariance / denominator)
}

/// Correlation between age and medicine count over records with a known age.
///
/// Records without a derivable age are dropped from both samples.
pub fn age_medicine_correlation(records: &[Record], reference_year: i32) -> Option<f64> {
    let (ages, counts): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter_map(|r| {
            record_age(r, reference_year).map(|age| (age as f64, r.medicine_count() as f64))
        })
        .unzip();

    debug!("Correlating {} records with a known age", ages.len());
    pearson(&ages, &counts)
}
