//! Prescription statistics.

use super::percentage;
use crate::models::Record;
use std::collections::HashMap;

/// Rank reported as the "third most frequent" medicine.
pub const REPORTED_RANK: usize = 3;

/// Split of medicines by active flag, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivityDistribution {
    pub active: usize,
    pub inactive: usize,
    pub active_percentage: f64,
    pub inactive_percentage: f64,
}

/// Mean number of medicines per record; 0 for an empty collection.
pub fn average_medicines(records: &[Record]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: usize = records.iter().map(Record::medicine_count).sum();
    total as f64 / records.len() as f64
}

/// Prescription count per medicine name, most frequent first.
///
/// Names with equal counts keep the order they were first seen in.
/// Unnamed medicines are skipped.
pub fn medicine_frequencies(records: &[Record]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<(String, usize)> = Vec::new();

    let names = records
        .iter()
        .flat_map(|r| r.medicines())
        .filter_map(|m| m.medicine_name.as_deref());

    for name in names {
        match index.get(name).copied() {
            Some(slot) => frequencies[slot].1 += 1,
            None => {
                index.insert(name, frequencies.len());
                frequencies.push((name.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    frequencies.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    frequencies
}

/// Medicine name at the given 1-based frequency rank, if that many
/// distinct names exist.
pub fn nth_most_frequent_medicine(records: &[Record], rank: usize) -> Option<String> {
    if rank == 0 {
        return None;
    }
    medicine_frequencies(records)
        .into_iter()
        .nth(rank - 1)
        .map(|(name, _)| name)
}

/// Active versus inactive medicines across all records.
pub fn activity_distribution(records: &[Record]) -> ActivityDistribution {
    let (active, inactive) = records
        .iter()
        .flat_map(|r| r.medicines())
        .fold((0, 0), |(active, inactive), m| {
            if m.active() {
                (active + 1, inactive)
            } else {
                (active, inactive + 1)
            }
        });

    let total = active + inactive;
    ActivityDistribution {
        active,
        inactive,
        active_percentage: percentage(active, total),
        inactive_percentage: percentage(inactive, total),
    }
}
