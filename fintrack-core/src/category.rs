//! Per-category rollup of the current transaction list.
//!
//! Categories are assigned by the backend; this only summarizes them.

use std::collections::BTreeMap;

use crate::transaction::TransactionRecord;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    /// Signed sum of amounts
    pub total: f64,
}

/// Group records by category, sorted by name
pub fn summarize_categories(records: &[TransactionRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for r in records {
        let name = r
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);
        let entry = groups.entry(name.to_string()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += r.amount;
    }

    groups
        .into_iter()
        .map(|(name, (count, total))| CategorySummary { name, count, total })
        .collect()
}
