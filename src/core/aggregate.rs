use crate::domain::model::{PivotTable, RecordSet};
use std::collections::HashMap;

/// Permissive numeric coercion: trims and parses the raw quantity text,
/// treating anything unparsable or non-finite as 0. Total by design; a
/// quantity cell never aborts aggregation.
pub fn coerce_quantity(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Merges all record sets into the company-by-owner pivot.
///
/// Returns `None` when no records exist at all (every file was empty or
/// skipped), so callers can distinguish "nothing to show" from an empty
/// table. Companies appear in the order the grouping pass first encounters
/// them; owners in first-seen order.
pub fn pivot(sets: &[RecordSet]) -> Option<PivotTable> {
    let records: Vec<_> = sets.iter().flat_map(|set| set.records.iter()).collect();
    if records.is_empty() {
        return None;
    }

    let mut companies: Vec<String> = Vec::new();
    let mut owners: Vec<String> = Vec::new();
    let mut company_index: HashMap<String, usize> = HashMap::new();
    let mut owner_index: HashMap<String, usize> = HashMap::new();
    let mut cells: HashMap<(usize, usize), f64> = HashMap::new();

    for record in records {
        let row = *company_index
            .entry(record.company.clone())
            .or_insert_with(|| {
                companies.push(record.company.clone());
                companies.len() - 1
            });
        let col = *owner_index.entry(record.owner.clone()).or_insert_with(|| {
            owners.push(record.owner.clone());
            owners.len() - 1
        });
        *cells.entry((row, col)).or_insert(0.0) += coerce_quantity(&record.quantity);
    }

    let mut values = vec![vec![0.0; owners.len()]; companies.len()];
    for ((row, col), sum) in cells {
        values[row][col] = sum;
    }

    Some(PivotTable::new(companies, owners, values))
}
