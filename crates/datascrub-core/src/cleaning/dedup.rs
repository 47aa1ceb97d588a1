use crate::models::{ColumnData, Table};
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Hashable view of one cell. Numbers compare by bit pattern after
/// folding -0.0 into 0.0 and every NaN into one canonical NaN.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Numeric(u64),
    Text(&'a str),
    Date(NaiveDateTime),
    Boolean(bool),
}

fn numeric_key(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn cell_key(data: &ColumnData, row: usize) -> CellKey<'_> {
    let key = match data {
        ColumnData::Numeric(v) => {
            v.get(row).copied().flatten().map(|n| CellKey::Numeric(numeric_key(n)))
        }
        ColumnData::Text(v) => v.get(row).and_then(|s| s.as_deref()).map(CellKey::Text),
        ColumnData::Date(v) => v.get(row).copied().flatten().map(CellKey::Date),
        ColumnData::Boolean(v) => v.get(row).copied().flatten().map(CellKey::Boolean),
    };
    key.unwrap_or(CellKey::Missing)
}

/// Remove rows that exactly repeat an earlier row.
///
/// Missing cells compare equal to each other. The first occurrence is kept
/// and the surviving rows stay in their original order. Returns the number
/// of rows removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let before = table.row_count();

    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(before);
        (0..before)
            .map(|row| {
                let key: Vec<CellKey<'_>> =
                    table.columns().iter().map(|c| cell_key(c.data(), row)).collect();
                seen.insert(key)
            })
            .collect()
    };

    table.retain_rows(&keep);
    let removed = before - table.row_count();

    tracing::info!(removed, remaining = table.row_count(), "Removed duplicate rows");
    removed
}
