//! Tabular file reading (CSV, spreadsheets) and CSV writing for the pipeline

use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use datascrub_core::{Column, Table};
use std::path::Path;

/// Cell contents treated as missing, compared case-insensitively after trimming
const MISSING_TOKENS: [&str; 4] = ["na", "n/a", "nan", "null"];

fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || MISSING_TOKENS.iter().any(|token| raw.eq_ignore_ascii_case(token))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn parse_csv_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn all_present<F: Fn(&str) -> bool>(cells: &[Option<String>], predicate: F) -> bool {
    cells.iter().flatten().all(|cell| predicate(cell))
}

/// Pick the semantic type for a column from its raw cells
fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    if all_present(&cells, |s| parse_number(s).is_some()) {
        let values = cells.iter().map(|c| c.as_deref().and_then(parse_number)).collect();
        Column::numeric(name, values)
    } else if all_present(&cells, |s| parse_csv_bool(s).is_some()) {
        let values = cells.iter().map(|c| c.as_deref().and_then(parse_csv_bool)).collect();
        Column::boolean(name, values)
    } else {
        Column::text(name, cells)
    }
}

/// Header names plus the raw cells of each column
type RawColumns = (Vec<String>, Vec<Vec<Option<String>>>);

fn push_row<'a>(cells: &mut [Vec<Option<String>>], mut row: impl Iterator<Item = Option<&'a str>>) {
    for column in cells.iter_mut() {
        let raw = row.next().flatten().unwrap_or("");
        column.push(if is_missing(raw) { None } else { Some(raw.to_string()) });
    }
}

fn read_csv(path: &Path) -> Result<RawColumns> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", index + 1))?;
        push_row(&mut cells, record.iter().map(Some));
    }

    Ok((headers, cells))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read the first sheet of a workbook. The first row holds the headers.
fn read_workbook(path: &Path) -> Result<RawColumns> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Workbook {} has no sheets", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet {} of {}", sheet, path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
        .unwrap_or_default();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        let texts: Vec<Option<String>> = row.iter().map(cell_text).collect();
        push_row(&mut cells, texts.iter().map(|t| t.as_deref()));
    }

    tracing::debug!(sheet = sheet.as_str(), "Read first sheet of {}", path.display());
    Ok((headers, cells))
}

/// Read a CSV file or a spreadsheet (`.xlsx`, `.xls`) into a typed table
pub fn read_table(path: &Path) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let (headers, cells) = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xls" => read_workbook(path)?,
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .xlsx files",
            path.display()
        ),
    };

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    let table = Table::from_columns(columns)
        .with_context(|| format!("Failed to build table from {}", path.display()))?;
    tracing::debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded {}",
        path.display()
    );
    Ok(table)
}

/// Write a table as CSV. Missing cells are written as empty fields.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.get(row).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    tracing::debug!(rows = table.row_count(), "Wrote {}", path.display());
    Ok(())
}
