use crate::error::{Result, ScrubError};
use crate::models::{ColumnData, Table, Value};
use crate::report::Reporter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How missing cells of a column are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Arithmetic mean of the present values (numeric columns only)
    Mean,
    /// Median of the present values (numeric columns only)
    Median,
    /// Most frequent present value; ties go to the smallest value
    Mode,
    /// Carry the previous present value down
    #[serde(rename = "ffill")]
    ForwardFill,
    /// Carry the next present value up
    #[serde(rename = "bfill")]
    BackwardFill,
}

impl FromStr for FillStrategy {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(FillStrategy::Mean),
            "median" => Ok(FillStrategy::Median),
            "mode" => Ok(FillStrategy::Mode),
            "ffill" | "forward_fill" | "pad" => Ok(FillStrategy::ForwardFill),
            "bfill" | "backward_fill" | "backfill" => Ok(FillStrategy::BackwardFill),
            _ => Err(ScrubError::InvalidStrategy { token: s.to_string() }),
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            FillStrategy::Mean => "mean",
            FillStrategy::Median => "median",
            FillStrategy::Mode => "mode",
            FillStrategy::ForwardFill => "ffill",
            FillStrategy::BackwardFill => "bfill",
        };
        f.write_str(token)
    }
}

/// Result of applying one strategy to one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Number of cells that received a value
    Filled(usize),
    /// Strategy did not apply to this column
    Skipped(&'static str),
}

impl FillStrategy {
    /// Apply the strategy to one column's cells
    pub fn apply(self, data: &mut ColumnData, column: &str) -> Result<FillOutcome> {
        match self {
            FillStrategy::Mean | FillStrategy::Median => {
                let ColumnData::Numeric(values) = data else {
                    return Ok(FillOutcome::Skipped("column is not numeric"));
                };
                let statistic = if self == FillStrategy::Mean {
                    mean(values)
                } else {
                    median(values)
                };
                match statistic {
                    Some(stat) => Ok(FillOutcome::Filled(fill_with(values, stat))),
                    None => Ok(FillOutcome::Skipped("column has no values")),
                }
            }
            FillStrategy::Mode => match mode(&data.present_values()) {
                Some(value) => Ok(FillOutcome::Filled(data.fill_missing_with(&value, column)?)),
                None => Ok(FillOutcome::Skipped("column has no values")),
            },
            FillStrategy::ForwardFill => Ok(FillOutcome::Filled(propagate(data, false))),
            FillStrategy::BackwardFill => Ok(FillOutcome::Filled(propagate(data, true))),
        }
    }
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Most frequent value; ties resolve to the smallest in natural order
fn mode(values: &[Value]) -> Option<Value> {
    let mut sorted: Vec<&Value> = values.iter().collect();
    sorted.sort_by(|a, b| a.natural_cmp(b));

    let mut best: Option<(&Value, usize)> = None;
    let mut run_start = 0;
    while run_start < sorted.len() {
        let current = sorted[run_start];
        let run_len = sorted[run_start..]
            .iter()
            .take_while(|v| v.natural_cmp(current).is_eq())
            .count();
        if best.map_or(true, |(_, count)| run_len > count) {
            best = Some((current, run_len));
        }
        run_start += run_len;
    }

    best.map(|(value, _)| value.clone())
}

fn fill_with(values: &mut [Option<f64>], fill: f64) -> usize {
    let mut filled = 0;
    for cell in values.iter_mut().filter(|c| c.is_none()) {
        *cell = Some(fill);
        filled += 1;
    }
    filled
}

fn propagate(data: &mut ColumnData, backward: bool) -> usize {
    match data {
        ColumnData::Numeric(v) => carry(v, backward),
        ColumnData::Text(v) => carry(v, backward),
        ColumnData::Date(v) => carry(v, backward),
        ColumnData::Boolean(v) => carry(v, backward),
    }
}

/// Copy the nearest present value into following (or preceding) gaps.
/// Gaps before the first present value in the walk direction stay missing.
fn carry<T: Clone>(values: &mut [Option<T>], backward: bool) -> usize {
    let mut last: Option<T> = None;
    let mut filled = 0;

    let mut visit = |cell: &mut Option<T>| {
        if let Some(value) = cell {
            last = Some(value.clone());
        } else if let Some(value) = &last {
            *cell = Some(value.clone());
            filled += 1;
        }
    };

    if backward {
        values.iter_mut().rev().for_each(&mut visit);
    } else {
        values.iter_mut().for_each(&mut visit);
    }

    filled
}

/// Per-column fill instructions.
///
/// Strategies run first, in insertion order, then custom values, in
/// insertion order. A custom value therefore fills whatever its column
/// still lacks after any strategy for the same column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillSpec {
    strategies: Vec<(String, FillStrategy)>,
    custom_values: Vec<(String, Value)>,
}

impl FillSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, column: impl Into<String>, strategy: FillStrategy) -> Self {
        self.strategies.push((column.into(), strategy));
        self
    }

    /// Add a strategy given as a token such as `"mean"` or `"ffill"`
    pub fn with_strategy_token(self, column: impl Into<String>, token: &str) -> Result<Self> {
        let strategy = token.parse::<FillStrategy>()?;
        Ok(self.with_strategy(column, strategy))
    }

    pub fn with_custom_value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_values.push((column.into(), value.into()));
        self
    }

    pub fn strategies(&self) -> &[(String, FillStrategy)] {
        &self.strategies
    }

    pub fn custom_values(&self) -> &[(String, Value)] {
        &self.custom_values
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty() && self.custom_values.is_empty()
    }
}

/// Fill missing cells according to `spec`.
///
/// Every referenced column and every custom value is checked before the
/// table is touched, so a `ColumnNotFound` or `TypeMismatch` leaves the
/// table unchanged. Returns the total number of cells filled.
pub fn fill_missing(
    table: &mut Table,
    spec: &FillSpec,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    for (column, _) in &spec.strategies {
        table.column(column)?;
    }
    for (column, value) in &spec.custom_values {
        let kind = table.column(column)?.kind();
        value.coerce_to(kind, column)?;
    }

    let mut total = 0;

    for (column, strategy) in &spec.strategies {
        let data = table.column_data_mut(column)?;
        match strategy.apply(data, column)? {
            FillOutcome::Filled(count) => {
                tracing::debug!(column = column.as_str(), %strategy, count, "Applied fill strategy");
                total += count;
                reporter.report(
                    column,
                    &format!("Filled {} missing values using {}", count, strategy),
                );
            }
            FillOutcome::Skipped(reason) => {
                tracing::debug!(column = column.as_str(), %strategy, reason, "Skipped fill strategy");
                reporter.report(column, &format!("Skipped {}: {}", strategy, reason));
            }
        }
    }

    for (column, value) in &spec.custom_values {
        let data = table.column_data_mut(column)?;
        let count = data.fill_missing_with(value, column)?;
        tracing::debug!(column = column.as_str(), %value, count, "Applied custom fill value");
        total += count;
        reporter.report(
            column,
            &format!("Filled {} missing values with custom value {}", count, value),
        );
    }

    tracing::info!(filled = total, "Filled missing values");
    Ok(total)
}
