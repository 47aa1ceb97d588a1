use crate::error::{Result, ScrubError};
use crate::models::{ColumnData, Table};
use crate::report::Reporter;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Case transform applied to every text column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    None,
    Lower,
    Upper,
    Title,
}

impl TextCase {
    pub fn apply(self, s: &str) -> String {
        match self {
            TextCase::None => s.to_string(),
            TextCase::Lower => s.to_lowercase(),
            TextCase::Upper => s.to_uppercase(),
            TextCase::Title => title_case(s),
        }
    }
}

impl FromStr for TextCase {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(TextCase::None),
            "lower" => Ok(TextCase::Lower),
            "upper" => Ok(TextCase::Upper),
            "title" => Ok(TextCase::Title),
            _ => Err(ScrubError::ConfigInvalid {
                key: "text_norm".to_string(),
                reason: format!("Invalid text case: {}. Use lower, upper, or title", s),
            }),
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextCase::None => "none",
            TextCase::Lower => "lower",
            TextCase::Upper => "upper",
            TextCase::Title => "title",
        };
        f.write_str(name)
    }
}

/// Upper-case the first letter of every run of letters and lower-case the rest.
/// Any non-letter starts a new word, so `o'neil` becomes `O'Neil`.
///
/// When the upper-case form spans several characters (`ß` → `SS`) only the
/// first stays upper-case, so `ßtraße` becomes `Sstraße`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Normalization settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeSpec {
    pub text_case: TextCase,
    pub scale_numeric: bool,
    /// Columns to reparse as dates, with their strftime-style format, in order
    pub date_formats: Vec<(String, String)>,
}

impl NormalizeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_case(mut self, text_case: TextCase) -> Self {
        self.text_case = text_case;
        self
    }

    pub fn with_scaling(mut self, scale_numeric: bool) -> Self {
        self.scale_numeric = scale_numeric;
        self
    }

    pub fn with_date_format(mut self, column: impl Into<String>, format: impl Into<String>) -> Self {
        self.date_formats.push((column.into(), format.into()));
        self
    }
}

/// Parse `s` with a strftime-style format.
///
/// Formats carrying an offset are converted to UTC; date-only formats
/// yield midnight.
pub fn parse_with_format(s: &str, format: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DateTime::parse_from_str(s, format)
        .map(|d| d.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, format))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, format).ok().map(|d| d.and_time(NaiveTime::MIN)))
}

/// Min-max scale in place. Returns the (min, max) used, or `None` when the
/// column has no values. A constant column scales to 0.0.
fn min_max_scale(values: &mut [Option<f64>]) -> Option<(f64, f64)> {
    let (min, max) = values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let range = max - min;
    for value in values.iter_mut().flatten() {
        *value = if range == 0.0 {
            0.0
        } else if range.is_finite() {
            (*value - min) / range
        } else {
            // Extremes far enough apart that `max - min` overflows
            (*value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
        };
    }
    Some((min, max))
}

fn parse_dates(data: &ColumnData, format: &str) -> ColumnData {
    let parsed = match data {
        ColumnData::Date(_) => return data.clone(),
        ColumnData::Text(values) => values
            .iter()
            .map(|v| v.as_deref().and_then(|s| parse_with_format(s, format)))
            .collect(),
        other => (0..other.len())
            .map(|row| other.get(row).and_then(|v| parse_with_format(&v.to_string(), format)))
            .collect(),
    };
    ColumnData::Date(parsed)
}

/// Normalize text case, numeric scale, and date representation.
///
/// Text and numeric steps cover every column of that type. Date parsing
/// covers only the listed columns; cells that fail to parse become missing.
pub fn normalize(
    table: &mut Table,
    spec: &NormalizeSpec,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    for (column, _) in &spec.date_formats {
        table.column(column)?;
    }

    if spec.text_case != TextCase::None {
        for (name, data) in table.columns_mut() {
            if let ColumnData::Text(values) = data {
                for value in values.iter_mut().flatten() {
                    *value = spec.text_case.apply(value);
                }
                tracing::debug!(column = name, case = %spec.text_case, "Normalized text case");
                reporter.report(name, &format!("Converted text to {} case", spec.text_case));
            }
        }
    }

    if spec.scale_numeric {
        for (name, data) in table.columns_mut() {
            if let ColumnData::Numeric(values) = data {
                match min_max_scale(values) {
                    Some((min, max)) if min == max => {
                        tracing::debug!(column = name, value = min, "Constant column scaled to 0");
                        reporter.report(name, &format!("Constant column ({}), scaled to 0.0", min));
                    }
                    Some((min, max)) => {
                        tracing::debug!(column = name, min, max, "Applied min-max scaling");
                        reporter.report(
                            name,
                            &format!("Min-max scaled from [{}, {}] to [0, 1]", min, max),
                        );
                    }
                    None => reporter.report(name, "Skipped scaling: column has no values"),
                }
            }
        }
    }

    for (column, format) in &spec.date_formats {
        let data = table.column_data_mut(column)?;
        let parsed = parse_dates(data, format);
        let unparsed = parsed.missing_count().saturating_sub(data.missing_count());
        *data = parsed;

        if unparsed > 0 {
            tracing::warn!(column = column.as_str(), unparsed, "Values did not match date format");
        }
        reporter.report(
            column,
            &format!("Parsed dates with format {} ({} unparsable)", format, unparsed),
        );
    }

    tracing::info!(
        text_case = %spec.text_case,
        scale_numeric = spec.scale_numeric,
        date_columns = spec.date_formats.len(),
        "Normalized table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, Value};
    use crate::report::{NoopReporter, RecordingReporter};

    fn texts(values: &[Option<&str>]) -> ColumnData {
        ColumnData::Text(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("LOS ANGELES-area2x"), "Los Angeles-Area2X");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_multi_char_uppercase() {
        assert_eq!(title_case("ßtraße"), "Sstraße");
        assert_eq!(title_case("ﬁne"), "Fine");
        assert_eq!(title_case(&title_case("ßtraße ﬁne")), "Sstraße Fine");
    }

    #[test]
    fn test_text_case_parse() {
        assert_eq!("Upper".parse::<TextCase>().unwrap(), TextCase::Upper);
        assert!("shout".parse::<TextCase>().is_err());
    }

    #[test]
    fn test_text_normalization_keeps_missing() {
        let mut table = Table::from_columns(vec![
            Column::text("city", vec![Some("New York"), None, Some("la")]),
            Column::numeric("age", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .unwrap();

        let spec = NormalizeSpec::new().with_text_case(TextCase::Upper);
        normalize(&mut table, &spec, &mut NoopReporter).unwrap();

        assert_eq!(
            table.column("city").unwrap().data(),
            &texts(&[Some("NEW YORK"), None, Some("LA")])
        );
        assert_eq!(table.column("age").unwrap().get(2), Some(Value::Numeric(3.0)));
    }

    #[test]
    fn test_min_max_scaling() {
        let mut values = vec![Some(10.0), None, Some(20.0), Some(15.0)];
        assert_eq!(min_max_scale(&mut values), Some((10.0, 20.0)));
        assert_eq!(values, vec![Some(0.0), None, Some(1.0), Some(0.5)]);
    }

    #[test]
    fn test_scaling_extreme_magnitudes() {
        let mut values = vec![Some(-1e308), None, Some(0.0), Some(1e308)];
        assert_eq!(min_max_scale(&mut values), Some((-1e308, 1e308)));
        assert_eq!(values, vec![Some(0.0), None, Some(0.5), Some(1.0)]);

        let mut values = vec![Some(f64::MAX), Some(f64::MIN)];
        min_max_scale(&mut values);
        assert_eq!(values, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_constant_column_scales_to_zero() {
        let mut values = vec![Some(7.0), Some(7.0), None];
        assert_eq!(min_max_scale(&mut values), Some((7.0, 7.0)));
        assert_eq!(values, vec![Some(0.0), Some(0.0), None]);

        let mut single = vec![Some(3.5)];
        min_max_scale(&mut single);
        assert_eq!(single, vec![Some(0.0)]);
    }

    #[test]
    fn test_scaling_empty_column() {
        let mut values: Vec<Option<f64>> = vec![None, None];
        assert_eq!(min_max_scale(&mut values), None);
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn test_date_parsing_coerces_failures_to_missing() {
        let mut table = Table::from_columns(vec![Column::text(
            "joined",
            vec![Some("03/01/2024"), Some("not a date"), None, Some("12/31/2023")],
        )])
        .unwrap();

        let spec = NormalizeSpec::new().with_date_format("joined", "%m/%d/%Y");
        let mut reporter = RecordingReporter::new();
        normalize(&mut table, &spec, &mut reporter).unwrap();

        let column = table.column("joined").unwrap();
        assert_eq!(column.kind(), crate::models::SemanticType::Date);
        assert_eq!(column.get(0).unwrap().to_string(), "2024-03-01");
        assert_eq!(column.get(1), None);
        assert_eq!(column.get(2), None);
        assert_eq!(column.get(3).unwrap().to_string(), "2023-12-31");
        assert_eq!(
            reporter.events()[0].description,
            "Parsed dates with format %m/%d/%Y (1 unparsable)"
        );
    }

    #[test]
    fn test_parse_with_format_variants() {
        let value = parse_with_format("2024-03-01 08:15:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(value.to_string(), "2024-03-01 08:15:00");

        let value =
            parse_with_format("2024-03-01T10:00:00+02:00", "%Y-%m-%dT%H:%M:%S%:z").unwrap();
        assert_eq!(value.format("%H:%M").to_string(), "08:00");

        assert!(parse_with_format("2024-13-01", "%Y-%m-%d").is_none());
    }

    #[test]
    fn test_missing_date_column_fails_before_mutation() {
        let mut table =
            Table::from_columns(vec![Column::text("city", vec![Some("ny")])]).unwrap();
        let before = table.clone();

        let spec = NormalizeSpec::new()
            .with_text_case(TextCase::Upper)
            .with_date_format("signup", "%Y-%m-%d");

        let err = normalize(&mut table, &spec, &mut NoopReporter).unwrap_err();
        assert!(matches!(err, ScrubError::ColumnNotFound { column } if column == "signup"));
        assert_eq!(table, before);
    }
}
