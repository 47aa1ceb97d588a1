//! Clean command implementation
//!
//! Runs the pipeline load → dedup → fill → normalize → geo → save. A failed
//! step is reported and skipped unless strict mode is on.

use crate::cli::CleanArgs;
use crate::config_loader;
use crate::output::OutputWriter;
use crate::output_types::{CleanOutput, StepReport, StepStatus};
use crate::table_io;
use anyhow::{anyhow, bail, Context, Result};
use datascrub_core::cleaning::{FillSpec, NormalizeSpec};
use datascrub_core::config::{CliConfigOverrides, LayeredConfig};
use datascrub_core::report::RecordingReporter;
use datascrub_core::{fill_missing, normalize, remove_duplicates, Table, Value};
use datascrub_geo::{check_geo_integrity_with, Boundary, GeoColumns};
use serde_json::Map;
use std::fs;

pub fn execute(args: CleanArgs, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides {
        text_norm: args.text_norm.map(Into::into),
        scale_numeric: args.scale_nums.then_some(true),
        output: args.output.clone(),
        strict: args.strict.then_some(true),
    };
    let config = config_loader::load_config_with_overrides(args.config.as_deref(), overrides)?;

    let mut table = table_io::read_table(&args.input)?;
    if !output.is_json() {
        output.info(format!(
            "Loaded {} rows and {} columns from {}",
            table.row_count(),
            table.column_count(),
            args.input.display()
        ));
    }

    let mut pipeline = Pipeline::new(output, config.strict.value);

    if args.remove_duplicates {
        let removed = remove_duplicates(&mut table);
        pipeline.record("remove duplicates", Ok(format!("Removed {} duplicate rows", removed)))?;
    }

    if args.fill_strategies.is_some() || args.fill_values.is_some() {
        let result = fill_spec(args.fill_strategies.as_deref(), args.fill_values.as_deref())
            .and_then(|spec| Ok(fill_missing(&mut table, &spec, &mut pipeline.reporter)?))
            .map(|filled| format!("Filled {} missing values", filled));
        pipeline.record("fill missing values", result)?;
    }

    if args.normalize {
        let result = normalize_spec(&args, &config)
            .and_then(|spec| Ok(normalize(&mut table, &spec, &mut pipeline.reporter)?))
            .map(|()| "Normalized data".to_string());
        pipeline.record("normalize", result)?;
    }

    if args.check_geo {
        let result = check_geo(&args, &config, &table).map(|(checked, message)| {
            table = checked;
            message
        });
        pipeline.record("check geographic integrity", result)?;
    }

    let destination = &config.output.value;
    table_io::write_table(&table, destination)
        .with_context(|| format!("Failed to save cleaned data to {}", destination.display()))?;

    if output.is_json() {
        output.result(CleanOutput {
            input: args.input.display().to_string(),
            output: destination.display().to_string(),
            rows: table.row_count(),
            columns: table.column_count(),
            steps: pipeline.steps,
            events: pipeline.reporter.into_events(),
        })?;
    } else {
        output.kv("Rows", table.row_count());
        output.kv("Columns", table.column_count());
        output.success(format!("Cleaned data saved to {}", destination.display()));
    }

    Ok(())
}

/// Step bookkeeping shared by the pipeline stages
struct Pipeline<'a> {
    output: &'a OutputWriter,
    strict: bool,
    reporter: RecordingReporter,
    reported: usize,
    steps: Vec<StepReport>,
}

impl<'a> Pipeline<'a> {
    fn new(output: &'a OutputWriter, strict: bool) -> Self {
        Self {
            output,
            strict,
            reporter: RecordingReporter::new(),
            reported: 0,
            steps: Vec::new(),
        }
    }

    /// Record the outcome of a step; in strict mode a failure ends the run
    fn record(&mut self, step: &str, result: Result<String>) -> Result<()> {
        let human = !self.output.is_json();
        if human {
            for event in &self.reporter.events()[self.reported..] {
                self.output.info(format!("{}: {}", event.column, event.description));
            }
        }
        self.reported = self.reporter.events().len();

        match result {
            Ok(message) => {
                tracing::debug!(step, "{}", message);
                if human {
                    self.output.success(format!("{}: {}", step, message));
                }
                self.steps.push(StepReport {
                    step: step.to_string(),
                    status: StepStatus::Success,
                    message,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(step, "Step failed: {:#}", e);
                if self.strict {
                    return Err(e.context(format!("Step '{}' failed", step)));
                }
                if human {
                    self.output.error(format!("{}: {:#}", step, e));
                }
                self.steps.push(StepReport {
                    step: step.to_string(),
                    status: StepStatus::Error,
                    message: format!("{:#}", e),
                });
                Ok(())
            }
        }
    }
}

fn parse_object(flag: &str, json: &str) -> Result<Map<String, serde_json::Value>> {
    serde_json::from_str(json).with_context(|| format!("--{} must be a JSON object", flag))
}

/// Build a fill spec from the `--fill-strategies` and `--fill-values` JSON
/// objects, keeping the order the columns were given in.
fn fill_spec(strategies: Option<&str>, values: Option<&str>) -> Result<FillSpec> {
    let mut spec = FillSpec::new();

    if let Some(json) = strategies {
        for (column, token) in parse_object("fill-strategies", json)? {
            let token = token
                .as_str()
                .ok_or_else(|| anyhow!("Fill strategy for column {} must be a string", column))?
                .to_string();
            spec = spec.with_strategy_token(column, &token)?;
        }
    }

    if let Some(json) = values {
        for (column, literal) in parse_object("fill-values", json)? {
            let value = match literal {
                serde_json::Value::Number(n) => n.as_f64().map(Value::Numeric),
                serde_json::Value::String(s) => Some(Value::Text(s)),
                serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
                _ => None,
            }
            .ok_or_else(|| {
                anyhow!("Fill value for column {} must be a number, string or boolean", column)
            })?;
            spec = spec.with_custom_value(column, value);
        }
    }

    Ok(spec)
}

fn normalize_spec(args: &CleanArgs, config: &LayeredConfig) -> Result<NormalizeSpec> {
    let mut spec = NormalizeSpec::new()
        .with_text_case(config.text_norm.value)
        .with_scaling(config.scale_numeric.value);

    if let Some(json) = args.date_cols.as_deref() {
        for (column, format) in parse_object("date-cols", json)? {
            let format = format
                .as_str()
                .ok_or_else(|| anyhow!("Date format for column {} must be a string", column))?
                .to_string();
            spec = spec.with_date_format(column, format);
        }
    }

    Ok(spec)
}

/// Read `--boundary` as inline JSON, or as a path to a GeoJSON file
fn load_boundary(input: &str) -> Result<Boundary> {
    let trimmed = input.trim_start();
    let content = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        input.to_string()
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read boundary file {}", input))?
    };
    Ok(Boundary::from_json_str(&content)?)
}

fn check_geo(args: &CleanArgs, config: &LayeredConfig, table: &Table) -> Result<(Table, String)> {
    let (Some(lat_col), Some(lon_col), Some(boundary)) =
        (args.lat_col.as_deref(), args.lon_col.as_deref(), args.boundary.as_deref())
    else {
        bail!("--check-geo requires --lat-col, --lon-col and --boundary");
    };

    let boundary = load_boundary(boundary)?;
    let columns = GeoColumns {
        validity: config.validity_column.value.clone(),
        longitude: config.longitude_column.value.clone(),
        latitude: config.latitude_column.value.clone(),
    };
    let checked = check_geo_integrity_with(table, lat_col, lon_col, &boundary, &columns)?;

    let validity = checked.column(&columns.validity)?;
    let valid = (0..checked.row_count())
        .filter(|&row| validity.get(row) == Some(Value::Boolean(true)))
        .count();
    let message = format!("{} of {} rows inside the boundary", valid, checked.row_count());
    Ok((checked, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datascrub_core::cleaning::FillStrategy;

    #[test]
    fn test_fill_spec_keeps_flag_order() {
        let spec = fill_spec(
            Some(r#"{"zeta": "median", "alpha": "ffill"}"#),
            Some(r#"{"city": "unknown", "age": 0, "active": false}"#),
        )
        .unwrap();

        assert_eq!(
            spec.strategies(),
            &[
                ("zeta".to_string(), FillStrategy::Median),
                ("alpha".to_string(), FillStrategy::ForwardFill),
            ]
        );
        assert_eq!(
            spec.custom_values(),
            &[
                ("city".to_string(), Value::from("unknown")),
                ("age".to_string(), Value::Numeric(0.0)),
                ("active".to_string(), Value::Boolean(false)),
            ]
        );
    }

    #[test]
    fn test_fill_spec_rejects_bad_input() {
        assert!(fill_spec(Some(r#"{"age": "average"}"#), None).is_err());
        assert!(fill_spec(Some(r#"["age"]"#), None).is_err());
        assert!(fill_spec(None, Some(r#"{"tags": [1, 2]}"#)).is_err());
    }

    #[test]
    fn test_inline_boundary() {
        let boundary = load_boundary("[[0, 0], [0, 1], [1, 1]]").unwrap();
        assert_eq!(boundary.vertices().len(), 3);
        assert!(load_boundary("/nonexistent/boundary.geojson").is_err());
    }
}
