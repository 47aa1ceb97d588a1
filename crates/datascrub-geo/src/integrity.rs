use crate::boundary::Boundary;
use datascrub_core::error::{Result, ScrubError};
use datascrub_core::models::{Column, ColumnData, Table};
use serde::{Deserialize, Serialize};

/// Names of the columns appended by the integrity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoColumns {
    pub validity: String,
    pub longitude: String,
    pub latitude: String,
}

impl Default for GeoColumns {
    fn default() -> Self {
        Self {
            validity: "geo_valid".to_string(),
            longitude: "original_longitude".to_string(),
            latitude: "original_latitude".to_string(),
        }
    }
}

impl GeoColumns {
    fn names(&self) -> [&str; 3] {
        [&self.validity, &self.longitude, &self.latitude]
    }
}

/// Check every row's (longitude, latitude) against `boundary` using the
/// default output column names.
pub fn check_geo_integrity(
    table: &Table,
    lat_col: &str,
    lon_col: &str,
    boundary: &Boundary,
) -> Result<Table> {
    check_geo_integrity_with(table, lat_col, lon_col, boundary, &GeoColumns::default())
}

/// Check every row's (longitude, latitude) against `boundary`.
///
/// Returns a copy of `table` with three columns appended: a Boolean validity
/// flag and the numeric longitude and latitude each row was checked with.
/// Rows with a missing, unparsable, or out-of-range coordinate are invalid.
/// The input table is not modified.
pub fn check_geo_integrity_with(
    table: &Table,
    lat_col: &str,
    lon_col: &str,
    boundary: &Boundary,
    columns: &GeoColumns,
) -> Result<Table> {
    let latitudes = coordinates(table, lat_col)?;
    let longitudes = coordinates(table, lon_col)?;

    let names = columns.names();
    for (i, name) in names.iter().enumerate() {
        if table.contains_column(name) || names[..i].contains(name) {
            return Err(ScrubError::DuplicateColumn { column: name.to_string() });
        }
    }

    let validity: Vec<Option<bool>> = longitudes
        .iter()
        .zip(&latitudes)
        .map(|(lon, lat)| {
            let valid = match (lon, lat) {
                (Some(lon), Some(lat)) if in_range(*lon, *lat) => {
                    boundary.contains_point(*lon, *lat)
                }
                _ => false,
            };
            Some(valid)
        })
        .collect();

    let valid = validity.iter().filter(|v| **v == Some(true)).count();
    let invalid = validity.len() - valid;
    if invalid > 0 {
        tracing::warn!(invalid, "Rows fall outside the boundary or have bad coordinates");
    }
    tracing::info!(
        rows = validity.len(),
        valid,
        invalid,
        lat_col,
        lon_col,
        "Checked geographic integrity"
    );

    let mut checked = table.clone();
    checked.push_column(Column::boolean(columns.validity.as_str(), validity))?;
    checked.push_column(Column::numeric(columns.longitude.as_str(), longitudes))?;
    checked.push_column(Column::numeric(columns.latitude.as_str(), latitudes))?;
    Ok(checked)
}

fn in_range(lon: f64, lat: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Read a coordinate column as numbers. Text cells are parsed one by one;
/// cells that do not parse become missing.
fn coordinates(table: &Table, name: &str) -> Result<Vec<Option<f64>>> {
    let column = table.column(name)?;
    match column.data() {
        ColumnData::Numeric(values) => Ok(values.clone()),
        ColumnData::Text(values) => Ok(values
            .iter()
            .map(|v| v.as_deref().and_then(|s| s.trim().parse::<f64>().ok()))
            .collect()),
        other => Err(ScrubError::InvalidCoordinate {
            column: name.to_string(),
            reason: format!("expected numeric coordinates, found {} column", other.kind()),
        }),
    }
}
