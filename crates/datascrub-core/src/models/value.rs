use crate::error::{Result, ScrubError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Semantic type of a column, fixed when the column is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    Numeric,
    Text,
    Date,
    Boolean,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Numeric => "numeric",
            SemanticType::Text => "text",
            SemanticType::Date => "date",
            SemanticType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A single non-missing cell value.
///
/// Missing cells are represented as `None` wherever a `Value` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Numeric(f64),
    Text(String),
    Date(NaiveDateTime),
    Boolean(bool),
}

impl Value {
    pub fn kind(&self) -> SemanticType {
        match self {
            Value::Numeric(_) => SemanticType::Numeric,
            Value::Text(_) => SemanticType::Text,
            Value::Date(_) => SemanticType::Date,
            Value::Boolean(_) => SemanticType::Boolean,
        }
    }

    /// Coerce this value to the semantic type of `column`.
    ///
    /// Text columns accept any value. Numeric columns accept numbers,
    /// booleans (1/0) and numeric text. Boolean columns accept booleans,
    /// 0/1 and boolean text. Date columns accept dates and ISO text.
    pub fn coerce_to(&self, target: SemanticType, column: &str) -> Result<Value> {
        let coerced = match (target, self) {
            (SemanticType::Text, value) => Some(Value::Text(value.to_string())),
            (SemanticType::Numeric, Value::Numeric(n)) => Some(Value::Numeric(*n)),
            (SemanticType::Numeric, Value::Boolean(b)) => {
                Some(Value::Numeric(if *b { 1.0 } else { 0.0 }))
            }
            (SemanticType::Numeric, Value::Text(s)) => {
                s.trim().parse::<f64>().ok().map(Value::Numeric)
            }
            (SemanticType::Boolean, Value::Boolean(b)) => Some(Value::Boolean(*b)),
            (SemanticType::Boolean, Value::Numeric(n)) if *n == 0.0 => Some(Value::Boolean(false)),
            (SemanticType::Boolean, Value::Numeric(n)) if *n == 1.0 => Some(Value::Boolean(true)),
            (SemanticType::Boolean, Value::Text(s)) => parse_bool(s).map(Value::Boolean),
            (SemanticType::Date, Value::Date(d)) => Some(Value::Date(*d)),
            (SemanticType::Date, Value::Text(s)) => parse_iso_datetime(s).map(Value::Date),
            _ => None,
        };

        coerced.ok_or_else(|| ScrubError::TypeMismatch {
            column: column.to_string(),
            expected: target,
            found: format!("{} '{}'", self.kind(), self),
        })
    }

    /// Natural ordering within one semantic type.
    ///
    /// Values of different types are ordered by type so that the ordering
    /// stays total.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Numeric(a), Value::Numeric(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => type_rank(self).cmp(&type_rank(other)),
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Boolean(_) => 0,
        Value::Numeric(_) => 1,
        Value::Date(_) => 2,
        Value::Text(_) => 3,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&format_datetime(d)),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Numeric(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

/// Parse boolean text: true/false, yes/no, 1/0 (case-insensitive)
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse an ISO date (`%Y-%m-%d`) or date-time (`%Y-%m-%d %H:%M:%S`, `T` separator allowed)
pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Render a date-time canonically: date only at midnight, otherwise date and time
pub fn format_datetime(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
