//! Typed query parameters supplied by job-execution code

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared scalar type of a query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamType {
    String,
    Int64,
    Float64,
    Numeric,
    Bool,
    Date,
    Timestamp,
}

impl ParamType {
    /// Whether `value` is a valid literal for this type
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ParamType::String => true,
            ParamType::Int64 => value.parse::<i64>().is_ok(),
            ParamType::Float64 => value.parse::<f64>().is_ok(),
            ParamType::Numeric => value.parse::<f64>().is_ok_and(f64::is_finite),
            ParamType::Bool => {
                value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
            }
            ParamType::Date => is_date(value),
            ParamType::Timestamp => match value.get(..10) {
                Some(date) => {
                    let rest = &value[10..];
                    is_date(date)
                        && (rest.is_empty() || rest.starts_with(|c: char| c == ' ' || c == 'T'))
                }
                None => false,
            },
        }
    }
}

/// `YYYY-MM-DD` naming a real calendar day
fn is_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &value[range];
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    match (digits(0..4), digits(5..7), digits(8..10)) {
        (Some(year), Some(month @ 1..=12), Some(day)) => {
            (1..=days_in_month(year, month)).contains(&day)
        }
        _ => false,
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        _ => 31,
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STRING" => Ok(ParamType::String),
            "INT64" | "INTEGER" | "INT" => Ok(ParamType::Int64),
            "FLOAT64" | "FLOAT" => Ok(ParamType::Float64),
            "NUMERIC" => Ok(ParamType::Numeric),
            "BOOL" | "BOOLEAN" => Ok(ParamType::Bool),
            "DATE" => Ok(ParamType::Date),
            "TIMESTAMP" => Ok(ParamType::Timestamp),
            _ => Err(format!(
                "Unknown param type: '{}'. Supported types: STRING, INT64, FLOAT64, NUMERIC, BOOL, DATE, TIMESTAMP.",
                s
            )),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "STRING",
            ParamType::Int64 => "INT64",
            ParamType::Float64 => "FLOAT64",
            ParamType::Numeric => "NUMERIC",
            ParamType::Bool => "BOOL",
            ParamType::Date => "DATE",
            ParamType::Timestamp => "TIMESTAMP",
        };
        f.write_str(name)
    }
}

/// A named, typed parameter value ready to hand to a query engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParam")]
pub struct QueryParam {
    name: String,
    #[serde(rename = "type")]
    ty: ParamType,
    value: String,
}

impl QueryParam {
    /// Build a parameter, checking the value against its declared type.
    /// A leading `@` on `name` is dropped.
    pub fn new(name: impl AsRef<str>, ty: ParamType, value: impl Into<String>) -> Result<Self> {
        let name = name.as_ref().trim_start_matches('@').to_string();
        let value = value.into();
        if !ty.accepts(&value) {
            return Err(Error::InvalidParam { name, ty, value });
        }
        Ok(Self { name, ty, value })
    }

    /// A `STRING` parameter; always valid
    pub fn string(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().trim_start_matches('@').to_string(),
            ty: ParamType::String,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ParamType {
        self.ty
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Serialized form of [`QueryParam`], type-checked before it is accepted
#[derive(Deserialize)]
struct RawParam {
    name: String,
    #[serde(rename = "type")]
    ty: ParamType,
    value: String,
}

impl TryFrom<RawParam> for QueryParam {
    type Error = Error;

    fn try_from(raw: RawParam) -> Result<Self> {
        QueryParam::new(raw.name, raw.ty, raw.value)
    }
}
