//! Date and time argument normalization.
//!
//! Resource methods run caller-supplied dates and times through these
//! functions before building a path, so every value on the wire is either
//! `YYYY-MM-DD` or `HH:MM`.
//!
//! `format_date` lets an absent value through as `None` (callers use it to
//! omit a parameter) while `format_time` rejects absence. The two are kept
//! asymmetric on purpose.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde_json::Value;

use crate::error::ApiError;

const DATE_SHAPE: &str = "dddd-dd-dd";
const TIME_SHAPE: &str = "dd:dd";

/// A date argument as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    Absent,
    Date(NaiveDate),
    Text(String),
    /// A dynamically typed value of a kind that can never be a date.
    Unsupported(&'static str),
}

/// A time-of-day argument as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeArg {
    Absent,
    Time(NaiveTime),
    Text(String),
    Unsupported(&'static str),
}

/// Normalize `value` into `YYYY-MM-DD`.
///
/// `"today"` and `"yesterday"` resolve against the local calendar date.
/// Strings already shaped like `YYYY-MM-DD` pass through unchanged.
pub fn format_date(value: impl Into<DateArg>) -> Result<Option<String>, ApiError> {
    format_date_from(value.into(), Local::now().date_naive())
}

/// Normalize `value` into zero-padded 24-hour `HH:MM`.
pub fn format_time(value: impl Into<TimeArg>) -> Result<String, ApiError> {
    match value.into() {
        TimeArg::Time(time) => Ok(time.format("%H:%M").to_string()),
        TimeArg::Text(text) if has_shape(&text, TIME_SHAPE) => Ok(text),
        other => Err(ApiError::InvalidTime(format!(
            "expected a time or an HH:MM string, received {}",
            other.kind()
        ))),
    }
}

/// Fail with `InvalidArgument` unless a start date was given.
pub fn require_start_date(start_date: Option<&str>) -> Result<&str, ApiError> {
    require("start_date", start_date)
}

/// Fail with `InvalidArgument` unless an end date was given.
pub fn require_end_date(end_date: Option<&str>) -> Result<&str, ApiError> {
    require("end_date", end_date)
}

fn require<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::InvalidArgument(format!("{name} is required"))),
    }
}

fn format_date_from(value: DateArg, today: NaiveDate) -> Result<Option<String>, ApiError> {
    let date = match value {
        DateArg::Absent => return Ok(None),
        DateArg::Date(date) => date,
        DateArg::Text(text) if text == "today" => today,
        DateArg::Text(text) if text == "yesterday" => today
            .pred_opt()
            .ok_or_else(|| ApiError::InvalidDate(format!("no day before {today}")))?,
        DateArg::Text(text) if has_shape(&text, DATE_SHAPE) => return Ok(Some(text)),
        DateArg::Text(_) => return Err(invalid_date("string")),
        DateArg::Unsupported(kind) => return Err(invalid_date(kind)),
    };
    Ok(Some(date.format("%Y-%m-%d").to_string()))
}

fn invalid_date(kind: &str) -> ApiError {
    ApiError::InvalidDate(format!(
        "expected a date, \"today\", \"yesterday\" or a YYYY-MM-DD string, received {kind}"
    ))
}

/// Match `value` against `pattern`, where `d` stands for one ASCII digit.
fn has_shape(value: &str, pattern: &str) -> bool {
    value.len() == pattern.len()
        && value.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TimeArg {
    fn kind(&self) -> &'static str {
        match self {
            TimeArg::Absent => "nothing",
            TimeArg::Time(_) => "time",
            TimeArg::Text(_) => "string",
            TimeArg::Unsupported(kind) => kind,
        }
    }
}

impl From<NaiveDate> for DateArg {
    fn from(date: NaiveDate) -> Self {
        DateArg::Date(date)
    }
}

impl From<NaiveDateTime> for DateArg {
    fn from(datetime: NaiveDateTime) -> Self {
        DateArg::Date(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateArg {
    fn from(datetime: DateTime<Tz>) -> Self {
        DateArg::Date(datetime.date_naive())
    }
}

impl From<&str> for DateArg {
    fn from(text: &str) -> Self {
        DateArg::Text(text.to_string())
    }
}

impl From<String> for DateArg {
    fn from(text: String) -> Self {
        DateArg::Text(text)
    }
}

impl From<&String> for DateArg {
    fn from(text: &String) -> Self {
        DateArg::Text(text.clone())
    }
}

impl<T: Into<DateArg>> From<Option<T>> for DateArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(DateArg::Absent, Into::into)
    }
}

impl From<Value> for DateArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DateArg::Absent,
            Value::String(text) => DateArg::Text(text),
            other => DateArg::Unsupported(json_kind(&other)),
        }
    }
}

impl From<NaiveTime> for TimeArg {
    fn from(time: NaiveTime) -> Self {
        TimeArg::Time(time)
    }
}

impl From<NaiveDateTime> for TimeArg {
    fn from(datetime: NaiveDateTime) -> Self {
        TimeArg::Time(datetime.time())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeArg {
    fn from(datetime: DateTime<Tz>) -> Self {
        TimeArg::Time(datetime.time())
    }
}

impl From<&str> for TimeArg {
    fn from(text: &str) -> Self {
        TimeArg::Text(text.to_string())
    }
}

impl From<String> for TimeArg {
    fn from(text: String) -> Self {
        TimeArg::Text(text)
    }
}

impl From<&String> for TimeArg {
    fn from(text: &String) -> Self {
        TimeArg::Text(text.clone())
    }
}

impl<T: Into<TimeArg>> From<Option<T>> for TimeArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(TimeArg::Absent, Into::into)
    }
}

impl From<Value> for TimeArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TimeArg::Absent,
            Value::String(text) => TimeArg::Text(text),
            other => TimeArg::Unsupported(json_kind(&other)),
        }
    }
}
