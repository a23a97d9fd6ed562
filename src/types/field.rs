//! Field value type
//!
//! A `FieldValue` is what a column extracts from a record before it is turned
//! into text. Its `Display` implementation is the default field-to-text
//! conversion.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// A single raw field value extracted from a record
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Absent value, rendered as an empty field
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
    /// Instant in time, rendered as ISO-8601 with millisecond precision
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Returns true for the absent value
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Unsigned(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write_float(*value, f),
            FieldValue::Decimal(value) => write!(f, "{}", value),
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::DateTime(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

// Shortest round-trip digits. Plain notation within [1e-6, 1e21), exponent
// notation with an explicit sign outside it (`1e+21`, `1e-7`).
fn write_float(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else if value == 0.0 {
        f.write_str("0")
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let scientific = format!("{:e}", value);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, exponent)
            }
            _ => f.write_str(&scientific),
        }
    } else {
        write!(f, "{}", value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        FieldValue::Text(value.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for FieldValue {
            fn from(value: $ty) -> Self {
                FieldValue::Integer(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for FieldValue {
            fn from(value: $ty) -> Self {
                FieldValue::Unsigned(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FieldValue {
    fn from(value: DateTime<Tz>) -> Self {
        FieldValue::DateTime(value.with_timezone(&Utc))
    }
}

/// A calendar date is taken as midnight UTC of that day
impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::DateTime(value.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// JSON scalars map onto the matching variant; arrays and objects are kept
/// as their compact JSON text.
impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Bool(flag),
            Value::Number(number) => {
                if let Some(unsigned) = number.as_u64() {
                    FieldValue::Unsigned(unsigned)
                } else if let Some(signed) = number.as_i64() {
                    FieldValue::Integer(signed)
                } else {
                    FieldValue::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => FieldValue::Text(text),
            composite @ (Value::Array(_) | Value::Object(_)) => {
                FieldValue::Text(composite.to_string())
            }
        }
    }
}
