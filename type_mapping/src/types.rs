//! Type mapping definitions
//!
//! This module provides the application-level type tags and the
//! storage-agnostic value domain the mappings operate on.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-level type of a mapped value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppType {
    Bool,
    U8,
    Char,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Uuid,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Json,
    /// A named enumeration, stored through a converter
    Enum(String),
    /// Any other application type, identified by name
    Custom(String),
    /// Nullable wrapper around another type
    Nullable(Box<AppType>),
}

impl AppType {
    /// Wrap this type as nullable. Already nullable types are returned unchanged.
    pub fn nullable(self) -> Self {
        match self {
            AppType::Nullable(_) => self,
            other => AppType::Nullable(Box::new(other)),
        }
    }

    /// The underlying type with any nullable wrapper removed
    pub fn strip_nullable(&self) -> &AppType {
        match self {
            AppType::Nullable(inner) => inner.strip_nullable(),
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, AppType::Nullable(_))
    }

    /// Map a Rust type name to an application type
    pub fn from_rust_type(rust_type: &str) -> Self {
        // Normalize type string by removing all whitespace for consistent matching
        let normalized = rust_type.replace(' ', "");
        if let Some(inner) = normalized
            .strip_prefix("Option<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return Self::from_rust_type(inner).nullable();
        }

        match normalized.as_str() {
            "bool" => AppType::Bool,
            "u8" => AppType::U8,
            "char" => AppType::Char,
            "i16" => AppType::I16,
            "i32" => AppType::I32,
            "i64" => AppType::I64,
            "f32" => AppType::F32,
            "f64" => AppType::F64,
            "Decimal" | "rust_decimal::Decimal" => AppType::Decimal,
            "String" | "&str" => AppType::String,
            "Vec<u8>" | "&[u8]" => AppType::Bytes,
            "Uuid" | "uuid::Uuid" => AppType::Uuid,
            "NaiveDate" | "chrono::NaiveDate" => AppType::Date,
            "NaiveTime" | "chrono::NaiveTime" => AppType::Time,
            "NaiveDateTime" | "chrono::NaiveDateTime" => AppType::DateTime,
            "DateTime<FixedOffset>" | "chrono::DateTime<chrono::FixedOffset>" => {
                AppType::DateTimeOffset
            }
            "Value" | "serde_json::Value" => AppType::Json,
            other => AppType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppType::Bool => f.write_str("bool"),
            AppType::U8 => f.write_str("u8"),
            AppType::Char => f.write_str("char"),
            AppType::I16 => f.write_str("i16"),
            AppType::I32 => f.write_str("i32"),
            AppType::I64 => f.write_str("i64"),
            AppType::F32 => f.write_str("f32"),
            AppType::F64 => f.write_str("f64"),
            AppType::Decimal => f.write_str("Decimal"),
            AppType::String => f.write_str("String"),
            AppType::Bytes => f.write_str("Vec<u8>"),
            AppType::Uuid => f.write_str("Uuid"),
            AppType::Date => f.write_str("NaiveDate"),
            AppType::Time => f.write_str("NaiveTime"),
            AppType::DateTime => f.write_str("NaiveDateTime"),
            AppType::DateTimeOffset => f.write_str("DateTime<FixedOffset>"),
            AppType::Json => f.write_str("serde_json::Value"),
            AppType::Enum(name) | AppType::Custom(name) => f.write_str(name),
            AppType::Nullable(inner) => write!(f, "Option<{inner}>"),
        }
    }
}

/// A member of a named enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    pub type_name: String,
    pub name: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            value,
        }
    }
}

/// A non-null value in the application or provider domain.
///
/// Absence is always expressed as `Option<DbValue>`; there is no null variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DbValue {
    Bool(bool),
    U8(u8),
    Char(char),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Json(serde_json::Value),
    Enum(EnumValue),
}

impl DbValue {
    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            DbValue::Bool(_) => "bool",
            DbValue::U8(_) => "u8",
            DbValue::Char(_) => "char",
            DbValue::I16(_) => "i16",
            DbValue::I32(_) => "i32",
            DbValue::I64(_) => "i64",
            DbValue::F32(_) => "f32",
            DbValue::F64(_) => "f64",
            DbValue::Decimal(_) => "decimal",
            DbValue::Text(_) => "text",
            DbValue::Bytes(_) => "bytes",
            DbValue::Uuid(_) => "uuid",
            DbValue::Date(_) => "date",
            DbValue::Time(_) => "time",
            DbValue::DateTime(_) => "datetime",
            DbValue::DateTimeOffset(_) => "datetimeoffset",
            DbValue::Json(_) => "json",
            DbValue::Enum(_) => "enum",
        }
    }

    /// The application type this value naturally belongs to
    pub fn app_type(&self) -> AppType {
        match self {
            DbValue::Bool(_) => AppType::Bool,
            DbValue::U8(_) => AppType::U8,
            DbValue::Char(_) => AppType::Char,
            DbValue::I16(_) => AppType::I16,
            DbValue::I32(_) => AppType::I32,
            DbValue::I64(_) => AppType::I64,
            DbValue::F32(_) => AppType::F32,
            DbValue::F64(_) => AppType::F64,
            DbValue::Decimal(_) => AppType::Decimal,
            DbValue::Text(_) => AppType::String,
            DbValue::Bytes(_) => AppType::Bytes,
            DbValue::Uuid(_) => AppType::Uuid,
            DbValue::Date(_) => AppType::Date,
            DbValue::Time(_) => AppType::Time,
            DbValue::DateTime(_) => AppType::DateTime,
            DbValue::DateTimeOffset(_) => AppType::DateTimeOffset,
            DbValue::Json(_) => AppType::Json,
            DbValue::Enum(e) => AppType::Enum(e.type_name.clone()),
        }
    }

    /// Length of string-like or binary values: characters for text, bytes for binary
    pub fn length(&self) -> Option<usize> {
        match self {
            DbValue::Text(s) => Some(s.chars().count()),
            DbValue::Bytes(b) => Some(b.len()),
            DbValue::Char(_) => Some(1),
            _ => None,
        }
    }

    /// Widen any integer variant to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DbValue::U8(v) => Some(i64::from(*v)),
            DbValue::I16(v) => Some(i64::from(*v)),
            DbValue::I32(v) => Some(i64::from(*v)),
            DbValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let DbValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let DbValue::Bytes(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Invariant, locale-independent rendering used by the default literal template
impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbValue::Bool(v) => write!(f, "{v}"),
            DbValue::U8(v) => write!(f, "{v}"),
            DbValue::Char(v) => write!(f, "{v}"),
            DbValue::I16(v) => write!(f, "{v}"),
            DbValue::I32(v) => write!(f, "{v}"),
            DbValue::I64(v) => write!(f, "{v}"),
            // Debug formatting is the shortest round-trip representation
            DbValue::F32(v) => write!(f, "{v:?}"),
            DbValue::F64(v) => write!(f, "{v:?}"),
            DbValue::Decimal(v) => write!(f, "{v}"),
            DbValue::Text(v) => f.write_str(v),
            DbValue::Bytes(v) => f.write_str(&crate::sql::hex_upper(v)),
            DbValue::Uuid(v) => write!(f, "{}", v.hyphenated()),
            DbValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            DbValue::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            DbValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            DbValue::DateTimeOffset(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f%:z")),
            DbValue::Json(v) => write!(f, "{v}"),
            DbValue::Enum(v) => write!(f, "{}", v.value),
        }
    }
}

// Zeroes of either sign compare equal and must hash alike; all NaNs share one pattern
fn canonical_f64_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl Hash for DbValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DbValue::Bool(v) => v.hash(state),
            DbValue::U8(v) => v.hash(state),
            DbValue::Char(v) => v.hash(state),
            DbValue::I16(v) => v.hash(state),
            DbValue::I32(v) => v.hash(state),
            DbValue::I64(v) => v.hash(state),
            DbValue::F32(v) => canonical_f64_bits(f64::from(*v)).hash(state),
            DbValue::F64(v) => canonical_f64_bits(*v).hash(state),
            DbValue::Decimal(v) => v.hash(state),
            DbValue::Text(v) => v.hash(state),
            DbValue::Bytes(v) => v.hash(state),
            DbValue::Uuid(v) => v.hash(state),
            DbValue::Date(v) => v.hash(state),
            DbValue::Time(v) => v.hash(state),
            DbValue::DateTime(v) => v.hash(state),
            DbValue::DateTimeOffset(v) => v.hash(state),
            DbValue::Json(v) => v.to_string().hash(state),
            DbValue::Enum(v) => v.hash(state),
        }
    }
}

/// Convert basic Rust types to DbValue
impl From<bool> for DbValue {
    fn from(val: bool) -> Self {
        DbValue::Bool(val)
    }
}

impl From<u8> for DbValue {
    fn from(val: u8) -> Self {
        DbValue::U8(val)
    }
}

impl From<char> for DbValue {
    fn from(val: char) -> Self {
        DbValue::Char(val)
    }
}

impl From<i16> for DbValue {
    fn from(val: i16) -> Self {
        DbValue::I16(val)
    }
}

impl From<i32> for DbValue {
    fn from(val: i32) -> Self {
        DbValue::I32(val)
    }
}

impl From<i64> for DbValue {
    fn from(val: i64) -> Self {
        DbValue::I64(val)
    }
}

impl From<f32> for DbValue {
    fn from(val: f32) -> Self {
        DbValue::F32(val)
    }
}

impl From<f64> for DbValue {
    fn from(val: f64) -> Self {
        DbValue::F64(val)
    }
}

impl From<Decimal> for DbValue {
    fn from(val: Decimal) -> Self {
        DbValue::Decimal(val)
    }
}

impl From<String> for DbValue {
    fn from(val: String) -> Self {
        DbValue::Text(val)
    }
}

impl From<&str> for DbValue {
    fn from(val: &str) -> Self {
        DbValue::Text(val.to_string())
    }
}

impl From<Vec<u8>> for DbValue {
    fn from(val: Vec<u8>) -> Self {
        DbValue::Bytes(val)
    }
}

impl From<&[u8]> for DbValue {
    fn from(val: &[u8]) -> Self {
        DbValue::Bytes(val.to_vec())
    }
}

impl From<Uuid> for DbValue {
    fn from(val: Uuid) -> Self {
        DbValue::Uuid(val)
    }
}

impl From<NaiveDate> for DbValue {
    fn from(val: NaiveDate) -> Self {
        DbValue::Date(val)
    }
}

impl From<NaiveTime> for DbValue {
    fn from(val: NaiveTime) -> Self {
        DbValue::Time(val)
    }
}

impl From<NaiveDateTime> for DbValue {
    fn from(val: NaiveDateTime) -> Self {
        DbValue::DateTime(val)
    }
}

impl From<DateTime<FixedOffset>> for DbValue {
    fn from(val: DateTime<FixedOffset>) -> Self {
        DbValue::DateTimeOffset(val)
    }
}

impl From<serde_json::Value> for DbValue {
    fn from(val: serde_json::Value) -> Self {
        DbValue::Json(val)
    }
}

impl From<EnumValue> for DbValue {
    fn from(val: EnumValue) -> Self {
        DbValue::Enum(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rust_type_handles_options_and_paths() {
        assert_eq!(AppType::from_rust_type("i32"), AppType::I32);
        assert_eq!(
            AppType::from_rust_type("Option < chrono::NaiveDate >"),
            AppType::Date.nullable()
        );
        assert_eq!(AppType::from_rust_type("uuid::Uuid"), AppType::Uuid);
        assert_eq!(
            AppType::from_rust_type("Point"),
            AppType::Custom("Point".to_string())
        );
    }

    #[test]
    fn test_strip_nullable() {
        let ty = AppType::I64.nullable().nullable();
        assert_eq!(ty.strip_nullable(), &AppType::I64);
        assert_eq!(ty.to_string(), "Option<i64>");
    }

    #[test]
    fn test_invariant_display() {
        assert_eq!(DbValue::F64(1.5).to_string(), "1.5");
        assert_eq!(DbValue::F64(2.0).to_string(), "2.0");
        assert_eq!(DbValue::Bytes(vec![0x0A, 0xFF]).to_string(), "0AFF");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(DbValue::Date(date).to_string(), "2024-02-29");
        assert_eq!(DbValue::from(EnumValue::new("Color", "Red", 2)).to_string(), "2");
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert_eq!(DbValue::from("héllo").length(), Some(5));
        assert_eq!(DbValue::Bytes(vec![1, 2, 3]).length(), Some(3));
        assert_eq!(DbValue::I32(7).length(), None);
    }
}
