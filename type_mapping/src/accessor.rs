//! Reader accessors
//!
//! A fixed table of typed read operations keyed by primitive type, with a
//! generic fallback for everything else. The reader layer resolves an
//! accessor once per column and invokes it on every row.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::MappingError;
use crate::types::{AppType, DbValue};

/// Typed read operation used to pull one column out of a result row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReaderAccessor {
    GetBoolean,
    GetByte,
    GetChar,
    GetDateTime,
    GetDecimal,
    GetDouble,
    GetFloat,
    GetGuid,
    GetInt16,
    GetInt32,
    GetInt64,
    GetString,
    /// Generic read parameterized by the requested type
    GetFieldValue(AppType),
}

impl ReaderAccessor {
    /// Select the accessor for a type, ignoring any nullable wrapper
    pub fn for_type(app_type: &AppType) -> Self {
        match app_type.strip_nullable() {
            AppType::Bool => ReaderAccessor::GetBoolean,
            AppType::U8 => ReaderAccessor::GetByte,
            AppType::Char => ReaderAccessor::GetChar,
            AppType::DateTime => ReaderAccessor::GetDateTime,
            AppType::Decimal => ReaderAccessor::GetDecimal,
            AppType::F64 => ReaderAccessor::GetDouble,
            AppType::F32 => ReaderAccessor::GetFloat,
            AppType::Uuid => ReaderAccessor::GetGuid,
            AppType::I16 => ReaderAccessor::GetInt16,
            AppType::I32 => ReaderAccessor::GetInt32,
            AppType::I64 => ReaderAccessor::GetInt64,
            AppType::String => ReaderAccessor::GetString,
            other => ReaderAccessor::GetFieldValue(other.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReaderAccessor::GetBoolean => "GetBoolean",
            ReaderAccessor::GetByte => "GetByte",
            ReaderAccessor::GetChar => "GetChar",
            ReaderAccessor::GetDateTime => "GetDateTime",
            ReaderAccessor::GetDecimal => "GetDecimal",
            ReaderAccessor::GetDouble => "GetDouble",
            ReaderAccessor::GetFloat => "GetFloat",
            ReaderAccessor::GetGuid => "GetGuid",
            ReaderAccessor::GetInt16 => "GetInt16",
            ReaderAccessor::GetInt32 => "GetInt32",
            ReaderAccessor::GetInt64 => "GetInt64",
            ReaderAccessor::GetString => "GetString",
            ReaderAccessor::GetFieldValue(_) => "GetFieldValue",
        }
    }

    /// Read one column. A database NULL yields `None`.
    pub fn read(&self, record: &dyn DataRecord, ordinal: usize) -> Result<Option<DbValue>, MappingError> {
        if record.is_null(ordinal)? {
            return Ok(None);
        }
        let value = match self {
            ReaderAccessor::GetBoolean => DbValue::Bool(record.get_bool(ordinal)?),
            ReaderAccessor::GetByte => DbValue::U8(record.get_u8(ordinal)?),
            ReaderAccessor::GetChar => DbValue::Char(record.get_char(ordinal)?),
            ReaderAccessor::GetDateTime => DbValue::DateTime(record.get_datetime(ordinal)?),
            ReaderAccessor::GetDecimal => DbValue::Decimal(record.get_decimal(ordinal)?),
            ReaderAccessor::GetDouble => DbValue::F64(record.get_f64(ordinal)?),
            ReaderAccessor::GetFloat => DbValue::F32(record.get_f32(ordinal)?),
            ReaderAccessor::GetGuid => DbValue::Uuid(record.get_uuid(ordinal)?),
            ReaderAccessor::GetInt16 => DbValue::I16(record.get_i16(ordinal)?),
            ReaderAccessor::GetInt32 => DbValue::I32(record.get_i32(ordinal)?),
            ReaderAccessor::GetInt64 => DbValue::I64(record.get_i64(ordinal)?),
            ReaderAccessor::GetString => DbValue::Text(record.get_string(ordinal)?),
            ReaderAccessor::GetFieldValue(app_type) => record.get_field_value(ordinal, app_type)?,
        };
        Ok(Some(value))
    }
}

/// Result-row cursor capability supplied by a driver
pub trait DataRecord {
    fn field_count(&self) -> usize;
    fn is_null(&self, ordinal: usize) -> Result<bool, MappingError>;
    fn get_bool(&self, ordinal: usize) -> Result<bool, MappingError>;
    fn get_u8(&self, ordinal: usize) -> Result<u8, MappingError>;
    fn get_char(&self, ordinal: usize) -> Result<char, MappingError>;
    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime, MappingError>;
    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, MappingError>;
    fn get_f64(&self, ordinal: usize) -> Result<f64, MappingError>;
    fn get_f32(&self, ordinal: usize) -> Result<f32, MappingError>;
    fn get_uuid(&self, ordinal: usize) -> Result<Uuid, MappingError>;
    fn get_i16(&self, ordinal: usize) -> Result<i16, MappingError>;
    fn get_i32(&self, ordinal: usize) -> Result<i32, MappingError>;
    fn get_i64(&self, ordinal: usize) -> Result<i64, MappingError>;
    fn get_string(&self, ordinal: usize) -> Result<String, MappingError>;
    fn get_field_value(&self, ordinal: usize, app_type: &AppType) -> Result<DbValue, MappingError>;
}

/// In-memory row of already materialized values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    values: Vec<Option<DbValue>>,
}

impl ValueRow {
    pub fn new(values: Vec<Option<DbValue>>) -> Self {
        Self { values }
    }

    fn value(&self, ordinal: usize, expected: &str) -> Result<&DbValue, MappingError> {
        match self.values.get(ordinal) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(MappingError::invalid_cast(ordinal, expected, "value is NULL")),
            None => Err(MappingError::invalid_cast(
                ordinal,
                expected,
                format!("row has {} columns", self.values.len()),
            )),
        }
    }
}

// Strict typed getter: the stored variant must match exactly
macro_rules! typed_getter {
    ($name:ident, $ty:ty, $variant:ident) => {
        fn $name(&self, ordinal: usize) -> Result<$ty, MappingError> {
            match self.value(ordinal, stringify!($ty))? {
                DbValue::$variant(v) => Ok(v.clone()),
                other => Err(MappingError::invalid_cast(
                    ordinal,
                    stringify!($ty),
                    format!("column holds a {} value", other.kind_name()),
                )),
            }
        }
    };
}

impl DataRecord for ValueRow {
    fn field_count(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, MappingError> {
        self.values
            .get(ordinal)
            .map(Option::is_none)
            .ok_or_else(|| MappingError::invalid_cast(ordinal, "any", format!("row has {} columns", self.values.len())))
    }

    typed_getter!(get_bool, bool, Bool);
    typed_getter!(get_u8, u8, U8);
    typed_getter!(get_char, char, Char);
    typed_getter!(get_datetime, NaiveDateTime, DateTime);
    typed_getter!(get_decimal, Decimal, Decimal);
    typed_getter!(get_f64, f64, F64);
    typed_getter!(get_f32, f32, F32);
    typed_getter!(get_uuid, Uuid, Uuid);
    typed_getter!(get_i16, i16, I16);
    typed_getter!(get_i32, i32, I32);
    typed_getter!(get_i64, i64, I64);
    typed_getter!(get_string, String, Text);

    fn get_field_value(&self, ordinal: usize, app_type: &AppType) -> Result<DbValue, MappingError> {
        let wanted = app_type.strip_nullable();
        let value = self.value(ordinal, &wanted.to_string())?;
        let matches = match (wanted, value) {
            // Custom types without a converter travel as JSON documents
            (AppType::Custom(_), DbValue::Json(_)) => true,
            (wanted, value) => value.app_type() == *wanted,
        };
        if matches {
            Ok(value.clone())
        } else {
            Err(MappingError::invalid_cast(
                ordinal,
                wanted,
                format!("column holds a {} value", value.kind_name()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_table() {
        assert_eq!(ReaderAccessor::for_type(&AppType::I32), ReaderAccessor::GetInt32);
        assert_eq!(ReaderAccessor::for_type(&AppType::I32.nullable()), ReaderAccessor::GetInt32);
        assert_eq!(ReaderAccessor::for_type(&AppType::String), ReaderAccessor::GetString);
        assert_eq!(ReaderAccessor::for_type(&AppType::F32), ReaderAccessor::GetFloat);
        assert_eq!(
            ReaderAccessor::for_type(&AppType::Bytes),
            ReaderAccessor::GetFieldValue(AppType::Bytes)
        );
        assert_eq!(
            ReaderAccessor::for_type(&AppType::Custom("Point".into()).nullable()),
            ReaderAccessor::GetFieldValue(AppType::Custom("Point".into()))
        );
    }

    #[test]
    fn test_read_from_value_row() {
        let row = ValueRow::new(vec![
            Some(DbValue::I32(7)),
            None,
            Some(DbValue::Json(json!({"x": 1}))),
        ]);
        assert_eq!(row.field_count(), 3);
        assert_eq!(ReaderAccessor::GetInt32.read(&row, 0).unwrap(), Some(DbValue::I32(7)));
        assert_eq!(ReaderAccessor::GetString.read(&row, 1).unwrap(), None);

        let point = ReaderAccessor::for_type(&AppType::Custom("Point".into()));
        assert_eq!(point.read(&row, 2).unwrap(), Some(DbValue::Json(json!({"x": 1}))));
    }

    #[test]
    fn test_strict_getters_reject_other_kinds() {
        let row = ValueRow::new(vec![Some(DbValue::I32(7))]);
        assert!(matches!(
            ReaderAccessor::GetInt64.read(&row, 0),
            Err(MappingError::InvalidCast { ordinal: 0, .. })
        ));
        assert!(row.is_null(5).is_err());
    }
}
