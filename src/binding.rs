//! PostgreSQL driver bridge
//!
//! Turns the driver-neutral [`DbParameter`] / [`RelationalCommand`] values
//! produced by mappings into bound `sqlx` queries, and exposes a `PgRow` as a
//! [`DataRecord`] so mappings can read results back.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Postgres, Row, ValueRef};
use uuid::Uuid;

use type_mapping::{AppType, DataRecord, DbParameter, DbValue, MappingError, RelationalCommand, WireType};

use crate::trace_log;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

// Same narrowing rules as the JSON parameter binder: integers that fit go as i32
fn bind_value<'q>(query: PgQuery<'q>, value: &DbValue) -> PgQuery<'q> {
    match value {
        DbValue::Bool(v) => query.bind(*v),
        // Postgres has no single-byte integer
        DbValue::U8(v) => query.bind(i16::from(*v)),
        DbValue::Char(v) => query.bind(v.to_string()),
        DbValue::I16(v) => query.bind(*v),
        DbValue::I32(v) => query.bind(*v),
        DbValue::I64(v) => query.bind(*v),
        DbValue::F32(v) => query.bind(*v),
        DbValue::F64(v) => query.bind(*v),
        DbValue::Decimal(v) => query.bind(*v),
        DbValue::Text(v) => query.bind(v.clone()),
        DbValue::Bytes(v) => query.bind(v.clone()),
        DbValue::Uuid(v) => query.bind(*v),
        DbValue::Date(v) => query.bind(*v),
        DbValue::Time(v) => query.bind(*v),
        DbValue::DateTime(v) => query.bind(*v),
        DbValue::DateTimeOffset(v) => query.bind(v.with_timezone(&Utc)),
        DbValue::Json(v) => query.bind(Json(v.clone())),
        DbValue::Enum(member) => match i32::try_from(member.value) {
            Ok(small) => query.bind(small),
            Err(_) => query.bind(member.value),
        },
    }
}

/// Bind one parameter. Absent values become a NULL typed after the wire type.
pub fn bind_parameter<'q>(query: PgQuery<'q>, parameter: &DbParameter) -> PgQuery<'q> {
    match &parameter.value {
        Some(value) => bind_value(query, value),
        None => bind_null(query, parameter.wire_type),
    }
}

fn bind_null(query: PgQuery<'_>, wire_type: Option<WireType>) -> PgQuery<'_> {
    match wire_type {
        Some(WireType::Boolean) => query.bind(Option::<bool>::None),
        Some(WireType::Byte | WireType::Int16) => query.bind(Option::<i16>::None),
        Some(WireType::Int32) => query.bind(Option::<i32>::None),
        Some(WireType::Int64) => query.bind(Option::<i64>::None),
        Some(WireType::Single) => query.bind(Option::<f32>::None),
        Some(WireType::Double) => query.bind(Option::<f64>::None),
        Some(WireType::Decimal) => query.bind(Option::<Decimal>::None),
        Some(WireType::Binary) => query.bind(Option::<Vec<u8>>::None),
        Some(WireType::Guid) => query.bind(Option::<Uuid>::None),
        Some(WireType::Date) => query.bind(Option::<NaiveDate>::None),
        Some(WireType::Time) => query.bind(Option::<NaiveTime>::None),
        Some(WireType::DateTime | WireType::DateTime2) => query.bind(Option::<NaiveDateTime>::None),
        Some(WireType::DateTimeOffset) => query.bind(Option::<DateTime<Utc>>::None),
        Some(WireType::Json) => query.bind(Option::<Json<serde_json::Value>>::None),
        Some(
            WireType::AnsiString
            | WireType::AnsiStringFixedLength
            | WireType::String
            | WireType::StringFixedLength
            | WireType::Object,
        )
        | None => query.bind(Option::<String>::None),
    }
}

/// Prepare a query for a command with all of its parameters bound in order
pub fn build_query(command: &RelationalCommand) -> PgQuery<'_> {
    trace_log!("Binding {} parameters for: {}", command.parameters().len(), command.sql());
    command
        .parameters()
        .iter()
        .fold(sqlx::query(command.sql()), bind_parameter)
}

/// A `PgRow` read through the mapping layer's accessors
pub struct PgRecord<'r>(pub &'r PgRow);

impl PgRecord<'_> {
    fn get<T>(&self, ordinal: usize, expected: &str) -> Result<T, MappingError>
    where
        T: for<'a> sqlx::Decode<'a, Postgres> + sqlx::Type<Postgres>,
    {
        self.0
            .try_get::<T, _>(ordinal)
            .map_err(|e| MappingError::invalid_cast(ordinal, expected, e.to_string()))
    }
}

impl DataRecord for PgRecord<'_> {
    fn field_count(&self) -> usize {
        self.0.len()
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, MappingError> {
        self.0
            .try_get_raw(ordinal)
            .map(|value| value.is_null())
            .map_err(|e| MappingError::invalid_cast(ordinal, "any", e.to_string()))
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool, MappingError> {
        self.get(ordinal, "bool")
    }

    fn get_u8(&self, ordinal: usize) -> Result<u8, MappingError> {
        let wide: i16 = self.get(ordinal, "u8")?;
        u8::try_from(wide).map_err(|e| MappingError::invalid_cast(ordinal, "u8", e.to_string()))
    }

    fn get_char(&self, ordinal: usize) -> Result<char, MappingError> {
        let text: String = self.get(ordinal, "char")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(MappingError::invalid_cast(
                ordinal,
                "char",
                format!("expected one character, found {:?}", text),
            )),
        }
    }

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime, MappingError> {
        self.get(ordinal, "NaiveDateTime")
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, MappingError> {
        self.get(ordinal, "Decimal")
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64, MappingError> {
        self.get(ordinal, "f64")
    }

    fn get_f32(&self, ordinal: usize) -> Result<f32, MappingError> {
        self.get(ordinal, "f32")
    }

    fn get_uuid(&self, ordinal: usize) -> Result<Uuid, MappingError> {
        self.get(ordinal, "Uuid")
    }

    fn get_i16(&self, ordinal: usize) -> Result<i16, MappingError> {
        self.get(ordinal, "i16")
    }

    fn get_i32(&self, ordinal: usize) -> Result<i32, MappingError> {
        self.get(ordinal, "i32")
    }

    fn get_i64(&self, ordinal: usize) -> Result<i64, MappingError> {
        self.get(ordinal, "i64")
    }

    fn get_string(&self, ordinal: usize) -> Result<String, MappingError> {
        self.get(ordinal, "String")
    }

    fn get_field_value(&self, ordinal: usize, app_type: &AppType) -> Result<DbValue, MappingError> {
        let value = match app_type.strip_nullable() {
            AppType::Bytes => DbValue::Bytes(self.get(ordinal, "bytes")?),
            AppType::Date => DbValue::Date(self.get(ordinal, "NaiveDate")?),
            AppType::Time => DbValue::Time(self.get(ordinal, "NaiveTime")?),
            AppType::DateTimeOffset => {
                let utc: DateTime<Utc> = self.get(ordinal, "DateTime")?;
                DbValue::DateTimeOffset(utc.fixed_offset())
            }
            AppType::Json | AppType::Custom(_) => {
                let Json(doc) = self.get::<Json<serde_json::Value>>(ordinal, "json")?;
                DbValue::Json(doc)
            }
            other => {
                return Err(MappingError::invalid_cast(
                    ordinal,
                    other,
                    "no generic reader for this type; map it through a converter",
                ))
            }
        };
        Ok(value)
    }
}
