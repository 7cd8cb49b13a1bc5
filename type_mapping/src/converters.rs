//! Built-in value converters for common storage strategies

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::converter::{MappingHints, ValueConverter};
use crate::errors::MappingError;
use crate::types::{AppType, DbValue, EnumValue};

const DATETIME_STRING_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Produce an integer value of the requested provider type
fn integer_as(provider_type: &AppType, value: i64) -> Result<DbValue, MappingError> {
    let out_of_range = || MappingError::conversion("i64", provider_type, format!("{value} is out of range"));
    match provider_type.strip_nullable() {
        AppType::U8 => u8::try_from(value).map(DbValue::U8).map_err(|_| out_of_range()),
        AppType::I16 => i16::try_from(value).map(DbValue::I16).map_err(|_| out_of_range()),
        AppType::I32 => i32::try_from(value).map(DbValue::I32).map_err(|_| out_of_range()),
        AppType::I64 => Ok(DbValue::I64(value)),
        other => Err(MappingError::conversion(
            "i64",
            other,
            "provider type is not an integer type",
        )),
    }
}

fn expect_integer(value: &DbValue, target: &AppType) -> Result<i64, MappingError> {
    value
        .as_i64()
        .ok_or_else(|| MappingError::conversion(value.kind_name(), target, "expected an integer value"))
}

fn expect_text<'a>(value: &'a DbValue, target: &AppType) -> Result<&'a str, MappingError> {
    value
        .as_text()
        .ok_or_else(|| MappingError::conversion(value.kind_name(), target, "expected a text value"))
}

/// Stores enum members by their numeric value
#[derive(Debug, Clone)]
pub struct EnumToNumberConverter {
    model_type: AppType,
    provider_type: AppType,
    members: Vec<(String, i64)>,
}

impl EnumToNumberConverter {
    pub fn new<S: Into<String>>(
        enum_name: impl Into<String>,
        members: impl IntoIterator<Item = (S, i64)>,
        provider_type: AppType,
    ) -> Self {
        Self {
            model_type: AppType::Enum(enum_name.into()),
            provider_type,
            members: members.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }

    fn enum_name(&self) -> &str {
        match &self.model_type {
            AppType::Enum(name) => name,
            _ => "",
        }
    }
}

impl ValueConverter for EnumToNumberConverter {
    fn model_type(&self) -> &AppType {
        &self.model_type
    }

    fn provider_type(&self) -> &AppType {
        &self.provider_type
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Enum(member) => integer_as(&self.provider_type, member.value).map(Some),
            other => Err(MappingError::conversion(
                other.kind_name(),
                &self.provider_type,
                format!("expected a member of {}", self.enum_name()),
            )),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let number = expect_integer(value, &self.model_type)?;
        self.members
            .iter()
            .find(|(_, member)| *member == number)
            .map(|(name, member)| Some(DbValue::Enum(EnumValue::new(self.enum_name(), name.as_str(), *member))))
            .ok_or_else(|| {
                MappingError::conversion(number, &self.model_type, "no member has this value")
            })
    }
}

/// Stores enum members by name
#[derive(Debug, Clone)]
pub struct EnumToStringConverter {
    model_type: AppType,
    members: Vec<(String, i64)>,
}

impl EnumToStringConverter {
    pub fn new<S: Into<String>>(enum_name: impl Into<String>, members: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            model_type: AppType::Enum(enum_name.into()),
            members: members.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

impl ValueConverter for EnumToStringConverter {
    fn model_type(&self) -> &AppType {
        &self.model_type
    }

    fn provider_type(&self) -> &AppType {
        &AppType::String
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Enum(member) => Ok(Some(DbValue::Text(member.name.clone()))),
            other => Err(MappingError::conversion(other.kind_name(), AppType::String, "expected an enum member")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let name = expect_text(value, &self.model_type)?;
        let type_name = self.model_type.to_string();
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(member, number)| Some(DbValue::Enum(EnumValue::new(type_name.as_str(), member.as_str(), *number))))
            .ok_or_else(|| MappingError::conversion(name, &self.model_type, "no member has this name"))
    }
}

/// Stores booleans as 0/1 in an integer column
#[derive(Debug, Clone)]
pub struct BoolToNumberConverter {
    provider_type: AppType,
}

impl BoolToNumberConverter {
    pub fn new(provider_type: AppType) -> Self {
        Self { provider_type }
    }
}

impl ValueConverter for BoolToNumberConverter {
    fn model_type(&self) -> &AppType {
        &AppType::Bool
    }

    fn provider_type(&self) -> &AppType {
        &self.provider_type
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Bool(flag) => integer_as(&self.provider_type, i64::from(*flag)).map(Some),
            other => Err(MappingError::conversion(other.kind_name(), &self.provider_type, "expected a bool")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let number = expect_integer(value, &AppType::Bool)?;
        Ok(Some(DbValue::Bool(number != 0)))
    }
}

/// Stores UUIDs in their 36-character hyphenated form
#[derive(Debug, Clone)]
pub struct GuidToStringConverter {
    hints: MappingHints,
}

impl Default for GuidToStringConverter {
    fn default() -> Self {
        Self {
            hints: MappingHints::with_size(36),
        }
    }
}

impl ValueConverter for GuidToStringConverter {
    fn model_type(&self) -> &AppType {
        &AppType::Uuid
    }

    fn provider_type(&self) -> &AppType {
        &AppType::String
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Uuid(id) => Ok(Some(DbValue::Text(id.hyphenated().to_string()))),
            other => Err(MappingError::conversion(other.kind_name(), AppType::String, "expected a uuid")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let text = expect_text(value, &AppType::Uuid)?;
        Uuid::parse_str(text)
            .map(|id| Some(DbValue::Uuid(id)))
            .map_err(|e| MappingError::conversion(text, AppType::Uuid, e.to_string()))
    }

    fn mapping_hints(&self) -> Option<&MappingHints> {
        Some(&self.hints)
    }
}

/// Stores UUIDs as 16 raw bytes
#[derive(Debug, Clone)]
pub struct GuidToBytesConverter {
    hints: MappingHints,
}

impl Default for GuidToBytesConverter {
    fn default() -> Self {
        Self {
            hints: MappingHints::with_size(16),
        }
    }
}

impl ValueConverter for GuidToBytesConverter {
    fn model_type(&self) -> &AppType {
        &AppType::Uuid
    }

    fn provider_type(&self) -> &AppType {
        &AppType::Bytes
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Uuid(id) => Ok(Some(DbValue::Bytes(id.as_bytes().to_vec()))),
            other => Err(MappingError::conversion(other.kind_name(), AppType::Bytes, "expected a uuid")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| MappingError::conversion(value.kind_name(), AppType::Uuid, "expected bytes"))?;
        Uuid::from_slice(bytes)
            .map(|id| Some(DbValue::Uuid(id)))
            .map_err(|e| MappingError::conversion("bytes", AppType::Uuid, e.to_string()))
    }

    fn mapping_hints(&self) -> Option<&MappingHints> {
        Some(&self.hints)
    }
}

/// Stores strings as UTF-8 bytes
#[derive(Debug, Clone, Default)]
pub struct StringToBytesConverter;

impl ValueConverter for StringToBytesConverter {
    fn model_type(&self) -> &AppType {
        &AppType::String
    }

    fn provider_type(&self) -> &AppType {
        &AppType::Bytes
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let text = expect_text(value, &AppType::Bytes)?;
        Ok(Some(DbValue::Bytes(text.as_bytes().to_vec())))
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| MappingError::conversion(value.kind_name(), AppType::String, "expected bytes"))?;
        String::from_utf8(bytes.to_vec())
            .map(|text| Some(DbValue::Text(text)))
            .map_err(|e| MappingError::conversion("bytes", AppType::String, e.to_string()))
    }
}

/// Stores timestamps as ISO-like text
#[derive(Debug, Clone)]
pub struct DateTimeToStringConverter {
    hints: MappingHints,
}

impl Default for DateTimeToStringConverter {
    fn default() -> Self {
        Self {
            hints: MappingHints::with_size(48),
        }
    }
}

impl ValueConverter for DateTimeToStringConverter {
    fn model_type(&self) -> &AppType {
        &AppType::DateTime
    }

    fn provider_type(&self) -> &AppType {
        &AppType::String
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::DateTime(dt) => Ok(Some(DbValue::Text(dt.format(DATETIME_STRING_FORMAT).to_string()))),
            other => Err(MappingError::conversion(other.kind_name(), AppType::String, "expected a datetime")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let text = expect_text(value, &AppType::DateTime)?;
        NaiveDateTime::parse_from_str(text, DATETIME_STRING_FORMAT)
            .map(|dt| Some(DbValue::DateTime(dt)))
            .map_err(|e| MappingError::conversion(text, AppType::DateTime, e.to_string()))
    }

    fn mapping_hints(&self) -> Option<&MappingHints> {
        Some(&self.hints)
    }
}

/// Stores JSON documents as text, for providers without a native JSON type
#[derive(Debug, Clone, Default)]
pub struct JsonToStringConverter;

impl ValueConverter for JsonToStringConverter {
    fn model_type(&self) -> &AppType {
        &AppType::Json
    }

    fn provider_type(&self) -> &AppType {
        &AppType::String
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match value {
            DbValue::Json(doc) => Ok(Some(DbValue::Text(doc.to_string()))),
            other => Err(MappingError::conversion(other.kind_name(), AppType::String, "expected a json value")),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        let text = expect_text(value, &AppType::Json)?;
        serde_json::from_str(text)
            .map(|doc| Some(DbValue::Json(doc)))
            .map_err(|e| MappingError::conversion("text", AppType::Json, e.to_string()))
    }
}
