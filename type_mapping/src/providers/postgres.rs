use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::mappings::{
    ansi_temporal_literal, format_datetime_offset, json_text_literal, temporal_parameters, DecimalTypeMapping,
    FloatingPointTypeMapping, IntegerTypeMapping, StringTypeMapping,
};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::providers::{char_mapping, MappingInfo, ProviderMappings, ProviderOptions};
use crate::sql::{hex_upper, UNBOUNDED_SIZE};
use crate::types::{AppType, DbValue};
use crate::debug_log;

/// `boolean` columns rendered as `TRUE` / `FALSE`
#[derive(Debug, Clone)]
pub struct PostgresBoolTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl PostgresBoolTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bool), store_type)?
                .with_wire_type(WireType::Boolean);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for PostgresBoolTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bool(true) => Ok("TRUE".to_string()),
            DbValue::Bool(false) => Ok("FALSE".to_string()),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// `bytea` columns using the hex escape format
#[derive(Debug, Clone)]
pub struct PostgresByteArrayTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl PostgresByteArrayTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bytes), store_type)?
                .with_wire_type(WireType::Binary);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for PostgresByteArrayTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bytes(bytes) => Ok(format!("'\\x{}'::bytea", hex_upper(bytes))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// Native `uuid` columns
#[derive(Debug, Clone)]
pub struct PostgresGuidTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl PostgresGuidTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Uuid), store_type)?
                .with_wire_type(WireType::Guid);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for PostgresGuidTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn sql_literal_format(&self) -> &str {
        "'{0}'::uuid"
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Uuid(id) => Ok(self.sql_literal_format().replacen("{0}", &id.hyphenated().to_string(), 1)),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// `jsonb` or `json` columns; the literal is cast to the column's own type
#[derive(Debug, Clone)]
pub struct PostgresJsonTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl PostgresJsonTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Json), store_type)?
                .with_unicode(true)
                .with_wire_type(WireType::Json);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for PostgresJsonTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        let text = json_text_literal(self, value)?;
        Ok(format!("{text}::{}", self.store_type_name_base().to_ascii_lowercase()))
    }
}

/// Date and time columns. Offset values carry `TIMESTAMPTZ` so the offset is kept.
#[derive(Debug, Clone)]
pub struct PostgresDateTimeTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl PostgresDateTimeTypeMapping {
    pub fn new(store_type: &str, application_type: AppType) -> Result<Self, MappingError> {
        Ok(Self {
            parameters: temporal_parameters(store_type, application_type)?,
        })
    }
}

impl RelationalTypeMapping for PostgresDateTimeTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::DateTimeOffset(dt) => Ok(format!("TIMESTAMPTZ '{}'", format_datetime_offset(dt))),
            other => ansi_temporal_literal(self, other),
        }
    }
}

/// Mapping resolution for PostgreSQL
#[derive(Debug, Clone, Default)]
pub struct PostgresMappings {
    options: ProviderOptions,
}

impl PostgresMappings {
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }
}

impl ProviderMappings for PostgresMappings {
    fn provider_name(&self) -> &'static str {
        "postgres"
    }

    fn resolve(&self, info: &MappingInfo) -> Result<Option<Arc<dyn RelationalTypeMapping>>, MappingError> {
        let store_type = |default: &str| info.store_type_or(|| default.to_string());

        let mapping: Arc<dyn RelationalTypeMapping> = match info.app_type().strip_nullable() {
            AppType::Bool => Arc::new(PostgresBoolTypeMapping::new(&store_type("boolean"))?),
            // No single-byte integer; widen to smallint
            AppType::U8 => Arc::new(IntegerTypeMapping::new(&store_type("smallint"), AppType::U8)?),
            AppType::I16 => Arc::new(IntegerTypeMapping::new(&store_type("smallint"), AppType::I16)?),
            AppType::I32 => Arc::new(IntegerTypeMapping::new(&store_type("integer"), AppType::I32)?),
            AppType::I64 => Arc::new(IntegerTypeMapping::new(&store_type("bigint"), AppType::I64)?),
            AppType::F32 => Arc::new(FloatingPointTypeMapping::new(&store_type("real"), AppType::F32)?),
            AppType::F64 => Arc::new(FloatingPointTypeMapping::new(&store_type("double precision"), AppType::F64)?),
            AppType::Decimal => {
                let (precision, scale) = match info.effective_precision_scale() {
                    (None, None) => (Some(28), Some(10)),
                    facets => facets,
                };
                let default = match (precision, scale) {
                    (Some(p), Some(s)) => format!("numeric({p},{s})"),
                    (Some(p), None) => format!("numeric({p})"),
                    _ => "numeric".to_string(),
                };
                Arc::new(DecimalTypeMapping::new(&store_type(default.as_str()), precision, scale)?)
            }
            AppType::String => {
                let size = self.options.string_size_for(info).filter(|size| *size != UNBOUNDED_SIZE);
                let fixed = info.is_fixed_length();
                let base = if fixed { "character" } else { "varchar" };
                let default = match size {
                    Some(size) => format!("{base}({size})"),
                    None if fixed => "character(1)".to_string(),
                    None => "text".to_string(),
                };
                Arc::new(StringTypeMapping::new(&store_type(default.as_str()), true, size, fixed)?)
            }
            AppType::Char => char_mapping(&store_type("character(1)"), true)?,
            AppType::Bytes => Arc::new(PostgresByteArrayTypeMapping::new(&store_type("bytea"))?),
            AppType::Uuid => Arc::new(PostgresGuidTypeMapping::new(&store_type("uuid"))?),
            app_type @ (AppType::Date | AppType::Time | AppType::DateTime | AppType::DateTimeOffset) => {
                let default = match app_type {
                    AppType::Date => "date",
                    AppType::Time => "time",
                    AppType::DateTime => "timestamp",
                    _ => "timestamptz",
                };
                Arc::new(PostgresDateTimeTypeMapping::new(&store_type(default), app_type.clone())?)
            }
            AppType::Json => Arc::new(PostgresJsonTypeMapping::new(&store_type("jsonb"))?),
            AppType::Enum(_) | AppType::Custom(_) | AppType::Nullable(_) => return Ok(None),
        };

        debug_log!("Resolved {} to {} for postgres", info, mapping.store_type());
        Ok(Some(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_literals() {
        let flag = PostgresBoolTypeMapping::new("boolean").unwrap();
        assert_eq!(flag.generate_sql_literal(Some(&DbValue::Bool(false))).unwrap(), "FALSE");

        let bytes = PostgresByteArrayTypeMapping::new("bytea").unwrap();
        assert_eq!(
            bytes.generate_sql_literal(Some(&DbValue::Bytes(vec![0x0A, 0xFF]))).unwrap(),
            r"'\x0AFF'::bytea"
        );

        let id = Uuid::nil();
        let guid = PostgresGuidTypeMapping::new("uuid").unwrap();
        assert_eq!(
            guid.generate_sql_literal(Some(&DbValue::Uuid(id))).unwrap(),
            "'00000000-0000-0000-0000-000000000000'::uuid"
        );
    }

    #[test]
    fn test_offset_literal_keeps_offset() {
        let postgres = PostgresMappings::default();
        let mapping = postgres
            .resolve(&MappingInfo::for_type(AppType::DateTimeOffset))
            .unwrap()
            .unwrap();
        assert_eq!(mapping.store_type(), "timestamptz");

        let dt = chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::DateTimeOffset(dt))).unwrap(),
            "TIMESTAMPTZ '2024-01-02 03:04:05+02:00'"
        );

        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::Date(date))).unwrap(),
            "DATE '2024-01-02'"
        );
    }

    #[test]
    fn test_json_cast_follows_store_type() {
        let doc = DbValue::Json(json!([1, 2]));
        let jsonb = PostgresJsonTypeMapping::new("jsonb").unwrap();
        assert_eq!(jsonb.generate_sql_literal(Some(&doc)).unwrap(), "'[1,2]'::jsonb");

        let json = jsonb.clone_with_store_type_and_size("json", None).unwrap();
        assert_eq!(json.generate_sql_literal(Some(&doc)).unwrap(), "'[1,2]'::json");
    }

    #[test]
    fn test_resolve() {
        let postgres = PostgresMappings::default();

        let text = postgres.resolve(&MappingInfo::for_type(AppType::String)).unwrap().unwrap();
        assert_eq!(text.store_type(), "text");

        let sized = postgres
            .resolve(&MappingInfo::for_type(AppType::String).with_size(64))
            .unwrap()
            .unwrap();
        assert_eq!(sized.store_type(), "varchar(64)");
        assert_eq!(sized.size(), Some(64));

        let money = postgres.resolve(&MappingInfo::for_type(AppType::Decimal)).unwrap().unwrap();
        assert_eq!(money.store_type(), "numeric(28,10)");

        let explicit = postgres
            .resolve(&MappingInfo::for_type(AppType::Json).with_store_type("json"))
            .unwrap()
            .unwrap();
        assert_eq!(explicit.store_type(), "json");

        let nullable = postgres
            .resolve(&MappingInfo::for_type(AppType::I64.nullable()))
            .unwrap()
            .unwrap();
        assert_eq!(nullable.store_type(), "bigint");
    }
}
