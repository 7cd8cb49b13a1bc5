use std::sync::Arc;

use crate::converters::JsonToStringConverter;
use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::mappings::{
    format_date, format_time, string_wire_type, FloatingPointTypeMapping, GuidTypeMapping, IntegerTypeMapping,
};
use crate::parameter::{DbParameter, WireType};
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
use crate::providers::{MappingInfo, ProviderMappings, ProviderOptions};
use crate::sql::{hex_upper, quote_string, UNBOUNDED_SIZE};
use crate::types::{AppType, DbValue};
use crate::{debug_log, trace_log};

const MAX_BINARY_SIZE: i32 = 8000;
const MAX_UNICODE_SIZE: i32 = 4000;
const MAX_ANSI_SIZE: i32 = 8000;

/// Configured size when it fits under `ceiling`, else the ceiling
fn max_specific_size(size: Option<i32>, ceiling: i32) -> i32 {
    match size {
        Some(size) if (1..=ceiling).contains(&size) => size,
        _ => ceiling,
    }
}

/// Pin small values to one size; send anything longer as `max`
fn pin_or_unbound(parameter: &mut DbParameter, max_specific_size: i32) {
    let length = parameter.value_length();
    match (&parameter.value, length) {
        (None, _) => parameter.size = Some(max_specific_size),
        (Some(_), Some(length)) if length <= max_specific_size as usize => {
            parameter.size = Some(max_specific_size)
        }
        (Some(_), Some(_)) => {
            trace_log!("Parameter {} holds {:?} units; binding as max", parameter.name, length);
            parameter.size = Some(UNBOUNDED_SIZE);
        }
        (Some(_), None) => {}
    }
}

/// `varbinary` / `binary` columns with `0x` literals
#[derive(Debug, Clone)]
pub struct SqlServerByteArrayTypeMapping {
    parameters: RelationalTypeMappingParameters,
    max_specific_size: i32,
}

impl SqlServerByteArrayTypeMapping {
    pub fn new(store_type: &str, size: Option<i32>, fixed_length: bool) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bytes), store_type)?
                .with_postfix(StoreTypePostfix::Size)
                .with_size(size)
                .with_fixed_length(fixed_length)
                .with_wire_type(WireType::Binary);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        let max_specific_size = max_specific_size(parameters.size(), MAX_BINARY_SIZE);
        Self {
            parameters,
            max_specific_size,
        }
    }
}

impl RelationalTypeMapping for SqlServerByteArrayTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn configure_parameter(&self, parameter: &mut DbParameter) {
        pin_or_unbound(parameter, self.max_specific_size);
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bytes(bytes) => Ok(format!("0x{}", hex_upper(bytes))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// `nvarchar` / `varchar` family. Unicode literals carry the `N` prefix.
#[derive(Debug, Clone)]
pub struct SqlServerStringTypeMapping {
    parameters: RelationalTypeMappingParameters,
    max_specific_size: i32,
}

impl SqlServerStringTypeMapping {
    pub fn new(store_type: &str, unicode: bool, size: Option<i32>, fixed_length: bool) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::String), store_type)?
                .with_postfix(StoreTypePostfix::Size)
                .with_unicode(unicode)
                .with_size(size)
                .with_fixed_length(fixed_length)
                .with_wire_type(string_wire_type(unicode, fixed_length));
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        let ceiling = if parameters.is_unicode() { MAX_UNICODE_SIZE } else { MAX_ANSI_SIZE };
        let max_specific_size = max_specific_size(parameters.size(), ceiling);
        Self {
            parameters,
            max_specific_size,
        }
    }
}

impl RelationalTypeMapping for SqlServerStringTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn configure_parameter(&self, parameter: &mut DbParameter) {
        pin_or_unbound(parameter, self.max_specific_size);
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        let quoted = match value {
            DbValue::Text(text) => quote_string(text),
            DbValue::Char(ch) => quote_string(ch.encode_utf8(&mut [0; 4])),
            other => return Err(unsupported_literal(self, other)),
        };
        if self.is_unicode() {
            Ok(format!("N{quoted}"))
        } else {
            Ok(quoted)
        }
    }
}

/// `bit` columns
#[derive(Debug, Clone)]
pub struct SqlServerBoolTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl SqlServerBoolTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bool), store_type)?
                .with_wire_type(WireType::Boolean);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for SqlServerBoolTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn sql_literal_format(&self) -> &str {
        "CAST({0} AS bit)"
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        let bit = match value {
            DbValue::Bool(true) => "1",
            DbValue::Bool(false) => "0",
            other => return Err(unsupported_literal(self, other)),
        };
        Ok(self.sql_literal_format().replacen("{0}", bit, 1))
    }
}

/// `decimal(p,s)` columns; precision and scale travel on the parameter
#[derive(Debug, Clone)]
pub struct SqlServerDecimalTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl SqlServerDecimalTypeMapping {
    pub fn new(store_type: &str, precision: Option<u32>, scale: Option<u32>) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Decimal), store_type)?
                .with_postfix(StoreTypePostfix::PrecisionAndScale)
                .with_precision_and_scale(precision, scale)
                .with_wire_type(WireType::Decimal);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for SqlServerDecimalTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn configure_parameter(&self, parameter: &mut DbParameter) {
        if let Some(precision) = self.precision() {
            parameter.precision = Some(precision);
        }
        if let Some(scale) = self.scale() {
            parameter.scale = Some(scale);
        }
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Decimal(number) => Ok(number.to_string()),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// `date`, `time`, `datetime2` and `datetimeoffset` columns with ISO 8601 literals
#[derive(Debug, Clone)]
pub struct SqlServerDateTimeTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl SqlServerDateTimeTypeMapping {
    pub fn new(store_type: &str, application_type: AppType) -> Result<Self, MappingError> {
        let legacy = matches!(
            crate::sql::store_type_name_base(store_type).to_ascii_lowercase().as_str(),
            "datetime" | "smalldatetime"
        );
        let wire_type = match application_type.strip_nullable() {
            AppType::Date => WireType::Date,
            AppType::Time => WireType::Time,
            AppType::DateTime if legacy => WireType::DateTime,
            AppType::DateTime => WireType::DateTime2,
            AppType::DateTimeOffset => WireType::DateTimeOffset,
            other => {
                return Err(MappingError::InvalidConfiguration(format!(
                    "{other} is not a date or time type"
                )))
            }
        };
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(application_type), store_type)?
                .with_wire_type(wire_type);
        Ok(Self { parameters })
    }
}

impl RelationalTypeMapping for SqlServerDateTimeTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self { parameters })
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Date(date) => Ok(format!("'{}'", format_date(date))),
            DbValue::Time(time) => Ok(format!("'{}'", format_time(time))),
            DbValue::DateTime(dt) => Ok(format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f"))),
            DbValue::DateTimeOffset(dt) => Ok(format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z"))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// Mapping resolution for SQL Server
#[derive(Debug, Clone, Default)]
pub struct SqlServerMappings {
    options: ProviderOptions,
}

impl SqlServerMappings {
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }

    fn string_mapping(&self, info: &MappingInfo) -> Result<SqlServerStringTypeMapping, MappingError> {
        let unicode = self.options.unicode_for(info);
        let fixed = info.is_fixed_length();
        let size = self.options.string_size_for(info);
        let base = match (unicode, fixed) {
            (true, true) => "nchar",
            (true, false) => "nvarchar",
            (false, true) => "char",
            (false, false) => "varchar",
        };
        let store_type = info.store_type_or(|| match size {
            Some(size) if size != UNBOUNDED_SIZE => format!("{base}({size})"),
            _ => format!("{base}(max)"),
        });
        SqlServerStringTypeMapping::new(&store_type, unicode, size, fixed)
    }
}

impl ProviderMappings for SqlServerMappings {
    fn provider_name(&self) -> &'static str {
        "sqlserver"
    }

    fn resolve(&self, info: &MappingInfo) -> Result<Option<Arc<dyn RelationalTypeMapping>>, MappingError> {
        let store_type = |default: &str| info.store_type_or(|| default.to_string());

        let mapping: Arc<dyn RelationalTypeMapping> = match info.app_type().strip_nullable() {
            AppType::Bool => Arc::new(SqlServerBoolTypeMapping::new(&store_type("bit"))?),
            AppType::U8 => Arc::new(IntegerTypeMapping::new(&store_type("tinyint"), AppType::U8)?),
            AppType::I16 => Arc::new(IntegerTypeMapping::new(&store_type("smallint"), AppType::I16)?),
            AppType::I32 => Arc::new(IntegerTypeMapping::new(&store_type("int"), AppType::I32)?),
            AppType::I64 => Arc::new(IntegerTypeMapping::new(&store_type("bigint"), AppType::I64)?),
            AppType::F32 => Arc::new(FloatingPointTypeMapping::new(&store_type("real"), AppType::F32)?),
            AppType::F64 => Arc::new(FloatingPointTypeMapping::new(&store_type("float"), AppType::F64)?),
            AppType::Decimal => {
                let (precision, scale) = match info.effective_precision_scale() {
                    (None, None) => (Some(18), Some(2)),
                    facets => facets,
                };
                let default = match (precision, scale) {
                    (Some(p), Some(s)) => format!("decimal({p},{s})"),
                    (Some(p), None) => format!("decimal({p})"),
                    _ => "decimal".to_string(),
                };
                Arc::new(SqlServerDecimalTypeMapping::new(&store_type(default.as_str()), precision, scale)?)
            }
            AppType::String => Arc::new(self.string_mapping(info)?),
            AppType::Char => {
                let char_info = info.clone().with_size(1).with_fixed_length(true);
                let mapping = self.string_mapping(&char_info)?;
                let parameters = mapping.parameters().clone().with_application_type(AppType::Char);
                mapping.clone_with_parameters(parameters)
            }
            AppType::Bytes => {
                let size = info.effective_size();
                let fixed = info.is_fixed_length();
                let base = if fixed { "binary" } else { "varbinary" };
                let default = match size {
                    Some(size) if size != UNBOUNDED_SIZE => format!("{base}({size})"),
                    _ => format!("{base}(max)"),
                };
                Arc::new(SqlServerByteArrayTypeMapping::new(&store_type(default.as_str()), size, fixed)?)
            }
            AppType::Uuid => Arc::new(GuidTypeMapping::new(&store_type("uniqueidentifier"))?),
            app_type @ (AppType::Date | AppType::Time | AppType::DateTime | AppType::DateTimeOffset) => {
                let default = match app_type {
                    AppType::Date => "date",
                    AppType::Time => "time",
                    AppType::DateTime => "datetime2",
                    _ => "datetimeoffset",
                };
                Arc::new(SqlServerDateTimeTypeMapping::new(&store_type(default), app_type.clone())?)
            }
            AppType::Json => {
                let json_info = MappingInfo::for_type(AppType::String)
                    .with_store_type(store_type("nvarchar(max)"))
                    .with_unicode(true);
                self.string_mapping(&json_info)?
                    .clone_with_converter(Arc::new(JsonToStringConverter))
            }
            AppType::Enum(_) | AppType::Custom(_) | AppType::Nullable(_) => return Ok(None),
        };

        debug_log!("Resolved {} to {} for sqlserver", info, mapping.store_type());
        Ok(Some(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::RelationalCommand;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn bind(mapping: &dyn RelationalTypeMapping, value: DbValue) -> DbParameter {
        mapping
            .create_parameter(&RelationalCommand::new("select 1"), "@p0", Some(&value), None)
            .unwrap()
    }

    #[test]
    fn test_string_sizes() {
        let mapping = SqlServerStringTypeMapping::new("nvarchar(100)", true, Some(100), false).unwrap();
        assert_eq!(bind(&mapping, DbValue::from("short")).size, Some(100));
        assert_eq!(bind(&mapping, DbValue::from("x".repeat(101))).size, Some(UNBOUNDED_SIZE));

        let unbounded = SqlServerStringTypeMapping::new("nvarchar(max)", true, None, false).unwrap();
        assert_eq!(bind(&unbounded, DbValue::from("short")).size, Some(4000));
        assert_eq!(bind(&unbounded, DbValue::from("x".repeat(4001))).size, Some(UNBOUNDED_SIZE));

        let ansi = SqlServerStringTypeMapping::new("varchar(max)", false, None, false).unwrap();
        assert_eq!(bind(&ansi, DbValue::from("x".repeat(4001))).size, Some(8000));
        assert_eq!(ansi.wire_type(), Some(WireType::AnsiString));
    }

    #[test]
    fn test_string_literals() {
        let unicode = SqlServerStringTypeMapping::new("nvarchar(10)", true, Some(10), false).unwrap();
        assert_eq!(unicode.generate_sql_literal(Some(&DbValue::from("it's"))).unwrap(), "N'it''s'");

        let ansi = SqlServerStringTypeMapping::new("varchar(10)", false, Some(10), false).unwrap();
        assert_eq!(ansi.generate_sql_literal(Some(&DbValue::from("it's"))).unwrap(), "'it''s'");
    }

    #[test]
    fn test_binary() {
        let mapping = SqlServerByteArrayTypeMapping::new("varbinary(max)", None, false).unwrap();
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::Bytes(vec![0x0A, 0xFF]))).unwrap(),
            "0x0AFF"
        );
        assert_eq!(bind(&mapping, DbValue::Bytes(vec![0; 10])).size, Some(8000));
        assert_eq!(bind(&mapping, DbValue::Bytes(vec![0; 8001])).size, Some(UNBOUNDED_SIZE));
    }

    #[test]
    fn test_bool_and_decimal() {
        let flag = SqlServerBoolTypeMapping::new("bit").unwrap();
        assert_eq!(flag.generate_sql_literal(Some(&DbValue::Bool(true))).unwrap(), "CAST(1 AS bit)");

        let money = SqlServerDecimalTypeMapping::new("decimal(10,4)", Some(10), Some(4)).unwrap();
        let parameter = bind(&money, DbValue::Decimal(Decimal::from_str("1.5").unwrap()));
        assert_eq!(parameter.precision, Some(10));
        assert_eq!(parameter.scale, Some(4));
        assert_eq!(parameter.wire_type, Some(WireType::Decimal));
    }

    #[test]
    fn test_datetime_literals() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let modern = SqlServerDateTimeTypeMapping::new("datetime2", AppType::DateTime).unwrap();
        assert_eq!(
            modern.generate_sql_literal(Some(&DbValue::DateTime(dt))).unwrap(),
            "'2024-01-02T03:04:05'"
        );
        assert_eq!(modern.wire_type(), Some(WireType::DateTime2));

        let legacy = SqlServerDateTimeTypeMapping::new("datetime", AppType::DateTime).unwrap();
        assert_eq!(legacy.wire_type(), Some(WireType::DateTime));
    }

    #[test]
    fn test_resolve() {
        let sqlserver = SqlServerMappings::default();

        let text = sqlserver.resolve(&MappingInfo::for_type(AppType::String)).unwrap().unwrap();
        assert_eq!(text.store_type(), "nvarchar(max)");
        assert!(text.is_unicode());

        let sized = sqlserver
            .resolve(&MappingInfo::for_type(AppType::String).with_size(50).with_unicode(false))
            .unwrap()
            .unwrap();
        assert_eq!(sized.store_type(), "varchar(50)");
        assert_eq!(sized.size(), Some(50));

        let money = sqlserver.resolve(&MappingInfo::for_type(AppType::Decimal)).unwrap().unwrap();
        assert_eq!(money.store_type(), "decimal(18,2)");

        let letter = sqlserver.resolve(&MappingInfo::for_type(AppType::Char)).unwrap().unwrap();
        assert_eq!(letter.store_type(), "nchar(1)");
        assert_eq!(letter.application_type(), &AppType::Char);

        let doc = sqlserver.resolve(&MappingInfo::for_type(AppType::Json)).unwrap().unwrap();
        assert_eq!(doc.application_type(), &AppType::Json);
        assert_eq!(
            doc.generate_sql_literal(Some(&DbValue::Json(json!({"a": 1})))).unwrap(),
            r#"N'{"a":1}'"#
        );

        assert!(sqlserver
            .resolve(&MappingInfo::for_type(AppType::Enum("Color".into())))
            .unwrap()
            .is_none());
    }
}
