use std::sync::Arc;

use crate::converters::{BoolToNumberConverter, GuidToBytesConverter, JsonToStringConverter};
use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::mappings::{
    DateTimeTypeMapping, DecimalTypeMapping, FloatingPointTypeMapping, IntegerTypeMapping, StringTypeMapping,
};
use crate::parameter::{DbParameter, WireType};
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
use crate::providers::{char_mapping, MappingInfo, ProviderMappings, ProviderOptions};
use crate::sql::{hex_upper, UNBOUNDED_SIZE};
use crate::types::{AppType, DbValue};
use crate::{debug_log, trace_log};

/// Largest size a bounded binary parameter is pinned to
pub const ORACLE_MAX_BINARY_SIZE: i32 = 8000;

/// Bounded binary columns.
///
/// Small values are bound with one fixed size so the server reuses a single
/// cached plan. Values longer than that size keep whatever size was already
/// on the parameter and take the large-object path.
#[derive(Debug, Clone)]
pub struct OracleByteArrayTypeMapping {
    parameters: RelationalTypeMappingParameters,
    max_specific_size: i32,
}

impl OracleByteArrayTypeMapping {
    pub fn new(store_type: &str, size: Option<i32>) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bytes), store_type)?
                .with_postfix(StoreTypePostfix::Size)
                .with_size(size)
                .with_wire_type(WireType::Binary);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        let max_specific_size = match parameters.size() {
            Some(size) if (0..=ORACLE_MAX_BINARY_SIZE).contains(&size) => size,
            _ => ORACLE_MAX_BINARY_SIZE,
        };
        Self {
            parameters,
            max_specific_size,
        }
    }

    /// Size every in-bounds parameter is pinned to
    pub fn max_specific_size(&self) -> i32 {
        self.max_specific_size
    }
}

impl RelationalTypeMapping for OracleByteArrayTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn configure_parameter(&self, parameter: &mut DbParameter) {
        // Only absent values and string/byte values within the ceiling are pinned
        let within_ceiling = match (&parameter.value, parameter.value_length()) {
            (None, _) => true,
            (Some(_), Some(length)) => length <= self.max_specific_size as usize,
            (Some(_), None) => false,
        };
        if within_ceiling {
            parameter.size = Some(self.max_specific_size);
        } else {
            trace_log!(
                "Leaving size {:?} on {} for value over {} bytes",
                parameter.size,
                parameter.name,
                self.max_specific_size
            );
        }
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bytes(bytes) => Ok(format!("'{}'", hex_upper(bytes))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

/// Mapping resolution for Oracle
#[derive(Debug, Clone, Default)]
pub struct OracleMappings {
    options: ProviderOptions,
}

impl OracleMappings {
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }

    fn string_mapping(&self, info: &MappingInfo) -> Result<Arc<dyn RelationalTypeMapping>, MappingError> {
        let unicode = self.options.unicode_for(info);
        let fixed = info.is_fixed_length();
        let size = self.options.string_size_for(info);
        let store_type = info.store_type_or(|| match (size, unicode, fixed) {
            (None | Some(UNBOUNDED_SIZE), true, _) => "NCLOB".to_string(),
            (None | Some(UNBOUNDED_SIZE), false, _) => "CLOB".to_string(),
            (Some(size), true, true) => format!("NCHAR({size})"),
            (Some(size), false, true) => format!("CHAR({size})"),
            (Some(size), true, false) => format!("NVARCHAR2({size})"),
            (Some(size), false, false) => format!("VARCHAR2({size})"),
        });
        Ok(Arc::new(StringTypeMapping::new(&store_type, unicode, size, fixed)?))
    }
}

impl ProviderMappings for OracleMappings {
    fn provider_name(&self) -> &'static str {
        "oracle"
    }

    fn resolve(&self, info: &MappingInfo) -> Result<Option<Arc<dyn RelationalTypeMapping>>, MappingError> {
        let integer = |default: &str, app_type: AppType| -> Result<Arc<dyn RelationalTypeMapping>, MappingError> {
            let store_type = info.store_type_or(|| default.to_string());
            Ok(Arc::new(IntegerTypeMapping::new(&store_type, app_type)?))
        };

        let mapping: Arc<dyn RelationalTypeMapping> = match info.app_type().strip_nullable() {
            AppType::Bool => integer("NUMBER(1)", AppType::U8)?
                .clone_with_converter(Arc::new(BoolToNumberConverter::new(AppType::U8))),
            AppType::U8 => integer("NUMBER(3)", AppType::U8)?,
            AppType::I16 => integer("NUMBER(5)", AppType::I16)?,
            AppType::I32 => integer("NUMBER(10)", AppType::I32)?,
            AppType::I64 => integer("NUMBER(19)", AppType::I64)?,
            app_type @ (AppType::F32 | AppType::F64) => {
                let default = if *app_type == AppType::F32 { "BINARY_FLOAT" } else { "BINARY_DOUBLE" };
                let store_type = info.store_type_or(|| default.to_string());
                Arc::new(FloatingPointTypeMapping::new(&store_type, app_type.clone())?)
            }
            AppType::Decimal => {
                let (precision, scale) = info.effective_precision_scale();
                let store_type = info.store_type_or(|| match (precision, scale) {
                    (Some(p), Some(s)) => format!("NUMBER({p},{s})"),
                    (Some(p), None) => format!("NUMBER({p})"),
                    _ => "NUMBER".to_string(),
                });
                Arc::new(DecimalTypeMapping::new(&store_type, precision, scale)?)
            }
            AppType::String => self.string_mapping(info)?,
            AppType::Char => {
                let unicode = self.options.unicode_for(info);
                let default = if unicode { "NCHAR(1)" } else { "CHAR(1)" };
                char_mapping(&info.store_type_or(|| default.to_string()), unicode)?
            }
            AppType::Bytes => {
                let size = info.effective_size();
                let store_type = info.store_type_or(|| match size {
                    Some(size) if size > 0 => format!("RAW({size})"),
                    _ => "BLOB".to_string(),
                });
                Arc::new(OracleByteArrayTypeMapping::new(&store_type, size)?)
            }
            AppType::Uuid => {
                let store_type = info.store_type_or(|| "RAW(16)".to_string());
                OracleByteArrayTypeMapping::new(&store_type, Some(16))?
                    .clone_with_converter(Arc::new(GuidToBytesConverter::default()))
            }
            app_type @ (AppType::Date | AppType::DateTime | AppType::DateTimeOffset) => {
                let default = match app_type {
                    AppType::Date => "DATE",
                    AppType::DateTime => "TIMESTAMP",
                    _ => "TIMESTAMP WITH TIME ZONE",
                };
                let store_type = info.store_type_or(|| default.to_string());
                Arc::new(DateTimeTypeMapping::new(&store_type, app_type.clone())?)
            }
            AppType::Time => {
                return Err(MappingError::UnsupportedType(
                    "Oracle has no time-of-day column type".to_string(),
                ))
            }
            AppType::Json => {
                let unicode = self.options.unicode_for(info);
                let default = if unicode { "NCLOB" } else { "CLOB" };
                let store_type = info.store_type_or(|| default.to_string());
                StringTypeMapping::new(&store_type, unicode, None, false)?
                    .clone_with_converter(Arc::new(JsonToStringConverter))
            }
            AppType::Enum(_) | AppType::Custom(_) | AppType::Nullable(_) => return Ok(None),
        };

        debug_log!("Resolved {} to {} for oracle", info, mapping.store_type());
        Ok(Some(mapping))
    }
}
