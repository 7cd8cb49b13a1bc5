use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
use crate::types::{AppType, DbValue};

/// Integer columns of any width
#[derive(Debug, Clone)]
pub struct IntegerTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl IntegerTypeMapping {
    pub fn new(store_type: &str, application_type: AppType) -> Result<Self, MappingError> {
        let wire_type = match application_type.strip_nullable() {
            AppType::U8 => WireType::Byte,
            AppType::I16 => WireType::Int16,
            AppType::I32 => WireType::Int32,
            AppType::I64 => WireType::Int64,
            other => {
                return Err(MappingError::InvalidConfiguration(format!(
                    "{other} is not an integer type"
                )))
            }
        };
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(application_type), store_type)?
                .with_wire_type(wire_type);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for IntegerTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        value
            .as_i64()
            .map(|number| number.to_string())
            .ok_or_else(|| unsupported_literal(self, value))
    }
}

/// `real` / `double precision` columns
#[derive(Debug, Clone)]
pub struct FloatingPointTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl FloatingPointTypeMapping {
    pub fn new(store_type: &str, application_type: AppType) -> Result<Self, MappingError> {
        let wire_type = match application_type.strip_nullable() {
            AppType::F32 => WireType::Single,
            AppType::F64 => WireType::Double,
            other => {
                return Err(MappingError::InvalidConfiguration(format!(
                    "{other} is not a floating point type"
                )))
            }
        };
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(application_type), store_type)?
                .with_wire_type(wire_type);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for FloatingPointTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        // NaN and infinities have no portable literal form
        let finite = match value {
            DbValue::F32(v) => v.is_finite(),
            DbValue::F64(v) => v.is_finite(),
            _ => false,
        };
        if finite {
            Ok(value.to_string())
        } else {
            Err(unsupported_literal(self, value))
        }
    }
}

/// Exact numeric columns with precision and scale
#[derive(Debug, Clone)]
pub struct DecimalTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl DecimalTypeMapping {
    pub fn new(store_type: &str, precision: Option<u32>, scale: Option<u32>) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Decimal), store_type)?
                .with_postfix(StoreTypePostfix::PrecisionAndScale)
                .with_precision_and_scale(precision, scale)
                .with_wire_type(WireType::Decimal);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for DecimalTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Decimal(number) => Ok(number.to_string()),
            other => other
                .as_i64()
                .map(|number| number.to_string())
                .ok_or_else(|| unsupported_literal(self, other)),
        }
    }
}
