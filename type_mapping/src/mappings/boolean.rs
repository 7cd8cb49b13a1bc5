use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::types::{AppType, DbValue};

/// Boolean columns rendered as `1` / `0`
#[derive(Debug, Clone)]
pub struct BoolTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl BoolTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Bool), store_type)?
                .with_wire_type(WireType::Boolean);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for BoolTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bool(true) => Ok("1".to_string()),
            DbValue::Bool(false) => Ok("0".to_string()),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literals() {
        let mapping = BoolTypeMapping::new("boolean").unwrap();
        assert_eq!(mapping.generate_sql_literal(Some(&DbValue::Bool(true))).unwrap(), "1");
        assert_eq!(mapping.generate_sql_literal(Some(&DbValue::Bool(false))).unwrap(), "0");
        assert_eq!(mapping.generate_sql_literal(None).unwrap(), "NULL");
    }
}
