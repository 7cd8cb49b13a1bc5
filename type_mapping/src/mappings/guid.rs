use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::types::{AppType, DbValue};

/// Native UUID columns
#[derive(Debug, Clone)]
pub struct GuidTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl GuidTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Uuid), store_type)?
                .with_wire_type(WireType::Guid);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for GuidTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn sql_literal_format(&self) -> &str {
        "'{0}'"
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Uuid(id) => Ok(self.sql_literal_format().replacen("{0}", &id.hyphenated().to_string(), 1)),
            other => Err(unsupported_literal(self, other)),
        }
    }
}
