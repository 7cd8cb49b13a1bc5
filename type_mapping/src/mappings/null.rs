use std::sync::{Arc, LazyLock};

use crate::errors::MappingError;
use crate::mapping::RelationalTypeMapping;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::sql::NULL_LITERAL;
use crate::types::{AppType, DbValue};

static INSTANCE: LazyLock<Arc<NullTypeMapping>> = LazyLock::new(|| {
    Arc::new(NullTypeMapping {
        parameters: RelationalTypeMappingParameters::from_static(
            CoreTypeMappingParameters::new(AppType::Custom("null".to_string())),
            NULL_LITERAL,
        ),
    })
});

/// Mapping for an untyped SQL `NULL`.
///
/// There is exactly one instance; every clone returns it unchanged.
#[derive(Debug)]
pub struct NullTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl NullTypeMapping {
    pub fn instance() -> Arc<NullTypeMapping> {
        Arc::clone(&INSTANCE)
    }
}

impl RelationalTypeMapping for NullTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, _parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Self::instance()
    }

    fn clone_with_store_type_and_size(
        &self,
        _store_type: &str,
        _size: Option<i32>,
    ) -> Result<Arc<dyn RelationalTypeMapping>, MappingError> {
        Ok(Self::instance())
    }

    fn generate_non_null_sql_literal(&self, _value: &DbValue) -> Result<String, MappingError> {
        Ok(NULL_LITERAL.to_string())
    }
}
