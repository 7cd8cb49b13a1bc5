use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
use crate::sql::hex_upper;
use crate::types::{AppType, DbValue};

/// Binary columns rendered as `X'0AFF'`
#[derive(Debug, Clone)]
pub struct ByteArrayTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl ByteArrayTypeMapping {
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
        Self { parameters }
    }
}

impl RelationalTypeMapping for ByteArrayTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Bytes(bytes) => Ok(format!("X'{}'", hex_upper(bytes))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::GuidToBytesConverter;
    use uuid::Uuid;

    #[test]
    fn test_byte_array_literal() {
        let mapping = ByteArrayTypeMapping::new("blob", None, false).unwrap();
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::Bytes(vec![0x0A, 0xFF]))).unwrap(),
            "X'0AFF'"
        );
    }

    #[test]
    fn test_guid_stored_as_bytes() {
        let mapping = ByteArrayTypeMapping::new("binary(16)", Some(16), true)
            .unwrap()
            .clone_with_converter(Arc::new(GuidToBytesConverter::default()));
        let id = Uuid::from_bytes([0x11; 16]);

        assert_eq!(mapping.application_type(), &AppType::Uuid);
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::Uuid(id))).unwrap(),
            format!("X'{}'", "11".repeat(16))
        );
    }
}
