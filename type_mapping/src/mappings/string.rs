use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
use crate::sql::quote_string;
use crate::types::{AppType, DbValue};

/// Wire type for a string column with the given width and padding
pub fn string_wire_type(unicode: bool, fixed_length: bool) -> WireType {
    match (unicode, fixed_length) {
        (true, false) => WireType::String,
        (true, true) => WireType::StringFixedLength,
        (false, false) => WireType::AnsiString,
        (false, true) => WireType::AnsiStringFixedLength,
    }
}

/// Text columns: `'it''s'`
#[derive(Debug, Clone)]
pub struct StringTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl StringTypeMapping {
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
        Self { parameters }
    }
}

impl RelationalTypeMapping for StringTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        match value {
            DbValue::Text(text) => Ok(quote_string(text)),
            DbValue::Char(ch) => Ok(quote_string(ch.encode_utf8(&mut [0; 4]))),
            other => Err(unsupported_literal(self, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::RelationalCommand;

    #[test]
    fn test_string_literal_escaping() {
        let mapping = StringTypeMapping::new("varchar(20)", false, Some(20), false).unwrap();
        assert_eq!(mapping.generate_sql_literal(Some(&DbValue::from("O'Neil"))).unwrap(), "'O''Neil'");
        assert_eq!(mapping.generate_sql_literal(Some(&DbValue::Char('x'))).unwrap(), "'x'");
        assert_eq!(mapping.generate_sql_literal(None).unwrap(), "NULL");
        assert!(mapping.generate_sql_literal(Some(&DbValue::I32(1))).is_err());
    }

    #[test]
    fn test_string_parameter_facets() {
        let mapping = StringTypeMapping::new("nchar(10)", true, Some(10), true).unwrap();
        let parameter = mapping
            .create_parameter(&RelationalCommand::new("q"), "@p0", Some(&DbValue::from("abc")), Some(false))
            .unwrap();
        assert_eq!(parameter.wire_type, Some(WireType::StringFixedLength));
        assert_eq!(parameter.size, Some(10));
        assert_eq!(parameter.is_nullable, Some(false));
        assert_eq!(parameter.name, "@p0");
    }
}
