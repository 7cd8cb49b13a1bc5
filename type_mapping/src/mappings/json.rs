use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::sql::quote_string;
use crate::types::{AppType, DbValue};

/// JSON documents stored in a JSON-capable column.
///
/// Pre-serialized text is accepted as-is so documents read back as strings
/// can be written again without reparsing.
#[derive(Debug, Clone)]
pub struct JsonTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl JsonTypeMapping {
    pub fn new(store_type: &str) -> Result<Self, MappingError> {
        let parameters =
            RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(AppType::Json), store_type)?
                .with_unicode(true)
                .with_wire_type(WireType::Json);
        Ok(Self::from_parameters(parameters))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

/// Quoted document text, shared with provider variants that append a cast
pub(crate) fn json_text_literal(
    mapping: &dyn RelationalTypeMapping,
    value: &DbValue,
) -> Result<String, MappingError> {
    match value {
        DbValue::Json(doc) => Ok(quote_string(&doc.to_string())),
        DbValue::Text(text) => Ok(quote_string(text)),
        other => Err(unsupported_literal(mapping, other)),
    }
}

impl RelationalTypeMapping for JsonTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        json_text_literal(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_literal_quotes_document() {
        let mapping = JsonTypeMapping::new("json").unwrap();
        let doc = DbValue::Json(json!({"name": "O'Neil"}));
        assert_eq!(mapping.generate_sql_literal(Some(&doc)).unwrap(), r#"'{"name":"O''Neil"}'"#);
        assert_eq!(
            mapping.generate_sql_literal(Some(&DbValue::from(r#"{"a":1}"#))).unwrap(),
            r#"'{"a":1}'"#
        );
    }
}
