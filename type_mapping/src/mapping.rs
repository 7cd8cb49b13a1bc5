//! The relational type mapping contract
//!
//! A mapping is an immutable description of how one application type is
//! stored by one relational provider. Variants implement
//! [`RelationalTypeMapping::parameters`] and
//! [`RelationalTypeMapping::clone_with_parameters`] and override the hooks
//! they need; everything else is provided here.

use std::fmt;
use std::sync::Arc;

use crate::accessor::{DataRecord, ReaderAccessor};
use crate::comparer::{DefaultValueComparer, ValueComparer};
use crate::converter::ValueConverter;
use crate::errors::MappingError;
use crate::parameter::{DbCommand, DbParameter, ParameterDirection, WireType};
use crate::parameters::{RelationalTypeMappingParameters, StoreTypePostfix};
use crate::sql::{self, NULL_LITERAL, UNBOUNDED_SIZE};
use crate::trace_log;
use crate::types::{AppType, DbValue};

static DEFAULT_COMPARER: DefaultValueComparer = DefaultValueComparer;

pub trait RelationalTypeMapping: fmt::Debug + Send + Sync {
    /// The facets this mapping was built from
    fn parameters(&self) -> &RelationalTypeMappingParameters;

    /// Build a new mapping of the same variant from derived parameters
    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping>;

    /// New mapping identical to this one except for store type and size
    fn clone_with_store_type_and_size(
        &self,
        store_type: &str,
        size: Option<i32>,
    ) -> Result<Arc<dyn RelationalTypeMapping>, MappingError> {
        let parameters = self.parameters().with_store_type_and_size(store_type, size)?;
        Ok(self.clone_with_parameters(parameters))
    }

    /// New mapping with `converter` composed in front of the existing converter
    fn clone_with_converter(&self, converter: Arc<dyn ValueConverter>) -> Arc<dyn RelationalTypeMapping> {
        let parameters = self.parameters().with_composed_converter(Some(converter));
        self.clone_with_parameters(parameters)
    }

    /// Last-mile, provider-specific parameter adjustments. Runs after the generic facets.
    fn configure_parameter(&self, _parameter: &mut DbParameter) {}

    /// Template for the default literal; `{0}` is replaced by the invariant rendering
    fn sql_literal_format(&self) -> &str {
        "{0}"
    }

    /// Literal for a value already in provider form. Never receives an absent value.
    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        Ok(self.sql_literal_format().replacen("{0}", &value.to_string(), 1))
    }

    fn store_type(&self) -> &str {
        self.parameters().store_type()
    }

    fn store_type_name_base(&self) -> &str {
        sql::store_type_name_base(self.parameters().store_type())
    }

    fn store_type_postfix(&self) -> StoreTypePostfix {
        self.parameters().store_type_postfix()
    }

    fn wire_type(&self) -> Option<WireType> {
        self.parameters().wire_type()
    }

    fn is_unicode(&self) -> bool {
        self.parameters().is_unicode()
    }

    fn size(&self) -> Option<i32> {
        self.parameters().size()
    }

    fn is_fixed_length(&self) -> bool {
        self.parameters().is_fixed_length()
    }

    fn precision(&self) -> Option<u32> {
        self.parameters().precision()
    }

    fn scale(&self) -> Option<u32> {
        self.parameters().scale()
    }

    fn application_type(&self) -> &AppType {
        self.parameters().core().application_type()
    }

    fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.parameters().core().converter()
    }

    /// Configured comparer, or structural comparison when none is set
    fn comparer(&self) -> &dyn ValueComparer {
        match self.parameters().core().comparer() {
            Some(comparer) => comparer.as_ref(),
            None => &DEFAULT_COMPARER,
        }
    }

    /// Run the converter, if any. Absent values stay absent.
    fn to_provider_value(&self, value: Option<&DbValue>) -> Result<Option<DbValue>, MappingError> {
        match (value, self.converter()) {
            (None, _) => Ok(None),
            (Some(value), Some(converter)) => converter.convert_to_provider(value),
            (Some(value), None) => Ok(Some(value.clone())),
        }
    }

    /// Create and populate a parameter for `value`.
    ///
    /// Generic facets are applied first; [`configure_parameter`](Self::configure_parameter)
    /// runs last and may override them.
    fn create_parameter(
        &self,
        command: &dyn DbCommand,
        name: &str,
        value: Option<&DbValue>,
        nullable: Option<bool>,
    ) -> Result<DbParameter, MappingError> {
        let mut parameter = command.create_parameter();
        parameter.direction = ParameterDirection::Input;
        parameter.name = name.to_string();
        parameter.value = self.to_provider_value(value)?;

        if let Some(nullable) = nullable {
            parameter.is_nullable = Some(nullable);
        }
        if let Some(wire_type) = self.wire_type() {
            parameter.wire_type = Some(wire_type);
        }
        if let Some(size) = self.size().filter(|size| *size != UNBOUNDED_SIZE) {
            parameter.size = Some(size);
        }

        self.configure_parameter(&mut parameter);
        trace_log!(
            "Created parameter {} for {} (size: {:?})",
            parameter.name,
            self.store_type(),
            parameter.size
        );
        Ok(parameter)
    }

    /// SQL literal for an application value; absent values render as `NULL`
    fn generate_sql_literal(&self, value: Option<&DbValue>) -> Result<String, MappingError> {
        let provider_value = self.to_provider_value(value)?;
        self.generate_provider_value_sql_literal(provider_value.as_ref())
    }

    /// SQL literal for a value already in provider form
    fn generate_provider_value_sql_literal(&self, value: Option<&DbValue>) -> Result<String, MappingError> {
        match value {
            None => Ok(NULL_LITERAL.to_string()),
            Some(value) => self.generate_non_null_sql_literal(value),
        }
    }

    /// The non-null literal path with the absent case made explicit
    fn render_literal(&self, value: Option<&DbValue>) -> Result<String, MappingError> {
        match value {
            Some(value) => self.generate_non_null_sql_literal(value),
            None => Err(MappingError::InvalidArgument(format!(
                "cannot render an absent value through the non-null literal path of '{}'",
                self.store_type()
            ))),
        }
    }

    /// Reader accessor for the provider-side type of this mapping
    fn data_reader_accessor(&self) -> ReaderAccessor {
        let provider_type = self
            .converter()
            .map(|converter| converter.provider_type())
            .unwrap_or_else(|| self.application_type());
        ReaderAccessor::for_type(provider_type)
    }

    /// Read one column and convert it back to the application form
    fn read_value(&self, record: &dyn DataRecord, ordinal: usize) -> Result<Option<DbValue>, MappingError> {
        let raw = self.data_reader_accessor().read(record, ordinal)?;
        match (raw, self.converter()) {
            (Some(raw), Some(converter)) => converter.convert_from_provider(&raw),
            (raw, _) => Ok(raw),
        }
    }
}

/// Error for a value outside the family a variant renders
pub(crate) fn unsupported_literal(mapping: &dyn RelationalTypeMapping, value: &DbValue) -> MappingError {
    MappingError::UnsupportedLiteral {
        store_type: mapping.store_type().to_string(),
        value_kind: value.kind_name(),
    }
}
