//! Immutable parameter bundles that describe a mapping
//!
//! Every mapping variant is constructed from a [`RelationalTypeMappingParameters`].
//! Derivations never mutate: they consume or copy and return a new bundle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::comparer::ValueComparer;
use crate::converter::{compose, MappingHints, ValueConverter};
use crate::errors::MappingError;
use crate::parameter::WireType;
use crate::sql;
use crate::types::AppType;

/// How facets are appended to a store type name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreTypePostfix {
    #[default]
    None,
    Size,
    Precision,
    PrecisionAndScale,
}

/// Application type, converter and comparer shared by all mapping kinds
#[derive(Debug, Clone)]
pub struct CoreTypeMappingParameters {
    application_type: AppType,
    converter: Option<Arc<dyn ValueConverter>>,
    comparer: Option<Arc<dyn ValueComparer>>,
}

impl CoreTypeMappingParameters {
    pub fn new(application_type: AppType) -> Self {
        Self {
            application_type,
            converter: None,
            comparer: None,
        }
    }

    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_comparer(mut self, comparer: Arc<dyn ValueComparer>) -> Self {
        self.comparer = Some(comparer);
        self
    }

    pub fn application_type(&self) -> &AppType {
        &self.application_type
    }

    pub fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.converter.as_ref()
    }

    pub fn comparer(&self) -> Option<&Arc<dyn ValueComparer>> {
        self.comparer.as_ref()
    }

    pub fn mapping_hints(&self) -> Option<&MappingHints> {
        self.converter.as_ref().and_then(|c| c.mapping_hints())
    }

    /// Layer `converter` in front of the existing one.
    ///
    /// Forward conversion runs `converter` first and the existing converter on its
    /// output; the application type becomes `converter`'s model type.
    pub fn with_composed_converter(&self, converter: Option<Arc<dyn ValueConverter>>) -> Self {
        match converter {
            Some(converter) => Self {
                application_type: converter.model_type().clone(),
                converter: Some(compose(converter, self.converter.as_ref())),
                comparer: self.comparer.clone(),
            },
            None => self.clone(),
        }
    }
}

/// Store-side facets of a relational mapping.
///
/// The store type is never empty; constructors reject it.
#[derive(Debug, Clone)]
pub struct RelationalTypeMappingParameters {
    core: CoreTypeMappingParameters,
    store_type: String,
    store_type_postfix: StoreTypePostfix,
    wire_type: Option<WireType>,
    unicode: bool,
    size: Option<i32>,
    fixed_length: bool,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl RelationalTypeMappingParameters {
    /// Create parameters; size, precision, scale and unicode default from converter hints
    pub fn new(core: CoreTypeMappingParameters, store_type: impl Into<String>) -> Result<Self, MappingError> {
        let store_type = validate_store_type(store_type.into())?;
        let hints = core.mapping_hints().cloned().unwrap_or_default();
        Ok(Self {
            core,
            store_type,
            store_type_postfix: StoreTypePostfix::None,
            wire_type: None,
            unicode: hints.unicode.unwrap_or(false),
            size: hints.size,
            fixed_length: false,
            precision: hints.precision,
            scale: hints.scale,
        })
    }

    /// Parameters for a constant store type known to be valid
    pub(crate) fn from_static(core: CoreTypeMappingParameters, store_type: &'static str) -> Self {
        Self {
            core,
            store_type: store_type.to_string(),
            store_type_postfix: StoreTypePostfix::None,
            wire_type: None,
            unicode: false,
            size: None,
            fixed_length: false,
            precision: None,
            scale: None,
        }
    }

    pub fn with_postfix(mut self, postfix: StoreTypePostfix) -> Self {
        self.store_type_postfix = postfix;
        self
    }

    pub fn with_wire_type(mut self, wire_type: WireType) -> Self {
        self.wire_type = Some(wire_type);
        self
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Set the size; `None` falls back to the converter's size hint
    pub fn with_size(mut self, size: Option<i32>) -> Self {
        self.size = size.or_else(|| self.core.mapping_hints().and_then(|h| h.size));
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = fixed_length;
        self
    }

    pub fn with_precision_and_scale(mut self, precision: Option<u32>, scale: Option<u32>) -> Self {
        let hints = self.core.mapping_hints().cloned().unwrap_or_default();
        self.precision = precision.or(hints.precision);
        self.scale = scale.or(hints.scale);
        self
    }

    pub fn with_application_type(mut self, application_type: AppType) -> Self {
        self.core.application_type = application_type;
        self
    }

    /// Same facets with a new store type and size
    pub fn with_store_type_and_size(&self, store_type: &str, size: Option<i32>) -> Result<Self, MappingError> {
        let store_type = validate_store_type(store_type.to_string())?;
        let size = size.or_else(|| self.core.mapping_hints().and_then(|h| h.size));
        Ok(Self {
            store_type,
            size,
            ..self.clone()
        })
    }

    /// Same store facets with `converter` layered in front of the existing converter
    pub fn with_composed_converter(&self, converter: Option<Arc<dyn ValueConverter>>) -> Self {
        let core = self.core.with_composed_converter(converter);
        let hints = core.mapping_hints().cloned().unwrap_or_default();
        Self {
            size: self.size.or(hints.size),
            precision: self.precision.or(hints.precision),
            scale: self.scale.or(hints.scale),
            core,
            ..self.clone()
        }
    }

    pub fn core(&self) -> &CoreTypeMappingParameters {
        &self.core
    }

    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    pub fn store_type_postfix(&self) -> StoreTypePostfix {
        self.store_type_postfix
    }

    pub fn wire_type(&self) -> Option<WireType> {
        self.wire_type
    }

    pub fn is_unicode(&self) -> bool {
        self.unicode
    }

    pub fn size(&self) -> Option<i32> {
        self.size
    }

    pub fn is_fixed_length(&self) -> bool {
        self.fixed_length
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale
    }
}

fn validate_store_type(store_type: String) -> Result<String, MappingError> {
    if store_type.trim().is_empty() {
        return Err(MappingError::InvalidConfiguration(
            "store type cannot be empty".to_string(),
        ));
    }
    Ok(store_type)
}

/// Rebuild a store type name from parameters whose postfix describes the facets
pub fn facet_store_type(base: &str, parameters: &RelationalTypeMappingParameters) -> String {
    sql::build_store_type(
        base,
        parameters.store_type_postfix(),
        parameters.size(),
        parameters.precision(),
        parameters.scale(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{GuidToBytesConverter, GuidToStringConverter};

    #[test]
    fn test_empty_store_type_is_rejected() {
        let core = CoreTypeMappingParameters::new(AppType::String);
        let result = RelationalTypeMappingParameters::new(core.clone(), "  ");
        assert!(matches!(result, Err(MappingError::InvalidConfiguration(_))));

        let parameters = RelationalTypeMappingParameters::new(core, "text").unwrap();
        assert!(parameters.with_store_type_and_size("", None).is_err());
    }

    #[test]
    fn test_size_defaults_from_converter_hints() {
        let core = CoreTypeMappingParameters::new(AppType::Uuid)
            .with_converter(Arc::new(GuidToStringConverter::default()));
        let parameters = RelationalTypeMappingParameters::new(core, "char(36)").unwrap();
        assert_eq!(parameters.size(), Some(36));

        let explicit = parameters.clone().with_size(Some(40));
        assert_eq!(explicit.size(), Some(40));
        assert_eq!(explicit.with_size(None).size(), Some(36));
    }

    #[test]
    fn test_with_store_type_and_size_keeps_other_facets() {
        let core = CoreTypeMappingParameters::new(AppType::String);
        let parameters = RelationalTypeMappingParameters::new(core, "nvarchar(50)")
            .unwrap()
            .with_unicode(true)
            .with_size(Some(50))
            .with_wire_type(WireType::String)
            .with_postfix(StoreTypePostfix::Size);

        let renamed = parameters.with_store_type_and_size("nvarchar(100)", Some(100)).unwrap();
        assert_eq!(renamed.store_type(), "nvarchar(100)");
        assert_eq!(renamed.size(), Some(100));
        assert!(renamed.is_unicode());
        assert_eq!(renamed.wire_type(), Some(WireType::String));
        assert_eq!(renamed.store_type_postfix(), StoreTypePostfix::Size);
        // The original is untouched
        assert_eq!(parameters.store_type(), "nvarchar(50)");
    }

    #[test]
    fn test_composed_converter_changes_application_type() {
        let core = CoreTypeMappingParameters::new(AppType::Bytes);
        let parameters = RelationalTypeMappingParameters::new(core, "varbinary(16)")
            .unwrap()
            .with_size(Some(16));

        let composed = parameters.with_composed_converter(Some(Arc::new(GuidToBytesConverter::default())));
        assert_eq!(composed.core().application_type(), &AppType::Uuid);
        assert_eq!(composed.store_type(), "varbinary(16)");
        assert_eq!(composed.size(), Some(16));
        assert!(parameters.core().converter().is_none());
    }

    #[test]
    fn test_facet_store_type() {
        let core = CoreTypeMappingParameters::new(AppType::Decimal);
        let parameters = RelationalTypeMappingParameters::new(core, "numeric")
            .unwrap()
            .with_postfix(StoreTypePostfix::PrecisionAndScale)
            .with_precision_and_scale(Some(10), Some(4));
        assert_eq!(facet_store_type("numeric", &parameters), "numeric(10,4)");
    }
}
