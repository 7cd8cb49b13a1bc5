//! Value converters
//!
//! A converter translates between an application value and the value the
//! provider stores. Mappings only ever see converters through the
//! [`ValueConverter`] trait.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::MappingError;
use crate::types::{AppType, DbValue};

/// Facets a converter suggests for the store type it produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingHints {
    pub size: Option<i32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub unicode: Option<bool>,
}

impl MappingHints {
    pub fn with_size(size: i32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    /// Merge two hint sets; facets set in `overrides` win
    pub fn merge(&self, overrides: &MappingHints) -> MappingHints {
        MappingHints {
            size: overrides.size.or(self.size),
            precision: overrides.precision.or(self.precision),
            scale: overrides.scale.or(self.scale),
            unicode: overrides.unicode.or(self.unicode),
        }
    }
}

/// Reversible transform between an application value and its provider representation.
///
/// Absent values never reach a converter; the mapping short-circuits them.
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// The application-side type this converter accepts
    fn model_type(&self) -> &AppType;

    /// The type of the values handed to the provider
    fn provider_type(&self) -> &AppType;

    /// Convert an application value to its provider form. `None` means "store NULL".
    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError>;

    /// Convert a provider value read from a row back to the application form
    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError>;

    fn mapping_hints(&self) -> Option<&MappingHints> {
        None
    }
}

/// Two converters chained: `first` runs on the application value, `second` on its output
#[derive(Debug, Clone)]
pub struct ComposedConverter {
    first: Arc<dyn ValueConverter>,
    second: Arc<dyn ValueConverter>,
    hints: Option<MappingHints>,
}

impl ComposedConverter {
    pub fn new(first: Arc<dyn ValueConverter>, second: Arc<dyn ValueConverter>) -> Self {
        // Provider-side hints describe the stored value, so they take precedence
        let hints = match (first.mapping_hints(), second.mapping_hints()) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (None, None) => None,
        };
        Self {
            first,
            second,
            hints,
        }
    }
}

impl ValueConverter for ComposedConverter {
    fn model_type(&self) -> &AppType {
        self.first.model_type()
    }

    fn provider_type(&self) -> &AppType {
        self.second.provider_type()
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match self.first.convert_to_provider(value)? {
            Some(intermediate) => self.second.convert_to_provider(&intermediate),
            None => Ok(None),
        }
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        match self.second.convert_from_provider(value)? {
            Some(intermediate) => self.first.convert_from_provider(&intermediate),
            None => Ok(None),
        }
    }

    fn mapping_hints(&self) -> Option<&MappingHints> {
        self.hints.as_ref()
    }
}

/// Layer `outer` in front of an optional existing converter
pub fn compose(
    outer: Arc<dyn ValueConverter>,
    existing: Option<&Arc<dyn ValueConverter>>,
) -> Arc<dyn ValueConverter> {
    match existing {
        Some(existing) => Arc::new(ComposedConverter::new(outer, Arc::clone(existing))),
        None => outer,
    }
}

type ConvertFn = Arc<dyn Fn(&DbValue) -> Result<Option<DbValue>, MappingError> + Send + Sync>;

/// Converter built from a pair of closures
#[derive(Clone)]
pub struct FnValueConverter {
    model_type: AppType,
    provider_type: AppType,
    to_provider: ConvertFn,
    from_provider: ConvertFn,
    hints: Option<MappingHints>,
}

impl FnValueConverter {
    pub fn new<F, G>(model_type: AppType, provider_type: AppType, to_provider: F, from_provider: G) -> Self
    where
        F: Fn(&DbValue) -> Result<Option<DbValue>, MappingError> + Send + Sync + 'static,
        G: Fn(&DbValue) -> Result<Option<DbValue>, MappingError> + Send + Sync + 'static,
    {
        Self {
            model_type,
            provider_type,
            to_provider: Arc::new(to_provider),
            from_provider: Arc::new(from_provider),
            hints: None,
        }
    }

    pub fn with_hints(mut self, hints: MappingHints) -> Self {
        self.hints = Some(hints);
        self
    }
}

impl fmt::Debug for FnValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValueConverter")
            .field("model_type", &self.model_type)
            .field("provider_type", &self.provider_type)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

impl ValueConverter for FnValueConverter {
    fn model_type(&self) -> &AppType {
        &self.model_type
    }

    fn provider_type(&self) -> &AppType {
        &self.provider_type
    }

    fn convert_to_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        (self.to_provider)(value)
    }

    fn convert_from_provider(&self, value: &DbValue) -> Result<Option<DbValue>, MappingError> {
        (self.from_provider)(value)
    }

    fn mapping_hints(&self) -> Option<&MappingHints> {
        self.hints.as_ref()
    }
}
