//! Provider-specific mapping variants and the resolvers that pick them
//!
//! Each provider implements [`ProviderMappings`], turning a [`MappingInfo`]
//! (application type plus optional facets) into a concrete mapping. Types a
//! provider has no native storage for resolve to `None`; callers are expected
//! to supply a converter for those.

use std::fmt;
use std::sync::Arc;

use crate::errors::MappingError;
use crate::mapping::RelationalTypeMapping;
use crate::mappings::StringTypeMapping;
use crate::sql;
use crate::types::AppType;

mod oracle;
mod postgres;
mod sqlserver;

pub use oracle::{OracleByteArrayTypeMapping, OracleMappings, ORACLE_MAX_BINARY_SIZE};
pub use postgres::{
    PostgresBoolTypeMapping, PostgresByteArrayTypeMapping, PostgresDateTimeTypeMapping, PostgresGuidTypeMapping,
    PostgresJsonTypeMapping, PostgresMappings,
};
pub use sqlserver::{
    SqlServerBoolTypeMapping, SqlServerByteArrayTypeMapping, SqlServerDateTimeTypeMapping,
    SqlServerDecimalTypeMapping, SqlServerMappings, SqlServerStringTypeMapping,
};

/// Facets a caller asks a provider to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingInfo {
    app_type: AppType,
    store_type: Option<String>,
    size: Option<i32>,
    unicode: Option<bool>,
    fixed_length: bool,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl MappingInfo {
    pub fn for_type(app_type: AppType) -> Self {
        Self {
            app_type,
            store_type: None,
            size: None,
            unicode: None,
            fixed_length: false,
            precision: None,
            scale: None,
        }
    }

    /// Same facets for a different application type
    pub fn with_app_type(mut self, app_type: AppType) -> Self {
        self.app_type = app_type;
        self
    }

    pub fn with_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.store_type = Some(store_type.into());
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = Some(unicode);
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = fixed_length;
        self
    }

    pub fn with_precision_scale(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn app_type(&self) -> &AppType {
        &self.app_type
    }

    pub fn size(&self) -> Option<i32> {
        self.size
    }

    pub fn store_type(&self) -> Option<&str> {
        self.store_type.as_deref()
    }

    pub fn unicode(&self) -> Option<bool> {
        self.unicode
    }

    pub fn is_fixed_length(&self) -> bool {
        self.fixed_length
    }

    /// Explicit size, else the size embedded in the store type name
    pub fn effective_size(&self) -> Option<i32> {
        self.size
            .or_else(|| self.store_type.as_deref().and_then(sql::parse_size))
    }

    /// Explicit precision and scale, else those embedded in the store type name
    pub fn effective_precision_scale(&self) -> (Option<u32>, Option<u32>) {
        if self.precision.is_some() {
            return (self.precision, self.scale);
        }
        match self.store_type.as_deref() {
            Some(store_type) => sql::parse_precision_scale(store_type),
            None => (None, None),
        }
    }

    /// The requested store type, or `default` when none was given
    pub(crate) fn store_type_or(&self, default: impl FnOnce() -> String) -> String {
        self.store_type.clone().unwrap_or_else(default)
    }
}

impl fmt::Display for MappingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.app_type)?;
        if let Some(store_type) = &self.store_type {
            write!(f, " as {store_type}")?;
        }
        if let Some(size) = self.size {
            write!(f, " (size {size})")?;
        }
        Ok(())
    }
}

/// Resolver settings shared by every provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Whether strings are unicode when [`MappingInfo`] does not say
    pub unicode_by_default: bool,
    /// Size given to unsized string columns; `None` leaves them unbounded
    pub default_string_size: Option<i32>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            unicode_by_default: true,
            default_string_size: None,
        }
    }
}

impl ProviderOptions {
    pub(crate) fn unicode_for(&self, info: &MappingInfo) -> bool {
        info.unicode().unwrap_or(self.unicode_by_default)
    }

    pub(crate) fn string_size_for(&self, info: &MappingInfo) -> Option<i32> {
        info.effective_size().or(self.default_string_size)
    }
}

/// Provider-side mapping resolution
pub trait ProviderMappings: fmt::Debug + Send + Sync {
    /// Short provider name used in logs and errors
    fn provider_name(&self) -> &'static str;

    /// Resolve facets to a mapping. `Ok(None)` means the provider has no
    /// native storage for the type.
    fn resolve(&self, info: &MappingInfo) -> Result<Option<Arc<dyn RelationalTypeMapping>>, MappingError>;
}

/// Single-character column, read back with the char accessor
pub(crate) fn char_mapping(store_type: &str, unicode: bool) -> Result<Arc<dyn RelationalTypeMapping>, MappingError> {
    let mapping = StringTypeMapping::new(store_type, unicode, Some(1), true)?;
    let parameters = mapping.parameters().clone().with_application_type(AppType::Char);
    Ok(mapping.clone_with_parameters(parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_info_effective_facets() {
        let info = MappingInfo::for_type(AppType::String).with_store_type("nvarchar(120)");
        assert_eq!(info.effective_size(), Some(120));

        let explicit = info.clone().with_size(10);
        assert_eq!(explicit.effective_size(), Some(10));

        let decimal = MappingInfo::for_type(AppType::Decimal).with_store_type("numeric(12,4)");
        assert_eq!(decimal.effective_precision_scale(), (Some(12), Some(4)));
        assert_eq!(
            decimal.with_precision_scale(9, None).effective_precision_scale(),
            (Some(9), None)
        );
    }

    #[test]
    fn test_char_mapping_reads_with_char_accessor() {
        let mapping = char_mapping("nchar(1)", true).unwrap();
        assert_eq!(mapping.application_type(), &AppType::Char);
        assert_eq!(mapping.data_reader_accessor(), crate::accessor::ReaderAccessor::GetChar);
        assert_eq!(mapping.size(), Some(1));
    }

    #[test]
    fn test_options_defaults() {
        let options = ProviderOptions {
            unicode_by_default: false,
            default_string_size: Some(255),
        };
        let info = MappingInfo::for_type(AppType::String);
        assert!(!options.unicode_for(&info));
        assert!(options.unicode_for(&info.clone().with_unicode(true)));
        assert_eq!(options.string_size_for(&info), Some(255));
    }
}
