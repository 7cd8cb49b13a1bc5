//! Core relmap functionality
//!
//! [`MappingSource`] is the registry callers go through to obtain mappings.
//! It owns one provider resolver and memoizes what that resolver returns.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use config::{AppConfig, MappingConfig, ProviderKind};
use type_mapping::providers::{OracleMappings, PostgresMappings, SqlServerMappings};
use type_mapping::{
    AppType, MappingInfo, NullTypeMapping, ProviderMappings, ProviderOptions, RelationalTypeMapping, ValueConverter,
};

use crate::errors::RelmapError;
use crate::{debug_log, trace_log};

type MappingCache = HashMap<MappingInfo, Arc<dyn RelationalTypeMapping>>;

/// Resolves and caches mappings for one provider
#[derive(Debug)]
pub struct MappingSource {
    provider: Box<dyn ProviderMappings>,
    cache: Option<RwLock<MappingCache>>,
}

impl MappingSource {
    /// Create a source over `provider`; `cache_mappings` turns memoization on
    pub fn new(provider: impl ProviderMappings + 'static, cache_mappings: bool) -> Self {
        Self {
            provider: Box::new(provider),
            cache: cache_mappings.then(|| RwLock::new(HashMap::new())),
        }
    }

    /// Build the source described by a mapping configuration
    pub fn from_config(config: &MappingConfig) -> Self {
        let options = ProviderOptions {
            unicode_by_default: config.unicode_by_default,
            default_string_size: config.default_string_size,
        };
        debug_log!("Creating {} mapping source (cache: {})", config.provider, config.cache_mappings);
        match config.provider {
            ProviderKind::Postgres => Self::new(PostgresMappings::new(options), config.cache_mappings),
            ProviderKind::SqlServer => Self::new(SqlServerMappings::new(options), config.cache_mappings),
            ProviderKind::Oracle => Self::new(OracleMappings::new(options), config.cache_mappings),
        }
    }

    /// Load configuration from the environment or `./relmap.toml` and build the source
    pub fn load() -> Result<Self, RelmapError> {
        let config = AppConfig::load()?;
        Ok(Self::from_config(&config.mapping))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Resolve facets to a mapping
    pub fn find_mapping(&self, info: &MappingInfo) -> Result<Arc<dyn RelationalTypeMapping>, RelmapError> {
        if let Some(cache) = &self.cache {
            let cached = cache
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(info)
                .cloned();
            if let Some(mapping) = cached {
                trace_log!("Mapping cache hit for {}", info);
                return Ok(mapping);
            }
        }

        let mapping = self
            .provider
            .resolve(info)?
            .ok_or_else(|| RelmapError::MappingNotFound(format!("{} on {}", info, self.provider_name())))?;
        debug_log!("Resolved {} to {}", info, mapping.store_type());

        if let Some(cache) = &self.cache {
            // A concurrent resolver may have won the race; keep the first entry
            let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
            return Ok(Arc::clone(cache.entry(info.clone()).or_insert(mapping)));
        }
        Ok(mapping)
    }

    /// Resolve the default mapping for an application type
    pub fn find_mapping_for_type(&self, app_type: AppType) -> Result<Arc<dyn RelationalTypeMapping>, RelmapError> {
        self.find_mapping(&MappingInfo::for_type(app_type))
    }

    /// Resolve the default mapping for a Rust type name such as `Option<chrono::NaiveDate>`
    pub fn find_mapping_for_rust_type(&self, rust_type: &str) -> Result<Arc<dyn RelationalTypeMapping>, RelmapError> {
        self.find_mapping_for_type(AppType::from_rust_type(rust_type))
    }

    /// Resolve storage for the converter's provider type, then layer the converter on top.
    ///
    /// The converter's size hint stands in for a size the caller did not give.
    pub fn find_mapping_with_converter(
        &self,
        info: &MappingInfo,
        converter: Arc<dyn ValueConverter>,
    ) -> Result<Arc<dyn RelationalTypeMapping>, RelmapError> {
        let mut provider_info = info.clone().with_app_type(converter.provider_type().clone());
        if info.effective_size().is_none() {
            if let Some(size) = converter.mapping_hints().and_then(|hints| hints.size) {
                provider_info = provider_info.with_size(size);
            }
        }
        if let Some(unicode) = converter.mapping_hints().and_then(|hints| hints.unicode) {
            if info.unicode().is_none() {
                provider_info = provider_info.with_unicode(unicode);
            }
        }

        let storage = self.find_mapping(&provider_info)?;
        trace_log!(
            "Composing converter {} -> {} onto {}",
            converter.model_type(),
            converter.provider_type(),
            storage.store_type()
        );
        Ok(storage.clone_with_converter(converter))
    }

    /// The untyped `NULL` mapping
    pub fn null_mapping(&self) -> Arc<dyn RelationalTypeMapping> {
        NullTypeMapping::instance()
    }

    /// Number of memoized mappings
    pub fn cached_count(&self) -> usize {
        self.cache
            .as_ref()
            .map(|cache| cache.read().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }

    /// Drop every memoized mapping
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}
