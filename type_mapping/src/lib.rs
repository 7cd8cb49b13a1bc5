//! Relational type mapping between application values and database storage types
//!
//! This crate provides the immutable mapping objects used to bind parameters,
//! render SQL literals and pick reader accessors for a relational provider.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;

pub mod accessor;
pub mod comparer;
pub mod converter;
pub mod converters;
pub mod errors;
pub mod mapping;
pub mod mappings;
pub mod parameter;
pub mod parameters;
pub mod providers;
pub mod sql;
pub mod types;

// Re-export commonly used items
pub use accessor::{DataRecord, ReaderAccessor, ValueRow};
pub use comparer::{DefaultValueComparer, ValueComparer};
pub use converter::{ComposedConverter, FnValueConverter, MappingHints, ValueConverter};
pub use errors::MappingError;
pub use mapping::RelationalTypeMapping;
pub use mappings::NullTypeMapping;
pub use parameter::{DbCommand, DbParameter, ParameterDirection, RelationalCommand, WireType};
pub use parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters, StoreTypePostfix};
pub use providers::{MappingInfo, ProviderMappings, ProviderOptions};
pub use sql::UNBOUNDED_SIZE;
pub use types::{AppType, DbValue, EnumValue};
