//! Convenience re-exports for common relmap usage
//!
//! ```rust
//! use relmap::prelude::*;
//! ```

pub use crate::binding::{bind_parameter, build_query, PgRecord};
pub use crate::core::MappingSource;
pub use crate::errors::RelmapError;

pub use config::{AppConfig, MappingConfig, ProviderKind};

pub use type_mapping::{
    AppType, DataRecord, DbCommand, DbParameter, DbValue, EnumValue, MappingError, MappingInfo, ParameterDirection,
    ReaderAccessor, RelationalCommand, RelationalTypeMapping, ValueConverter, ValueRow, WireType,
};

pub use sqlx;
pub use sqlx::{PgPool, Row};
