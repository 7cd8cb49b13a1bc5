//! # relmap
//!
//! Relational type mapping for PostgreSQL, SQL Server and Oracle: how an
//! application value is bound as a command parameter, rendered as a SQL
//! literal, and read back from a result row.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relmap::prelude::*;
//!
//! fn main() -> Result<(), RelmapError> {
//!     let source = MappingSource::from_config(&MappingConfig::new(ProviderKind::SqlServer));
//!
//!     let mapping = source.find_mapping(
//!         &MappingInfo::for_type(AppType::String).with_size(50),
//!     )?;
//!     assert_eq!(mapping.store_type(), "nvarchar(50)");
//!
//!     let mut command = RelationalCommand::new("SELECT * FROM users WHERE name = @name");
//!     let name = DbValue::from("O'Brien");
//!     let parameter = mapping.create_parameter(&command, "@name", Some(&name), Some(false))?;
//!     command.add_parameter(parameter);
//!
//!     println!("{}", mapping.generate_sql_literal(Some(&name))?); // N'O''Brien'
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod binding;
pub mod core;
pub mod errors;
pub mod prelude;

pub use binding::{bind_parameter, build_query, PgQuery, PgRecord};
pub use core::MappingSource;
pub use errors::RelmapError;

// Re-export centralized config
pub use config::{AppConfig, MappingConfig, ProviderKind};

pub use type_mapping;

// Re-export external dependencies used in public API
pub use sqlx;
