//! Storage-family mapping variants shared by all providers

mod boolean;
mod bytes;
mod datetime;
mod guid;
mod json;
mod null;
mod numeric;
mod string;

pub use boolean::BoolTypeMapping;
pub use bytes::ByteArrayTypeMapping;
pub use datetime::{format_date, format_datetime, format_datetime_offset, format_time, DateTimeTypeMapping};
pub(crate) use datetime::{ansi_temporal_literal, temporal_parameters};
pub use guid::GuidTypeMapping;
pub use json::JsonTypeMapping;
pub(crate) use json::json_text_literal;
pub use null::NullTypeMapping;
pub use numeric::{DecimalTypeMapping, FloatingPointTypeMapping, IntegerTypeMapping};
pub use string::{string_wire_type, StringTypeMapping};
