use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::MappingError;
use crate::mapping::{unsupported_literal, RelationalTypeMapping};
use crate::parameter::WireType;
use crate::parameters::{CoreTypeMappingParameters, RelationalTypeMappingParameters};
use crate::types::{AppType, DbValue};

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}

pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

pub fn format_datetime_offset(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string()
}

/// Parameters shared by the date/time variants; the wire type follows the application type
pub(crate) fn temporal_parameters(
    store_type: &str,
    application_type: AppType,
) -> Result<RelationalTypeMappingParameters, MappingError> {
    let wire_type = match application_type.strip_nullable() {
        AppType::Date => WireType::Date,
        AppType::Time => WireType::Time,
        AppType::DateTime => WireType::DateTime2,
        AppType::DateTimeOffset => WireType::DateTimeOffset,
        other => {
            return Err(MappingError::InvalidConfiguration(format!(
                "{other} is not a date or time type"
            )))
        }
    };
    Ok(
        RelationalTypeMappingParameters::new(CoreTypeMappingParameters::new(application_type), store_type)?
            .with_wire_type(wire_type),
    )
}

/// ANSI typed literal for a date/time value
pub(crate) fn ansi_temporal_literal(
    mapping: &dyn RelationalTypeMapping,
    value: &DbValue,
) -> Result<String, MappingError> {
    match value {
        DbValue::Date(date) => Ok(format!("DATE '{}'", format_date(date))),
        DbValue::Time(time) => Ok(format!("TIME '{}'", format_time(time))),
        DbValue::DateTime(dt) => Ok(format!("TIMESTAMP '{}'", format_datetime(dt))),
        DbValue::DateTimeOffset(dt) => Ok(format!("TIMESTAMP '{}'", format_datetime_offset(dt))),
        other => Err(unsupported_literal(mapping, other)),
    }
}

/// Date and time columns using ANSI typed literals
#[derive(Debug, Clone)]
pub struct DateTimeTypeMapping {
    parameters: RelationalTypeMappingParameters,
}

impl DateTimeTypeMapping {
    pub fn new(store_type: &str, application_type: AppType) -> Result<Self, MappingError> {
        Ok(Self::from_parameters(temporal_parameters(store_type, application_type)?))
    }

    pub fn from_parameters(parameters: RelationalTypeMappingParameters) -> Self {
        Self { parameters }
    }
}

impl RelationalTypeMapping for DateTimeTypeMapping {
    fn parameters(&self) -> &RelationalTypeMappingParameters {
        &self.parameters
    }

    fn clone_with_parameters(&self, parameters: RelationalTypeMappingParameters) -> Arc<dyn RelationalTypeMapping> {
        Arc::new(Self::from_parameters(parameters))
    }

    fn generate_non_null_sql_literal(&self, value: &DbValue) -> Result<String, MappingError> {
        ansi_temporal_literal(self, value)
    }
}
