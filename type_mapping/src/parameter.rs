//! Driver-facing parameter objects
//!
//! A [`DbParameter`] is what the binding layer hands to a database driver.
//! Mappings fill it in; drivers read it back.

use serde::{Deserialize, Serialize};

use crate::types::DbValue;

/// Provider-API type classification attached to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    AnsiString,
    AnsiStringFixedLength,
    Binary,
    Boolean,
    Byte,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Json,
    Object,
    Single,
    String,
    StringFixedLength,
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// A bound command parameter.
///
/// `value == None` is the database null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbParameter {
    pub name: String,
    pub direction: ParameterDirection,
    pub value: Option<DbValue>,
    pub is_nullable: Option<bool>,
    pub wire_type: Option<WireType>,
    pub size: Option<i32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl DbParameter {
    pub fn is_db_null(&self) -> bool {
        self.value.is_none()
    }

    /// Length of a string or byte-sequence value, `None` for other kinds
    pub fn value_length(&self) -> Option<usize> {
        self.value.as_ref().and_then(DbValue::length)
    }
}

/// Parameter factory supplied by the driver side
pub trait DbCommand {
    fn create_parameter(&self) -> DbParameter {
        DbParameter::default()
    }
}

/// Command text with its bound parameters, consumed by a driver bridge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationalCommand {
    sql: String,
    parameters: Vec<DbParameter>,
}

impl RelationalCommand {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, parameter: DbParameter) {
        self.parameters.push(parameter);
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[DbParameter] {
        &self.parameters
    }
}

impl DbCommand for RelationalCommand {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_parameter_is_input_and_null() {
        let command = RelationalCommand::new("SELECT $1");
        let parameter = command.create_parameter();
        assert_eq!(parameter.direction, ParameterDirection::Input);
        assert!(parameter.is_db_null());
        assert_eq!(parameter.value_length(), None);
    }

    #[test]
    fn test_value_length() {
        let parameter = DbParameter {
            value: Some(DbValue::Bytes(vec![0; 30])),
            ..DbParameter::default()
        };
        assert_eq!(parameter.value_length(), Some(30));
    }

    #[test]
    fn test_command_collects_parameters() {
        let mut command = RelationalCommand::new("SELECT $1, $2");
        command.add_parameter(DbParameter {
            name: "p0".to_string(),
            ..DbParameter::default()
        });
        command.add_parameter(DbParameter {
            name: "p1".to_string(),
            ..DbParameter::default()
        });
        assert_eq!(command.parameters().len(), 2);
        assert_eq!(command.sql(), "SELECT $1, $2");
    }
}
