use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

pub type Row = Vec<Value>;

/// Declared storage type of an entity member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Timestamp,
    Date,
    Uuid,
}

impl DataType {
    /// Returns `true` when `value` has a conversion into a member of this
    /// type. The conversion itself may still fail (range, parse errors).
    /// `Null` is accepted everywhere.
    pub fn is_compatible(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Float, Value::Integer(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Boolean, Value::Boolean(_) | Value::Integer(_)) => true,
            (Self::Timestamp, Value::Timestamp(_) | Value::Text(_)) => true,
            (Self::Date, Value::Date(_) | Value::Text(_)) => true,
            (Self::Uuid, Value::Uuid(_) | Value::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Date => write!(f, "DATE"),
            Self::Uuid => write!(f, "UUID"),
        }
    }
}
