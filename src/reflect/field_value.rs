use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::core::{DataType, MapError, Result, Value};

/// Types that can back an entity member.
///
/// `Default` supplies the value written when the database hands back `NULL`.
pub trait FieldValue: Default + Send + Sync + 'static {
    fn data_type() -> DataType;
    /// Fails when the value has no lossless `Value` representation.
    fn to_value(&self) -> Result<Value>;
    fn from_value(value: Value) -> Result<Self>;

    /// Whether `Value::Null` round-trips through this type.
    fn nullable() -> bool {
        false
    }
}

fn mismatch(expected: DataType, value: &Value) -> MapError {
    MapError::type_mismatch(&expected.to_string(), value.type_name())
}

macro_rules! impl_integer_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn data_type() -> DataType {
                    DataType::Integer
                }

                fn to_value(&self) -> Result<Value> {
                    Ok(Value::Integer(i64::from(*self)))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                            MapError::TypeMismatch(format!(
                                "{} is out of range for {}",
                                i,
                                stringify!($ty)
                            ))
                        }),
                        other => Err(mismatch(DataType::Integer, &other)),
                    }
                }
            }
        )+
    };
}

impl_integer_field_value!(i64, i32, i16, u32);

impl FieldValue for u64 {
    fn data_type() -> DataType {
        DataType::Integer
    }

    fn to_value(&self) -> Result<Value> {
        i64::try_from(*self)
            .map(Value::Integer)
            .map_err(|_| MapError::TypeMismatch(format!("{} is out of range for INTEGER", self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => u64::try_from(i)
                .map_err(|_| MapError::TypeMismatch(format!("{} is out of range for u64", i))),
            other => Err(mismatch(DataType::Integer, &other)),
        }
    }
}

impl FieldValue for usize {
    fn data_type() -> DataType {
        DataType::Integer
    }

    fn to_value(&self) -> Result<Value> {
        i64::try_from(*self)
            .map(Value::Integer)
            .map_err(|_| MapError::TypeMismatch(format!("{} is out of range for INTEGER", self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => usize::try_from(i)
                .map_err(|_| MapError::TypeMismatch(format!("{} is out of range for usize", i))),
            other => Err(mismatch(DataType::Integer, &other)),
        }
    }
}

impl FieldValue for f64 {
    fn data_type() -> DataType {
        DataType::Float
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| mismatch(DataType::Float, &value))
    }
}

impl FieldValue for f32 {
    fn data_type() -> DataType {
        DataType::Float
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Float(f64::from(*self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        let f = value
            .as_f64()
            .ok_or_else(|| mismatch(DataType::Float, &value))?;
        let narrowed = f as f32;
        if f.is_finite() && !narrowed.is_finite() {
            return Err(MapError::TypeMismatch(format!("{} is out of range for f32", f)));
        }
        Ok(narrowed)
    }
}

impl FieldValue for bool {
    fn data_type() -> DataType {
        DataType::Boolean
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Boolean(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            // Drivers without a native boolean hand back 0/1.
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => Err(mismatch(DataType::Boolean, &other)),
        }
    }
}

impl FieldValue for String {
    fn data_type() -> DataType {
        DataType::Text
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Text(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(DataType::Text, &other)),
        }
    }
}

impl FieldValue for Uuid {
    fn data_type() -> DataType {
        DataType::Uuid
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Uuid(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(s) => Uuid::parse_str(&s)
                .map_err(|e| MapError::TypeMismatch(format!("invalid UUID '{}': {}", s, e))),
            other => Err(mismatch(DataType::Uuid, &other)),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    fn data_type() -> DataType {
        DataType::Timestamp
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Timestamp(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| MapError::TypeMismatch(format!("invalid timestamp '{}': {}", s, e))),
            other => Err(mismatch(DataType::Timestamp, &other)),
        }
    }
}

impl FieldValue for NaiveDate {
    fn data_type() -> DataType {
        DataType::Date
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Date(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(d),
            Value::Text(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| MapError::TypeMismatch(format!("invalid date '{}': {}", s, e))),
            other => Err(mismatch(DataType::Date, &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn data_type() -> DataType {
        T::data_type()
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn nullable() -> bool {
        true
    }
}
