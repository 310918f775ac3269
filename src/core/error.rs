use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    /// Raised by writes. Wraps whatever failed while resolving or assigning the member.
    #[error("The data mapper was unable to load the following field: {field}. Details: {details}")]
    DataMapping {
        field: String,
        details: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("The data mapper could not get the value for {type_name}.{field}.")]
    Unreadable { type_name: String, field: String },

    #[error("Member '{member}' not found on type '{type_name}'")]
    MemberNotFound { type_name: String, member: String },

    #[error("Cannot construct an instance of '{type_name}': {details}")]
    ConstructionFailed { type_name: String, details: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Member handle for '{expected}' applied to an entity of type '{actual}'")]
    EntityMismatch { expected: String, actual: String },

    #[error("Property {type_name}.{field} is read-only")]
    ReadOnly { type_name: String, field: String },

    #[error("Row {row} has {values} values but the result has {columns} columns")]
    RowShape {
        row: usize,
        values: usize,
        columns: usize,
    },

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MapError {
    /// Wraps a write-side failure for `field`, keeping the original error as the source.
    pub fn data_mapping(field: impl Into<String>, err: MapError) -> Self {
        let details = err.to_string();
        let source: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        Self::DataMapping {
            field: field.into(),
            details,
            source: Some(source),
        }
    }

    pub fn type_mismatch(expected: &str, got: &str) -> Self {
        Self::TypeMismatch(format!("expected {}, got {}", expected, got))
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

impl<T> From<std::sync::PoisonError<T>> for MapError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
