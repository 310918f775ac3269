pub mod error;
pub mod types;
pub mod value;

pub use error::{MapError, Result};
pub use types::{DataType, Row};
pub use value::Value;
