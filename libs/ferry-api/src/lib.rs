#[cfg(feature = "avro")]
pub mod avro;
pub mod config;
pub mod converter;
pub mod datum;
pub mod error;
pub mod external;
pub mod schema;
pub mod value;

pub use error::ConvertError;
pub use schema::{Schema, SchemaKind};
pub use value::Value;
