//! Avro record-reader family: generic Avro datums converted through the
//! schema dispatcher, and canonical values written back as Avro datums.

mod codec;
mod converter;
mod logical;
mod reader;
pub mod schema;
mod wrapper;
pub mod write;

pub use codec::AvroDatumCodec;
pub use converter::AvroWrapperConverter;
pub use logical::{LogicalTypes, restore_logical};
pub use reader::AvroRecordReader;
pub use schema::translate;
pub use wrapper::{AvroKey, AvroValue, Wrapped};
pub use write::to_avro;
