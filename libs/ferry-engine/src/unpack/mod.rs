//! Per-kind unpackers. Each converts one schema kind's external shapes and
//! recurses through the [`Dispatcher`](crate::Dispatcher) for nested schemas.

pub(crate) mod array;
pub(crate) mod bytes;
pub(crate) mod map;
pub(crate) mod record;
pub(crate) mod scalar;
pub(crate) mod union;
