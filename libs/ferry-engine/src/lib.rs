//! Schema-driven conversion of external values into canonical [`Value`]s.
//!
//! [`Value`]: ferry_api::Value

mod dispatch;
mod options;
mod pair;
mod unpack;

pub use dispatch::{Dispatcher, convert};
pub use options::{Options, UNION_RESOLUTION, UnionResolution};
pub use pair::PairConverter;
