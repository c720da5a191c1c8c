//! Core data types.

mod ids;
mod value;

pub use ids::{AttributeName, EntityId};
pub use value::{Value, ValueKind};
