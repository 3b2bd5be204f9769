//! Shared identifier types for the bakery API.

pub mod types;

pub use types::{BakedGoodId, BakeryId};
