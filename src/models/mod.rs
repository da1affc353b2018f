//! Data models for the zoo records service.
//!
//! The animal record is typed end to end, so malformed input is rejected
//! before it reaches storage.

mod animal;
pub mod coerce;

pub use animal::*;

#[cfg(test)]
pub(crate) use animal::fixtures;
