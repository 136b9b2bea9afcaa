//! `jawara-core`: shared building blocks for the forecasting workspace.
//!
//! This crate contains **pure** primitives (no IO, no infrastructure concerns).

pub mod alpha;
pub mod error;
pub mod value_object;

pub use alpha::Alpha;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use value_object::ValueObject;
