//! Persistence of forecast runs ("projects").

pub mod store;

pub use store::{InMemoryProjectStore, ProjectStore, normalize_name};
