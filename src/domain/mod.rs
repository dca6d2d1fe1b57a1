//! # Domain Layer
//!
//! Analysis records, labels and the error taxonomy.
//! This layer is independent of the LLM provider and the HTTP framework.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
