//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion clients (Groq over HTTP, offline keyword mock)
//! - HTTP API (axum)
//! - Wiring container and CLI controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
