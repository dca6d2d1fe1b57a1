//! HTTP surface (axum) over the analysis use cases.

mod dto;
mod error;
mod handlers;
mod server;

pub use dto::*;
pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use server::{http_router, serve};
