mod groq_client;
pub mod http;
mod mock_completion;

pub use groq_client::*;
pub use mock_completion::*;
pub use http::{http_router, serve};
