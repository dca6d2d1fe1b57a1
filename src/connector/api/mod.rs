pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, DEFAULT_MAX_MESSAGE_CHARS};
pub use router::Router;
