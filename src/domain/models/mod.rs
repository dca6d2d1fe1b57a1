mod analysis;
mod labels;
mod message;
mod summary;

pub use analysis::*;
pub use labels::*;
pub use message::*;
pub use summary::*;
