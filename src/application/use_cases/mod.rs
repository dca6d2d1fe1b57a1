mod analyze_bulk;
mod analyze_message;
pub mod prompts;
pub mod response_parser;
mod summarize;
#[cfg(test)]
pub(crate) mod test_support;

pub use analyze_bulk::*;
pub use analyze_message::*;
pub use response_parser::{ParseError, ReplyMode};
pub use summarize::*;
