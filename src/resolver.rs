mod base;
mod middleware;

pub use base::{ParseError, ParseErrorCategory};
pub use middleware::Parser;
