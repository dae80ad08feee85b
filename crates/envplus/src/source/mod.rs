//! Source files: reading `KEY=value` files and tracking their timestamps

mod parser;
mod file;

pub use parser::{parse, SourceMap};
pub use file::{read_source, SourceFile, Staleness};
