//! Resolution engine and its builder

mod env;
mod builder;

pub use env::Env;
pub use builder::{EnvBuilder, DEFAULT_SOURCE};
