//! Process environment abstractions
//!
//! The engine never touches `std::env` directly. It reads through an
//! [`Environment`] handed to it at construction:
//! - `ProcessEnvironment`: the live environment of the running process
//! - `MemoryEnvironment`: an in-memory map for tests and embedding

mod traits;
mod process;
mod memory;

pub use traits::Environment;
pub use process::ProcessEnvironment;
pub use memory::MemoryEnvironment;
