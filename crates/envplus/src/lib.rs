//! envplus
//!
//! Layered configuration from `.env`-style files and the process environment.
//!
//! An [`Env`] merges an ordered list of `KEY=value` source files (later files
//! win) and consults the environment ahead of all of them. Lookups notice
//! edited, created and deleted source files on their own, expand `${NAME}`
//! placeholders against the merged view, and convert values with one of a
//! fixed set of casters.
//!
//! ```no_run
//! use envplus::Env;
//!
//! let env = Env::builder()
//!     .source(".env")
//!     .source(".env.local")
//!     .strict(true)
//!     .build()?;
//!
//! let url = env.url("API_URL", None)?;
//! let workers = env.int("WORKERS", Some(4))?;
//! let name = env.alias(&["APP_NAME", "SERVICE_NAME"], Some("app"))?;
//! # Ok::<(), envplus::EnvError>(())
//! ```
//!
//! ## Environment injection
//!
//! The environment is an [`Environment`] trait object. Production code uses
//! [`ProcessEnvironment`]; tests hand in a [`MemoryEnvironment`] instead of
//! mutating process-wide state.

pub mod cast;
pub mod environment;
pub mod error;
pub mod expand;
pub mod resolver;
pub mod source;

pub use cast::{to_bool, to_json, to_list, Cast};
pub use environment::{Environment, MemoryEnvironment, ProcessEnvironment};
pub use error::{CastError, EnvError, EnvResult};
pub use expand::expand;
pub use resolver::{Env, EnvBuilder, DEFAULT_SOURCE};
pub use source::{read_source, SourceFile, SourceMap, Staleness};
