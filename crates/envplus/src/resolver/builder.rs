//! Builder for [`Env`]

use std::path::PathBuf;
use std::sync::Arc;

use crate::environment::{Environment, ProcessEnvironment};
use crate::error::EnvResult;

use super::env::Env;

/// Source used when none is configured
pub const DEFAULT_SOURCE: &str = ".env";

/// Configures and constructs an [`Env`]
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use envplus::Env;
/// use envplus::environment::MemoryEnvironment;
///
/// let vars = Arc::new(MemoryEnvironment::with_vars([("PORT", "9000")]));
/// let env = Env::builder()
///     .source("/nonexistent/.env")
///     .source("/nonexistent/.env.local")
///     .strict(true)
///     .environment(vars)
///     .build()?;
///
/// assert_eq!(env.int("PORT", None)?, Some(9000));
/// # Ok::<(), envplus::EnvError>(())
/// ```
#[derive(Default)]
pub struct EnvBuilder {
    sources: Option<Vec<PathBuf>>,
    strict: bool,
    environment: Option<Arc<dyn Environment>>,
}

impl EnvBuilder {
    /// Create a builder with no sources, lenient mode and the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source file; later sources override earlier ones
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.get_or_insert_with(Vec::new).push(path.into());
        self
    }

    /// Append several source files in order
    ///
    /// An empty iterator still counts as an explicit source list, so the
    /// engine ends up with no sources instead of the default.
    pub fn sources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources
            .get_or_insert_with(Vec::new)
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Treat missing keys without a default as errors
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the process environment with another implementation
    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Resolve source paths and perform the initial load
    ///
    /// Falls back to [`DEFAULT_SOURCE`] only when neither `source` nor
    /// `sources` was called.
    pub fn build(self) -> EnvResult<Env> {
        let sources = self
            .sources
            .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_SOURCE)]);
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(ProcessEnvironment::new()));

        Env::with_parts(sources, self.strict, environment)
    }
}

impl std::fmt::Debug for EnvBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvBuilder")
            .field("sources", &self.sources)
            .field("strict", &self.strict)
            .field("environment", &self.environment.as_ref().map(|e| e.name()))
            .finish()
    }
}
