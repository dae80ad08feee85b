//! Layered resolution across source files and the process environment
//!
//! Precedence, highest first:
//! 1. The injected environment (read fresh on every lookup)
//! 2. Later-declared source files
//! 3. Earlier-declared source files
//!
//! Source files are re-read lazily: every lookup first checks the recorded
//! modification times and performs one full reload if any source changed,
//! appeared, or was deleted. The merged cache is rebuilt off to the side and
//! swapped in whole, so a reader never observes a half-merged state.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cast::{self, Cast};
use crate::environment::Environment;
use crate::error::{EnvError, EnvResult};
use crate::expand::expand;
use crate::source::{SourceFile, SourceMap};

use super::builder::EnvBuilder;

/// Source files plus the cache merged from them
#[derive(Debug, Default)]
struct State {
    files: Vec<SourceFile>,
    cache: SourceMap,
}

/// Resolution engine over `.env`-style files and an environment
///
/// # Example
///
/// ```no_run
/// use envplus::Env;
///
/// let env = Env::from_sources([".env", ".env.local"], false)?;
///
/// let port = env.int("PORT", Some(8000))?;
/// let debug = env.bool("DEBUG", Some(false))?;
/// let hosts = env.list("ALLOWED_HOSTS", None, ",")?.unwrap_or_default();
/// # Ok::<(), envplus::EnvError>(())
/// ```
pub struct Env {
    sources: Vec<PathBuf>,
    strict: bool,
    environment: Arc<dyn Environment>,
    state: RwLock<State>,
}

impl Env {
    /// Start configuring an engine
    pub fn builder() -> EnvBuilder {
        EnvBuilder::new()
    }

    /// Lenient engine over a single source file
    pub fn new(path: impl Into<PathBuf>) -> EnvResult<Self> {
        Self::builder().source(path).build()
    }

    /// Engine over an ordered list of source files
    ///
    /// Later sources override earlier ones. Sources that do not exist simply
    /// contribute no keys. An empty list means no sources at all; the
    /// `.env` default only applies to a builder that was never given any.
    pub fn from_sources<I, P>(paths: I, strict: bool) -> EnvResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::builder().sources(paths).strict(strict).build()
    }

    pub(crate) fn with_parts(
        paths: Vec<PathBuf>,
        strict: bool,
        environment: Arc<dyn Environment>,
    ) -> EnvResult<Self> {
        let files = paths
            .iter()
            .map(SourceFile::new)
            .collect::<EnvResult<Vec<_>>>()?;
        let sources = files.iter().map(|f| f.path().to_path_buf()).collect();

        let env = Self {
            sources,
            strict,
            environment,
            state: RwLock::new(State {
                files,
                cache: SourceMap::new(),
            }),
        };
        env.reload()?;

        debug!(
            sources = env.sources.len(),
            keys = env.state.read().cache.len(),
            strict,
            environment = env.environment.name(),
            "environment sources loaded"
        );
        Ok(env)
    }

    /// Absolute source paths in declaration order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Check if missing keys without a default are errors
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The environment consulted ahead of the source files
    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.environment
    }

    /// Re-read every source and replace the merged cache
    ///
    /// Parse and I/O failures leave the previous cache in place.
    pub fn reload(&self) -> EnvResult<()> {
        let mut state = self.state.write();
        let mut files = state.files.clone();
        let mut cache = SourceMap::new();

        for file in &mut files {
            match file.load()? {
                Some(map) => {
                    trace!(path = %file.path().display(), keys = map.len(), "read source");
                    cache.extend(map);
                }
                None => {
                    debug!(path = %file.path().display(), "source not found, skipping");
                }
            }
        }

        *state = State { files, cache };
        Ok(())
    }

    /// Reload if any source changed since it was last read
    ///
    /// At most one reload happens per call. Returns whether it did.
    pub fn check_reload(&self) -> EnvResult<bool> {
        let stale = {
            let state = self.state.read();
            state.files.iter().find_map(|file| {
                let staleness = file.staleness();
                staleness
                    .is_stale()
                    .then(|| (file.path().to_path_buf(), staleness))
            })
        };

        let Some((path, staleness)) = stale else {
            return Ok(false);
        };

        debug!(
            path = %path.display(),
            reason = staleness.as_str(),
            "source changed, reloading"
        );
        self.reload()?;
        Ok(true)
    }

    /// Look up a key and expand its placeholders
    ///
    /// The environment wins over every source file. Placeholders are
    /// resolved against the same merged view.
    pub fn get_raw(&self, key: &str) -> EnvResult<Option<String>> {
        self.check_reload()?;
        let state = self.state.read();

        let raw = match self.environment.get(key) {
            Some(value) => {
                trace!(key, origin = self.environment.name(), "resolved");
                value
            }
            None => match state.cache.get(key) {
                Some(value) => {
                    trace!(key, origin = "file", "resolved");
                    value.clone()
                }
                None => {
                    trace!(key, "not found");
                    return Ok(None);
                }
            },
        };

        let expanded = expand(&raw, |name| {
            self.environment
                .get(name)
                .or_else(|| state.cache.get(name).cloned())
        });
        Ok(Some(expanded.into_owned()))
    }

    /// Check if a key resolves from either the environment or a source
    pub fn contains(&self, key: &str) -> EnvResult<bool> {
        self.check_reload()?;
        Ok(self.environment.contains(key) || self.state.read().cache.contains_key(key))
    }

    /// Look up a key and convert it with `caster`
    ///
    /// - present: the cast result, or `EnvError::Validation` on failure
    /// - absent with a default: the default, uncast
    /// - absent in strict mode: `EnvError::Missing`
    /// - absent otherwise: `None`
    pub fn get<C: Cast>(
        &self,
        key: &str,
        default: Option<C::Output>,
        caster: C,
    ) -> EnvResult<Option<C::Output>> {
        match self.get_raw(key)? {
            Some(raw) => match caster.cast(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(source) => Err(EnvError::validation(key, raw, source)),
            },
            None => self.absent(default, || EnvError::missing(key)),
        }
    }

    /// String value
    pub fn str(&self, key: &str, default: Option<&str>) -> EnvResult<Option<String>> {
        self.get(key, default.map(str::to_string), cast::Str)
    }

    /// Base-10 integer value
    pub fn int(&self, key: &str, default: Option<i64>) -> EnvResult<Option<i64>> {
        self.get(key, default, cast::Integer)
    }

    /// Floating point value
    pub fn float(&self, key: &str, default: Option<f64>) -> EnvResult<Option<f64>> {
        self.get(key, default, cast::Float)
    }

    /// Boolean value, see [`cast::TRUE_VALUES`] and [`cast::FALSE_VALUES`]
    pub fn bool(&self, key: &str, default: Option<bool>) -> EnvResult<Option<bool>> {
        self.get(key, default, cast::Boolean)
    }

    /// List split on `delimiter` with items trimmed
    pub fn list(
        &self,
        key: &str,
        default: Option<Vec<String>>,
        delimiter: &str,
    ) -> EnvResult<Option<Vec<String>>> {
        self.get(key, default, cast::List::new(delimiter))
    }

    /// Parsed JSON value
    pub fn json(&self, key: &str, default: Option<Value>) -> EnvResult<Option<Value>> {
        self.get(key, default, cast::Json)
    }

    /// Parsed URL
    pub fn url(&self, key: &str, default: Option<url::Url>) -> EnvResult<Option<url::Url>> {
        self.get(key, default, cast::Url)
    }

    /// Filesystem path
    pub fn path(&self, key: &str, default: Option<PathBuf>) -> EnvResult<Option<PathBuf>> {
        self.get(key, default, cast::FsPath)
    }

    /// First present value among `keys`, tried in order
    ///
    /// An empty-string default is a real default and is returned as-is.
    pub fn alias<S: AsRef<str>>(
        &self,
        keys: &[S],
        default: Option<&str>,
    ) -> EnvResult<Option<String>> {
        for key in keys {
            if let Some(value) = self.get_raw(key.as_ref())? {
                return Ok(Some(value));
            }
        }

        self.absent(default.map(str::to_string), || {
            EnvError::missing_any(keys.iter().map(|k| k.as_ref().to_string()))
        })
    }

    /// Every resolvable key with its unexpanded value
    ///
    /// Environment values win over source values.
    pub fn dump(&self) -> EnvResult<BTreeMap<String, String>> {
        self.check_reload()?;
        let mut merged: BTreeMap<String, String> = self
            .state
            .read()
            .cache
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        merged.extend(self.environment.vars());
        Ok(merged)
    }

    /// Key-sorted `KEY=value` listing of [`dump`](Self::dump) for humans
    pub fn debug(&self) -> EnvResult<String> {
        Ok(self
            .dump()?
            .into_iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect())
    }

    fn absent<T>(
        &self,
        default: Option<T>,
        missing: impl FnOnce() -> EnvError,
    ) -> EnvResult<Option<T>> {
        if default.is_some() {
            Ok(default)
        } else if self.strict {
            Err(missing())
        } else {
            Ok(None)
        }
    }

    #[cfg(test)]
    pub(crate) fn cached(&self) -> SourceMap {
        self.state.read().cache.clone()
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("sources", &self.sources)
            .field("strict", &self.strict)
            .field("environment", &self.environment.name())
            .field("keys", &self.state.read().cache.len())
            .finish()
    }
}
