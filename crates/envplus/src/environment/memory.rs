//! In-memory environment

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::Environment;

/// In-memory environment for tests and embedding
///
/// Behaves like the process environment from the engine's point of view but
/// lets callers control its contents without touching global state.
///
/// # Example
///
/// ```
/// use envplus::environment::{Environment, MemoryEnvironment};
///
/// let env = MemoryEnvironment::with_vars([("USER", "admin")]);
/// assert!(env.contains("USER"));
///
/// env.remove("USER");
/// assert!(!env.contains("USER"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnvironment {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment with initial variables
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RwLock::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Set a variable, replacing any previous value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    /// Unset a variable
    pub fn remove(&self, key: &str) -> Option<String> {
        self.vars.write().remove(key)
    }

    /// Unset every variable
    pub fn clear(&self) {
        self.vars.write().clear();
    }

    /// Number of variables set
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Check if no variables are set
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Environment for MemoryEnvironment {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Clone for MemoryEnvironment {
    fn clone(&self) -> Self {
        Self {
            vars: RwLock::new(self.vars.read().clone()),
        }
    }
}
